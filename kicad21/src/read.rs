//!
//! # S-Expression Reading Module
//!
//! Facilities for reading KiCad S-expression content from file or string.
//! Includes the core Lexer and Parser.
//!

// Standard Lib Imports
use std::path::Path;
use std::str::Chars;

// Crates.io Imports
use serde::{Deserialize, Serialize};

// Local imports
use crate::sexpr::Sexp;
use crate::{KiError, KiResult};

/// Read the full text of file `fname`.
/// Fails with [KiError::Io] if `fname` is not a regular file.
pub fn read_source(fname: impl AsRef<Path>) -> KiResult<String> {
    let fname = fname.as_ref();
    if !fname.is_file() {
        return Err(KiError::io(fname, "Given path is not a file"));
    }
    std::fs::read_to_string(fname).map_err(|err| KiError::Io {
        path: fname.to_path_buf(),
        err,
    })
}
/// Parse S-expression content from file `fname`
pub fn parse_file(fname: impl AsRef<Path>) -> KiResult<Sexp> {
    let src = read_source(fname)?;
    parse_str(&src)
}
/// Parse S-expression content `src` from string.
/// The content must consist of exactly one parenthesized list.
pub fn parse_str(src: &str) -> KiResult<Sexp> {
    SexpParser::new(src).parse()
}

/// # S-Expression Lexer / Tokenizer
///
/// Breaks input string `self.src` into an iteration of [Token]s,
/// consisting of source-locations and type-annotations.
///
pub struct SexpLexer<'src> {
    /// Source string
    src: &'src str,
    /// Source-string character iterator
    chars: Chars<'src>,
    /// Peekable next character
    next_char: Option<char>,
    /// Byte index at which the active token starts
    start: usize,
    /// Active byte index
    pos: usize,
    /// Active line number
    line: usize,
    /// Byte index at the beginning of the current line
    linestart: usize,
}
impl<'src> SexpLexer<'src> {
    pub fn new(src: &'src str) -> Self {
        let mut chars = src.chars();
        let next_char = chars.next();
        Self {
            src,
            chars,
            next_char,
            start: 0,
            pos: 0,
            line: 1,
            linestart: 0,
        }
    }
    /// Get and return our next character, updating our position along the way
    fn next_char(&mut self) -> Option<char> {
        let rv = self.next_char?;
        self.pos += rv.len_utf8();
        if rv == '\n' {
            self.line += 1;
            self.linestart = self.pos;
        }
        self.next_char = self.chars.next();
        Some(rv)
    }
    /// Peek at our next character, without advancing
    fn peek_char(&self) -> Option<char> {
        self.next_char
    }
    /// Emit a [Token] of [TokenType] `ttype`, spanning from the active start to the current position
    fn emit(&mut self, ttype: TokenType) -> Token {
        let loc = SourceLocation {
            start: self.start,
            stop: self.pos,
            line: self.line,
        };
        self.start = self.pos;
        Token { loc, ttype }
    }
    /// Accept a character if it meets predicate-function `f`
    fn accept(&mut self, f: impl Fn(char) -> bool) -> bool {
        match self.peek_char() {
            Some(ch) if f(ch) => {
                self.next_char();
                true
            }
            _ => false,
        }
    }
    /// Accept a single-character match
    fn accept_char(&mut self, c: char) -> bool {
        self.accept(|a| a == c)
    }
    /// Get and return our next token, skipping white-space
    pub fn next_token(&mut self) -> KiResult<Option<Token>> {
        while self.accept(is_space) {
            continue;
        }
        self.start = self.pos;
        if self.peek_char().is_none() {
            return Ok(None); // End of input
        }
        if self.accept_char('(') {
            return Ok(Some(self.emit(TokenType::Open)));
        }
        if self.accept_char(')') {
            return Ok(Some(self.emit(TokenType::Close)));
        }
        if self.accept_char('"') {
            return self.lex_string_literal().map(Some);
        }
        self.lex_atom().map(Some)
    }
    /// Lex a quoted string literal.
    /// A backslash followed by a double-quote is an escaped quote, and does not end the string.
    fn lex_string_literal(&mut self) -> KiResult<Token> {
        let (line, linestart) = (self.line, self.linestart);
        loop {
            match self.next_char() {
                None => {
                    // Report the location and leading text of the opening quote
                    let head: String = self.src[self.start..].chars().take(24).collect();
                    return Err(KiError::Parse {
                        msg: format!("Unterminated string literal `{}`", head),
                        line,
                        pos: self.start - linestart,
                    });
                }
                Some('\\') => {
                    self.accept_char('"');
                }
                Some('"') => return Ok(self.emit(TokenType::StringLiteral)),
                Some(_) => continue,
            }
        }
    }
    /// Lex an atom: everything up to white-space or a structural character
    fn lex_atom(&mut self) -> KiResult<Token> {
        while self.accept(|c| !is_space(c) && c != '(' && c != ')' && c != '"') {
            continue;
        }
        Ok(self.emit(TokenType::Atom))
    }
    /// Error-Generation Helper.
    /// Collect our current position into a [KiError::Parse].
    fn fail<T>(&self, msg: impl Into<String>) -> KiResult<T> {
        Err(KiError::Parse {
            msg: msg.into(),
            line: self.line,
            pos: self.pos - self.linestart,
        })
    }
}
/// Iterator protocol for [SexpLexer].
/// Not used during parsing, but often handy for testing.
/// Panics on Lexer errors.
impl<'s> Iterator for SexpLexer<'s> {
    type Item = Token;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().unwrap()
    }
}
/// Separator characters outside of string literals
fn is_space(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n' || c == '\r'
}
/// Location of a [Token] in the source string
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Start byte index (inclusive)
    pub start: usize,
    /// End byte index (exclusive)
    pub stop: usize,
    /// Line number
    pub line: usize,
}
/// Lexer Token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Source Location
    pub loc: SourceLocation,
    /// Token Type
    pub ttype: TokenType,
}
impl Token {
    /// Return a sub-string of input-string `src` over our locations
    pub fn substr<'src>(&self, src: &'src str) -> &'src str {
        &src[self.loc.start..self.loc.stop]
    }
}
/// Token Types Enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    Open,
    Close,
    StringLiteral,
    Atom,
}

/// Classify atom-text `txt` as a number, if it reads as a base-10 integer or float.
/// Excludes the `inf` and `nan` spellings accepted by [str::parse].
pub(crate) fn parse_number(txt: &str) -> Option<f64> {
    let bytes = txt.as_bytes();
    if !bytes.iter().any(u8::is_ascii_digit) {
        return None;
    }
    if !bytes
        .iter()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    txt.parse::<f64>().ok()
}

/// # S-Expression Parser
///
/// Builds a [Sexp] tree from the [Token]s of a [SexpLexer],
/// maintaining a stack of open lists.
///
pub struct SexpParser<'src> {
    /// Source string
    src: &'src str,
    /// Lexer
    lex: SexpLexer<'src>,
}
impl<'src> SexpParser<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            lex: SexpLexer::new(src),
        }
    }
    /// Parse our content into a single root list
    pub fn parse(&mut self) -> KiResult<Sexp> {
        let mut stack: Vec<Vec<Sexp>> = Vec::new();
        let mut root: Option<Sexp> = None;
        while let Some(tok) = self.lex.next_token()? {
            if root.is_some() {
                return self.fail(&tok, "Unexpected content after the root list");
            }
            let value = match tok.ttype {
                TokenType::Open => {
                    stack.push(Vec::new());
                    continue;
                }
                TokenType::Close => match stack.pop() {
                    Some(items) => Sexp::List(items),
                    None => return self.fail(&tok, "Unbalanced `)`"),
                },
                TokenType::StringLiteral => {
                    let txt = tok.substr(self.src);
                    Sexp::Str(unescape(&txt[1..txt.len() - 1]))
                }
                TokenType::Atom => {
                    let txt = tok.substr(self.src);
                    match parse_number(txt) {
                        Some(value) => Sexp::Number {
                            value,
                            text: txt.to_string(),
                        },
                        None => Sexp::Symbol(txt.to_string()),
                    }
                }
            };
            match stack.last_mut() {
                Some(parent) => parent.push(value),
                None if value.is_list() => root = Some(value),
                None => return self.fail(&tok, "Atom outside of any list"),
            }
        }
        if !stack.is_empty() {
            return self.lex.fail(format!(
                "Unbalanced `(`: {} list(s) left open at end of input",
                stack.len()
            ));
        }
        match root {
            Some(root) => Ok(root),
            None => self.lex.fail("No S-expression list in input"),
        }
    }
    /// Error-Generation Helper, reporting the location of [Token] `tok`
    fn fail<T>(&self, tok: &Token, msg: &str) -> KiResult<T> {
        let linestart = self.src[..tok.loc.start].rfind('\n').map_or(0, |i| i + 1);
        Err(KiError::Parse {
            msg: format!("{}: `{}`", msg, tok.substr(self.src)),
            line: tok.loc.line,
            pos: tok.loc.start - linestart,
        })
    }
}
/// Resolve escaped quotes in string-literal content
fn unescape(s: &str) -> String {
    s.replace("\\\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_lexes() -> KiResult<()> {
        let src = "(at 1.5 -2)\n  (layer \"F.Cu\")";
        let lex = SexpLexer::new(src);
        let toks: Vec<Token> = lex.collect();
        let strs: Vec<&str> = toks.iter().map(|t| t.substr(src)).collect();
        assert_eq!(
            strs,
            vec!["(", "at", "1.5", "-2", ")", "(", "layer", "\"F.Cu\"", ")"]
        );
        assert_eq!(toks[6].loc.line, 2);
        Ok(())
    }

    #[test]
    fn it_parses() -> KiResult<()> {
        let exp = parse_str("(kicad_pcb (version 20211014) (net 0 \"\") (layers (0 \"F.Cu\" signal)))")?;
        let items = exp.as_list().unwrap();
        assert_eq!(exp.tag(), Some("kicad_pcb"));
        assert_eq!(items.len(), 4);
        assert_eq!(items[1].int_at(1)?, 20211014);
        assert_eq!(items[2].at(2)?, &Sexp::string(""));
        let layer = items[3].at(1)?;
        assert_eq!(layer.int_at(0)?, 0);
        assert_eq!(layer.at(2)?, &Sexp::symbol("signal"));
        Ok(())
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number("10"), Some(10.0));
        assert_eq!(parse_number("-0.25"), Some(-0.25));
        assert_eq!(parse_number("+3"), Some(3.0));
        assert_eq!(parse_number("1e-3"), Some(0.001));
        assert_eq!(parse_number("2.5E2"), Some(250.0));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("F.Cu"), None);
        assert_eq!(parse_number("0x00010fc_ffffffff"), None);
        assert_eq!(parse_number("00000000-0000-0000-0000-000000000000"), None);
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn escaped_quotes() -> KiResult<()> {
        let exp = parse_str(r#"(property "Value" "say \"hi\" (now)")"#)?;
        assert_eq!(exp.text_at(2)?, r#"say "hi" (now)"#);
        // Newlines within strings are kept
        let exp = parse_str("(text \"a\nb\")")?;
        assert_eq!(exp.text_at(1)?, "a\nb");
        // Backslashes before other characters are kept as-is
        let exp = parse_str(r#"(uri "C:\lib\x.pretty")"#)?;
        assert_eq!(exp.text_at(1)?, r#"C:\lib\x.pretty"#);
        Ok(())
    }

    #[test]
    fn rejects_malformed() {
        let unbalanced_open = parse_str("(kicad_pcb (version 1)");
        assert!(matches!(unbalanced_open, Err(KiError::Parse { .. })));
        let unbalanced_close = parse_str("(kicad_pcb))");
        assert!(matches!(unbalanced_close, Err(KiError::Parse { .. })));
        let unterminated = parse_str("(title \"never closed)");
        assert!(matches!(unterminated, Err(KiError::Parse { line: 1, pos: 7, .. })));
        match parse_str("(a\n  (b \"open))") {
            Err(KiError::Parse { msg, line, .. }) => {
                assert_eq!(line, 2);
                assert!(msg.contains("\"open))"));
            }
            other => panic!("Expected a parse error, got {:?}", other),
        }
        assert!(parse_str("").is_err());
        assert!(parse_str("   \n ").is_err());
        assert!(parse_str("bare atom").is_err());
        assert!(parse_str("(a) (b)").is_err());
    }
}
