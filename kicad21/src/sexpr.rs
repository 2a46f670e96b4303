//!
//! # S-Expression Value Model
//!
//! The nested-list representation produced by the tokenizer in [crate::read],
//! and the [FromSexpr] / [ToSexpr] traits implemented by every KiCad record.
//!

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::utils::{EnumStr, ErrorHelper};
use crate::{KiError, KiResult};

///
/// # S-Expression Value
///
/// Atoms retain their source text. Numeric atoms additionally carry their parsed value,
/// so that fields such as timestamps or rule names which merely *look* numeric
/// can be re-emitted exactly as written.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum Sexp {
    /// Bare-word atom, e.g. `locked` or `F.Cu`
    Symbol(String),
    /// Numeric atom
    Number { value: f64, text: String },
    /// Quoted string, with escaped quotes resolved
    Str(String),
    /// Parenthesized list
    List(Vec<Sexp>),
}
impl Sexp {
    /// Create a bare-word atom
    pub fn symbol(s: impl Into<String>) -> Self {
        Self::Symbol(s.into())
    }
    /// Create a quoted-string value
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }
    /// Create a numeric atom, with its shortest round-trip text
    pub fn number(value: f64) -> Self {
        Self::Number {
            value,
            text: value.to_string(),
        }
    }
    /// Get our elements, if we are a list
    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
    /// Get our text, if we are a bare-word (non-numeric) atom
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }
    /// Get our source text, for any atom or string.
    /// Numeric atoms return their text as written.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) | Self::Str(s) => Some(s),
            Self::Number { text, .. } => Some(text),
            Self::List(_) => None,
        }
    }
    /// Get our numeric value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number { value, .. } => Some(*value),
            _ => None,
        }
    }
    /// Get our integer value. Fails for non-integral numbers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number { value, text } => match text.parse::<i64>() {
                Ok(i) => Some(i),
                Err(_) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
                    Some(*value as i64)
                }
                Err(_) => None,
            },
            _ => None,
        }
    }
    /// Get our tag: the leading bare-word of a list
    pub fn tag(&self) -> Option<&str> {
        self.as_list()?.first()?.as_symbol()
    }
    /// Boolean indication of whether we are the bare-word `s`
    pub fn is_symbol(&self, s: &str) -> bool {
        self.as_symbol() == Some(s)
    }
    /// Boolean indication of whether we are a list
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            Self::List(items) => match items.first() {
                Some(first) => match first.as_text() {
                    Some(t) => t.to_string(),
                    None => "(nested list)".to_string(),
                },
                None => "()".to_string(),
            },
            Self::Str(s) => format!("\"{}\"", s),
            Self::Symbol(s) => s.clone(),
            Self::Number { text, .. } => text.clone(),
        }
    }
    /// Get element `idx` of a list
    pub fn at(&self, idx: usize) -> KiResult<&Sexp> {
        SexpList::new(self)?.get(idx)
    }
    /// Get the text of element `idx` of a list
    pub fn text_at(&self, idx: usize) -> KiResult<String> {
        SexpList::new(self)?.text(idx)
    }
    /// Get the numeric value of element `idx` of a list
    pub fn num_at(&self, idx: usize) -> KiResult<f64> {
        SexpList::new(self)?.num(idx)
    }
    /// Get the integer value of element `idx` of a list
    pub fn int_at(&self, idx: usize) -> KiResult<i64> {
        SexpList::new(self)?.int(idx)
    }
    /// Get the `yes`/`no` value of element `idx` of a list
    pub fn yes_no_at(&self, idx: usize) -> KiResult<bool> {
        SexpList::new(self)?.yes_no(idx)
    }
    /// Get the keyword value of element `idx` of a list
    pub fn keyword_at<E: EnumStr>(&self, idx: usize) -> KiResult<E> {
        SexpList::new(self)?.keyword(idx)
    }
}
/// Compact single-line text form. Not the canonical KiCad layout.
impl std::fmt::Display for Sexp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbol(s) => write!(f, "{}", s),
            Self::Number { text, .. } => write!(f, "{}", text),
            Self::Str(s) => write!(f, "{}", crate::write::Quoted(s)),
            Self::List(items) => {
                write!(f, "(")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

///
/// # Tagged-List Decoding View
///
/// Borrowed view of a list and its tag, used by record decoders
/// to pull positional values with errors naming the list.
///
#[derive(Debug, Clone, Copy)]
pub struct SexpList<'a> {
    /// Leading tag
    pub tag: &'a str,
    /// All elements, including the tag
    pub items: &'a [Sexp],
}
impl<'a> SexpList<'a> {
    /// View `exp` as a list. The tag is empty if the first element is not a bare-word.
    pub fn new(exp: &'a Sexp) -> KiResult<Self> {
        match exp {
            Sexp::List(items) => Ok(Self {
                tag: items.first().and_then(Sexp::as_text).unwrap_or(""),
                items,
            }),
            _ => Err(KiError::format(format!(
                "Expected a list, found atom `{}`",
                exp.describe()
            ))),
        }
    }
    /// View `exp` as a list tagged `tag`, failing with [KiError::Tag] otherwise
    pub fn expect(exp: &'a Sexp, tag: &str) -> KiResult<Self> {
        match exp.tag() {
            Some(t) if t == tag => Self::new(exp),
            _ => Err(KiError::tag(tag, exp.describe())),
        }
    }
    /// View `exp` as a list with any of the tags in `tags`
    pub fn expect_any(exp: &'a Sexp, tags: &[&str]) -> KiResult<Self> {
        match exp.tag() {
            Some(t) if tags.contains(&t) => Self::new(exp),
            _ => Err(KiError::tag(tags.join("|"), exp.describe())),
        }
    }
    /// Number of elements, including the tag
    pub fn len(&self) -> usize {
        self.items.len()
    }
    /// Elements after the tag
    pub fn args(&self) -> &'a [Sexp] {
        self.items.get(1..).unwrap_or(&[])
    }
    /// Elements starting at index `idx`
    pub fn from(&self, idx: usize) -> &'a [Sexp] {
        self.items.get(idx..).unwrap_or(&[])
    }
    /// Get element `idx`
    pub fn get(&self, idx: usize) -> KiResult<&'a Sexp> {
        match self.items.get(idx) {
            Some(item) => Ok(item),
            None => self.fail(format!("missing value at position {}", idx)),
        }
    }
    /// Get the text of atom or string `idx`
    pub fn text(&self, idx: usize) -> KiResult<String> {
        let item = self.get(idx)?;
        match item.as_text() {
            Some(t) => Ok(t.to_string()),
            None => self.fail(format!("expected text at position {}, found a list", idx)),
        }
    }
    /// Get the numeric value of atom `idx`
    pub fn num(&self, idx: usize) -> KiResult<f64> {
        let item = self.get(idx)?;
        match item.as_f64() {
            Some(v) => Ok(v),
            None => self.fail(format!(
                "expected a number at position {}, found `{}`",
                idx,
                item.describe()
            )),
        }
    }
    /// Get the integer value of atom `idx`
    pub fn int(&self, idx: usize) -> KiResult<i64> {
        let item = self.get(idx)?;
        match item.as_i64() {
            Some(v) => Ok(v),
            None => self.fail(format!(
                "expected an integer at position {}, found `{}`",
                idx,
                item.describe()
            )),
        }
    }
    /// Get the numeric value of atom `idx`, if present and numeric
    pub fn opt_num(&self, idx: usize) -> Option<f64> {
        self.items.get(idx).and_then(Sexp::as_f64)
    }
    /// Get a `yes`/`no` (or `true`/`false`) value at `idx`
    pub fn yes_no(&self, idx: usize) -> KiResult<bool> {
        match self.get(idx)?.as_text() {
            Some("yes") | Some("true") => Ok(true),
            Some("no") | Some("false") => Ok(false),
            _ => self.fail(format!("expected yes/no at position {}", idx)),
        }
    }
    /// Get the [EnumStr] keyword at `idx`
    pub fn keyword<E: EnumStr>(&self, idx: usize) -> KiResult<E> {
        let txt = self.text(idx)?;
        match E::from_str(&txt) {
            Some(e) => Ok(e),
            None => self.fail(format!(
                "invalid value `{}`, expected one of {:?}",
                txt,
                E::keywords()
            )),
        }
    }
    /// Boolean indication of whether bare-word `flag` appears anywhere among our elements
    pub fn has_flag(&self, flag: &str) -> bool {
        self.args().iter().any(|i| i.is_symbol(flag))
    }
    /// Iterate over our nested lists which carry a tag, paired with the tag
    pub fn children(&self) -> impl Iterator<Item = (&'a str, &'a Sexp)> + 'a {
        self.args()
            .iter()
            .filter_map(|item| item.tag().map(|tag| (tag, item)))
    }
    /// Log and skip an unrecognized child tag
    pub fn skip(&self, child: &str) {
        log::trace!("Ignoring unknown `{}` in `{}`", child, self.tag);
    }
}
impl ErrorHelper for SexpList<'_> {
    type Error = KiError;
    fn err(&self, msg: impl Into<String>) -> KiError {
        KiError::Format(format!("({} ...): {}", self.tag, msg.into()))
    }
}

/// # Decoding from S-Expression Values
pub trait FromSexpr: Sized {
    /// Decode from value `exp`, verifying its tag
    fn from_sexpr(exp: &Sexp) -> KiResult<Self>;
}

/// # Encoding to S-Expression Text
pub trait ToSexpr {
    /// Append our text to `out`, starting with `indent` spaces.
    /// A trailing newline is written if `newline` is set.
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()>;
    /// Encode to a new [String]
    fn to_sexpr(&self, indent: usize, newline: bool) -> KiResult<String> {
        let mut out = String::new();
        self.write_sexpr(&mut out, indent, newline)?;
        Ok(out)
    }
}

/// Decode each element of `items` as a `T`
pub fn decode_all<T: FromSexpr>(items: &[Sexp]) -> KiResult<Vec<T>> {
    items.iter().map(T::from_sexpr).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;

    #[test]
    fn numeric_text_is_kept() -> KiResult<()> {
        let exp = parse_str("(tstamp 5E3 1.50 -2)")?;
        let list = SexpList::expect(&exp, "tstamp")?;
        assert_eq!(list.text(1)?, "5E3");
        assert_eq!(list.num(1)?, 5000.0);
        assert_eq!(list.text(2)?, "1.50");
        assert_eq!(list.int(3)?, -2);
        assert!(list.int(2).is_err());
        Ok(())
    }

    #[test]
    fn tag_mismatch() -> KiResult<()> {
        let exp = parse_str("(stroke (width 0))")?;
        match SexpList::expect(&exp, "fill") {
            Err(KiError::Tag { expected, found }) => {
                assert_eq!(expected, "fill");
                assert_eq!(found, "stroke");
            }
            other => panic!("Unexpected {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn flags_and_children() -> KiResult<()> {
        let exp = parse_str(r#"(group "g" locked (id 1) (members a b))"#)?;
        let list = SexpList::new(&exp)?;
        assert!(list.has_flag("locked"));
        assert!(!list.has_flag("g"));
        let tags: Vec<&str> = list.children().map(|(t, _)| t).collect();
        assert_eq!(tags, vec!["id", "members"]);
        assert_eq!(exp.to_string(), r#"(group "g" locked (id 1) (members a b))"#);
        Ok(())
    }
}
