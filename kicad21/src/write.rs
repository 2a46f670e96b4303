//!
//! # S-Expression Writing Helpers
//!
//! Formatting helpers shared by every record's [crate::ToSexpr] implementation.
//! Records append to a single [String] buffer; the types here implement [std::fmt::Display]
//! so they can be used directly in `write!` invocations.
//!

use std::borrow::Cow;
use std::fmt;

/// Escape string `s` for inclusion between double-quotes.
/// Every `"` becomes `\"`. No other characters are altered.
pub fn escape(s: &str) -> Cow<'_, str> {
    if s.contains('"') {
        Cow::Owned(s.replace('"', "\\\""))
    } else {
        Cow::Borrowed(s)
    }
}

/// Quoted and escaped string
pub struct Quoted<'a>(pub &'a str);
impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", escape(self.0))
    }
}

/// Indentation, as a count of spaces
#[derive(Debug, Clone, Copy)]
pub struct Indent(pub usize);
impl Indent {
    /// Get a new [Indent], `n` spaces further in
    pub fn add(self, n: usize) -> Self {
        Self(self.0 + n)
    }
}
impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:w$}", "", w = self.0)
    }
}

/// Optional trailing newline
#[derive(Debug, Clone, Copy)]
pub struct Endline(pub bool);
impl fmt::Display for Endline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 {
            write!(f, "\n")
        } else {
            Ok(())
        }
    }
}

/// KiCad `yes`/`no` boolean
pub struct YesNo(pub bool);
impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "yes" } else { "no" })
    }
}

/// Optional angle, written with a leading space when present
pub struct OptAngle(pub Option<f64>);
impl fmt::Display for OptAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(a) => write!(f, " {}", a),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_only() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape(r#"a "b" c"#), r#"a \"b\" c"#);
        assert_eq!(escape(r"back\slash"), r"back\slash");
        assert_eq!(Quoted(r#"x"y"#).to_string(), r#""x\"y""#);
    }

    #[test]
    fn layout_helpers() {
        assert_eq!(format!("{}(at", Indent(4)), "    (at");
        assert_eq!(format!("{})", Indent(0)), ")");
        assert_eq!(Indent(2).add(2).0, 4);
        assert_eq!(format!("x{}", Endline(true)), "x\n");
        assert_eq!(format!("x{}", Endline(false)), "x");
        assert_eq!(format!("(in_bom {})", YesNo(true)), "(in_bom yes)");
        assert_eq!(format!("(at 1 2{})", OptAngle(Some(90.0))), "(at 1 2 90)");
        assert_eq!(format!("(at 1 2{})", OptAngle(None)), "(at 1 2)");
    }
}
