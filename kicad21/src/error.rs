//!
//! # Kicad21 Error Types
//!

use std::path::PathBuf;

/// # Kicad21 Error Type
#[derive(Debug)]
pub enum KiError {
    /// File-system failures, and paths which are not regular files
    Io { path: PathBuf, err: std::io::Error },
    /// Tokenizer errors: unbalanced parentheses, unterminated strings
    Parse { msg: String, line: usize, pos: usize },
    /// A list's leading tag does not match what its decoder expects
    Tag { expected: String, found: String },
    /// Other structural-shape errors
    Format(String),
    /// Writing a document with no destination path
    Config(String),
    /// Constructs which are intentionally not modeled
    Unsupported(String),
    /// Wrapped foreign errors
    Boxed(Box<dyn std::error::Error + Send + Sync>),
    /// Free-form string errors
    Str(String),
}
impl KiError {
    /// Create a [KiError::Tag] for a decoder expecting tag `expected`
    pub fn tag(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Tag {
            expected: expected.into(),
            found: found.into(),
        }
    }
    /// Create a [KiError::Format] from message `msg`
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
    /// Create an IO-kind error for `path`, from message `msg`
    pub(crate) fn io(path: impl Into<PathBuf>, msg: &str) -> Self {
        Self::Io {
            path: path.into(),
            err: std::io::Error::new(std::io::ErrorKind::InvalidInput, msg.to_string()),
        }
    }
}
impl std::fmt::Display for KiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, err } => write!(f, "IO error on {:?}: {}", path, err),
            Self::Parse { msg, line, pos } => {
                write!(f, "Parse error at line {}, position {}: {}", line, pos, msg)
            }
            Self::Tag { expected, found } => {
                write!(f, "Expected a `{}` expression, found `{}`", expected, found)
            }
            Self::Format(msg) => write!(f, "Format error: {}", msg),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
            Self::Boxed(e) => write!(f, "{}", e),
            Self::Str(msg) => write!(f, "{}", msg),
        }
    }
}
impl std::error::Error for KiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { err, .. } => Some(err),
            Self::Boxed(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
impl From<kicad21utils::ser::Error> for KiError {
    fn from(e: kicad21utils::ser::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<std::io::Error> for KiError {
    fn from(e: std::io::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<std::fmt::Error> for KiError {
    fn from(e: std::fmt::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<String> for KiError {
    fn from(e: String) -> Self {
        Self::Str(e)
    }
}
impl From<&str> for KiError {
    fn from(e: &str) -> Self {
        Self::Str(e.into())
    }
}

/// Kicad21 Library-Wide Result Type
pub type KiResult<T> = Result<T, KiError>;
