//!
//! # Kicad21 Error-Helper Utilities
//!
//! ```rust
//! use kicad21utils::error::{ErrorHelper, Unwrapper};
//!
//! /// Example implementer of [`ErrorHelper`], reporting the tag of the list being decoded.
//! struct ListDecoder {
//!     tag: &'static str,
//! }
//! impl ErrorHelper for ListDecoder {
//!     type Error = String;
//!
//!     fn err(&self, msg: impl Into<String>) -> Self::Error {
//!         format!("({} ...): {}", self.tag, msg.into())
//!     }
//! }
//! impl ListDecoder {
//!     fn decode(&self, width: Option<f64>) -> Result<f64, String> {
//!         let width = width.unwrapper(self, "missing width")?;
//!         self.assert(width >= 0.0, "negative width")?;
//!         Ok(width)
//!     }
//! }
//! assert_eq!(ListDecoder { tag: "stroke" }.decode(None), Err("(stroke ...): missing width".to_string()));
//! ```
//!

///
/// # ErrorHelper
///
/// Helper trait for re-use among the many record decoders.
/// Each implementer generally has some internal state to report upon failure,
/// which it injects in the required `err` method.
///
pub trait ErrorHelper {
    type Error;

    /// Create and return a [Self::Error] value.
    fn err(&self, msg: impl Into<String>) -> Self::Error;
    /// Return failure
    fn fail<T>(&self, msg: impl Into<String>) -> Result<T, Self::Error> {
        Err(self.err(msg))
    }
    /// Unwrap the [Option] `opt` if it is [Some], and return our error if not.
    fn unwrap<T>(&self, opt: Option<T>, msg: impl Into<String>) -> Result<T, Self::Error> {
        match opt {
            Some(val) => Ok(val),
            None => self.fail(msg),
        }
    }
    /// Assert a boolean condition. Returns through `self.fail` if it is not satisfied.
    fn assert(&self, b: bool, msg: impl Into<String>) -> Result<(), Self::Error> {
        match b {
            true => Ok(()),
            false => self.fail(msg),
        }
    }
}

///
/// # Unwrapper
///
/// Post-fix application of [`ErrorHelper`] handling to [`Option`]s and [`Result`]s.
/// Routes failures to the helper's `fail` rather than panicking.
///
pub trait Unwrapper {
    type Ok;
    fn unwrapper<H>(self, helper: &H, msg: impl Into<String>) -> Result<Self::Ok, H::Error>
    where
        H: ErrorHelper;
}

impl<T> Unwrapper for Option<T> {
    type Ok = T;
    fn unwrapper<H>(self, helper: &H, msg: impl Into<String>) -> Result<Self::Ok, H::Error>
    where
        H: ErrorHelper,
    {
        match self {
            Some(t) => Ok(t),
            None => helper.fail(msg),
        }
    }
}

/// Note the original error of a failed [`Result`] is discarded, replaced by `msg`.
impl<T, E> Unwrapper for Result<T, E> {
    type Ok = T;
    fn unwrapper<H>(
        self,
        helper: &H,
        msg: impl Into<String>,
    ) -> Result<<Self as Unwrapper>::Ok, H::Error>
    where
        H: ErrorHelper,
    {
        match self {
            Ok(t) => Ok(t),
            Err(_) => helper.fail(msg),
        }
    }
}
