//!
//! # Document Files
//!
//! The [KicadFile] trait shared by the top-level documents:
//! boards, footprints, schematics, symbol libraries, worksheets, design rules and library tables.
//!

// Std-Lib
use std::path::{Path, PathBuf};

// Local Imports
use crate::read::{parse_str, read_source};
use crate::sexpr::{FromSexpr, ToSexpr};
use crate::{KiError, KiResult};

///
/// # KiCad Document File
///
/// Loading and saving for documents stored one per file.
/// Each document remembers the path it was loaded from,
/// which serves as the default destination for [KicadFile::to_file].
///
pub trait KicadFile: FromSexpr + ToSexpr + Sized {
    /// Path this document was loaded from or last assigned
    fn file_path(&self) -> Option<&Path>;
    /// Set the remembered file path
    fn set_file_path(&mut self, path: Option<PathBuf>);

    /// Decode from S-expression text `src`
    fn from_str(src: &str) -> KiResult<Self> {
        Self::from_sexpr(&parse_str(src)?)
    }
    /// Load from file `fname`, remembering its path
    fn from_file(fname: impl AsRef<Path>) -> KiResult<Self> {
        let fname = fname.as_ref();
        let src = read_source(fname)?;
        let mut doc = Self::from_str(&src)?;
        doc.set_file_path(Some(fname.to_path_buf()));
        log::debug!("Loaded {:?}", fname);
        Ok(doc)
    }
    /// Encode to a complete file's text
    fn to_string(&self) -> KiResult<String> {
        self.to_sexpr(0, true)
    }
    /// Save to `fname`, or to our remembered path if `fname` is `None`
    fn to_file(&self, fname: Option<&Path>) -> KiResult<()> {
        let fname = match (fname, self.file_path()) {
            (Some(p), _) => p,
            (None, Some(p)) => p,
            (None, None) => return Err(KiError::Config("File path not set".into())),
        };
        let text = self.to_string()?;
        std::fs::write(fname, text).map_err(|err| KiError::Io {
            path: fname.to_path_buf(),
            err,
        })?;
        log::debug!("Saved {:?}", fname);
        Ok(())
    }
}

/// Implement the path accessors of [KicadFile] for types with a `file_path: Option<PathBuf>` field
macro_rules! kicad_file {
    ($t:ty) => {
        impl $crate::KicadFile for $t {
            fn file_path(&self) -> Option<&::std::path::Path> {
                self.file_path.as_deref()
            }
            fn set_file_path(&mut self, path: Option<::std::path::PathBuf>) {
                self.file_path = path;
            }
        }
    };
}
pub(crate) use kicad_file;
