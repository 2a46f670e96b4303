//!
//! # Kicad21 KiCad S-Expression Parser & Writer
//!
//! KiCad stores its boards, schematics, symbol and footprint libraries, worksheets,
//! design rules and library tables as S-expression text.
//! Kicad21 reads each of these into a typed object tree, and writes that tree back out
//! in the same layout KiCad produces, such that unmodified files round-trip byte-for-byte.
//!
//! Each file passes through three forms:
//!
//! * Source text, tokenized by [read] into
//! * A tree of [Sexp] values, decoded by the [FromSexpr] implementations of each record into
//! * The typed documents: [Board], [Footprint], [Schematic], [SymbolLib], [WorkSheet], [DesignRules] and [LibTable].
//!
//! Writing runs directly from the typed tree to text, through each record's [ToSexpr] implementation.
//!
//! ## Usage
//!
//! ```skip
//! use kicad21::{Board, KicadFile};
//! let board = Board::from_file("demo.kicad_pcb")?;
//! board.to_file(Some("copy.kicad_pcb".as_ref()))?;
//! ```
//!
//! Creating a new schematic:
//!
//! ```
//! use kicad21::{KicadFile, Schematic};
//! let sch = Schematic::create_new();
//! let text = sch.to_string().unwrap();
//! assert!(text.starts_with("(kicad_sch"));
//! ```
//!
//! ## Alternate Serialization
//!
//! Every document is [serde]-serializable, and can be saved as JSON, YAML or TOML
//! through [SerdeFile](kicad21utils::SerdeFile).
//!

// Internal modules
pub mod board;
pub mod document;
pub mod dru;
pub mod error;
pub mod footprint;
pub mod items;
pub mod libtable;
pub mod read;
pub mod schematic;
pub mod sexpr;
pub mod symbol;
pub mod wks;
pub mod write;

// Re-exports
pub use board::Board;
pub use document::KicadFile;
pub use dru::DesignRules;
pub use error::{KiError, KiResult};
pub use footprint::Footprint;
pub use items::schitems::{HierarchicalSheetProjectPath, SymbolProjectPath};
pub use libtable::{LibTable, LibTableKind};
pub use schematic::Schematic;
pub use sexpr::{FromSexpr, Sexp, ToSexpr};
pub use symbol::{Symbol, SymbolLib};
pub use wks::WorkSheet;

// Internal utilities
use kicad21utils as utils;
use utils::SerdeFile;

impl SerdeFile for Board {}
impl SerdeFile for Footprint {}
impl SerdeFile for Schematic {}
impl SerdeFile for SymbolLib {}
impl SerdeFile for WorkSheet {}
impl SerdeFile for DesignRules {}
impl SerdeFile for LibTable {}

#[cfg(test)]
mod tests;
