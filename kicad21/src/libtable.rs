//!
//! # Library Tables
//!
//! The `fp-lib-table` and `sym-lib-table` files, mapping library nicknames to their locations.
//!

// Std-Lib
use std::fmt::Write;
use std::path::PathBuf;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::document::kicad_file;
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::enumstr;
use crate::write::{Endline, Indent, Quoted};
use crate::KiResult;

enumstr!(
    /// # Library Table Kinds
    LibTableKind {
        Footprint: "fp_lib_table",
        Symbol: "sym_lib_table",
    }
);
impl Default for LibTableKind {
    fn default() -> Self {
        Self::Symbol
    }
}

/// # Library Table Entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Library {
    /// Nickname, the library part of `library:entry` identifiers
    pub name: String,
    /// Plugin type, e.g. `KiCad` or `Legacy`
    pub lib_type: String,
    /// Location, which may hold `${VARIABLE}` references
    pub uri: String,
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub description: String,
    /// Disabled libraries are written with a `(disabled)` flag
    pub active: bool,
    #[serde(default)]
    pub hidden: bool,
}
impl Default for Library {
    fn default() -> Self {
        Self {
            name: String::new(),
            lib_type: "KiCad".into(),
            uri: String::new(),
            options: String::new(),
            description: String::new(),
            active: true,
            hidden: false,
        }
    }
}
impl FromSexpr for Library {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "lib")?;
        let mut lib = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "name" => lib.name = item.text_at(1)?,
                "type" => lib.lib_type = item.text_at(1)?,
                "uri" => lib.uri = item.text_at(1)?,
                "options" => lib.options = item.text_at(1)?,
                "descr" => lib.description = item.text_at(1)?,
                "disabled" => lib.active = false,
                "hidden" => lib.hidden = true,
                _ => list.skip(tag),
            }
        }
        Ok(lib)
    }
}
impl ToSexpr for Library {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(lib (name {})(type {})(uri {})(options {})(descr {})",
            Indent(indent),
            Quoted(&self.name),
            Quoted(&self.lib_type),
            Quoted(&self.uri),
            Quoted(&self.options),
            Quoted(&self.description)
        )?;
        if !self.active {
            out.push_str("(disabled)");
        }
        if self.hidden {
            out.push_str("(hidden)");
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Library Table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LibTable {
    pub kind: LibTableKind,
    /// Absent in tables written before KiCad 7
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default)]
    pub libs: Vec<Library>,
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}
kicad_file!(LibTable);

impl LibTable {
    /// Create an empty table of `kind`
    pub fn create_new(kind: LibTableKind) -> Self {
        Self {
            kind,
            version: Some(7),
            ..Default::default()
        }
    }
    /// Find a library by nickname
    pub fn lib(&self, name: &str) -> Option<&Library> {
        self.libs.iter().find(|l| l.name == name)
    }
}
impl FromSexpr for LibTable {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect_any(exp, &["fp_lib_table", "sym_lib_table"])?;
        let mut table = Self {
            kind: list.keyword(0)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "version" => table.version = Some(item.int_at(1)?),
                "lib" => table.libs.push(Library::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(table)
    }
}
impl ToSexpr for LibTable {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}({}", ind, self.kind)?;
        if let Some(v) = self.version {
            writeln!(out, "{}  (version {})", ind, v)?;
        }
        for lib in &self.libs {
            lib.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KicadFile;

    #[test]
    fn quoted_fields() -> KiResult<()> {
        let mut table = LibTable {
            kind: LibTableKind::Footprint,
            ..Default::default()
        };
        table.libs.push(Library {
            name: "object1".into(),
            uri: "${KIPRJMOD}/my/library.pretty".into(),
            options: r#"Some options with "quoted strings""#.into(),
            description: r#"Some description with "quoted strings""#.into(),
            active: false,
            ..Default::default()
        });
        let text = table.to_string()?;
        assert_eq!(
            text,
            concat!(
                "(fp_lib_table\n",
                r#"  (lib (name "object1")(type "KiCad")(uri "${KIPRJMOD}/my/library.pretty")"#,
                r#"(options "Some options with \"quoted strings\"")"#,
                r#"(descr "Some description with \"quoted strings\"")(disabled))"#,
                "\n)\n"
            )
        );
        assert_eq!(LibTable::from_str(&text)?, table);
        Ok(())
    }

    #[test]
    fn new_tables() -> KiResult<()> {
        let table = LibTable::create_new(LibTableKind::Symbol);
        assert_eq!(table.to_string()?, "(sym_lib_table\n  (version 7)\n)\n");
        assert!(LibTable::from_str("(lib_table)").is_err());
        Ok(())
    }
}
