//!
//! # Design Rules
//!
//! Custom design rules of `.kicad_dru` files.
//! These files carry no root list: a `(version N)` form followed by `(rule ...)` forms.
//!

// Std-Lib
use std::fmt::Write;
use std::path::{Path, PathBuf};

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::document::KicadFile;
use crate::read::parse_str;
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::ErrorHelper;
use crate::write::{Endline, Indent, Quoted};
use crate::{KiError, KiResult};

/// # Rule Constraint
/// `(constraint TYPE [ITEMS ...] [(min V)] [(opt V)] [(max V)])`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Constraint {
    /// Constraint kind, e.g. `clearance`, `track_width` or `disallow`
    pub constraint_type: String,
    /// Bare-word arguments, e.g. the item kinds of a `disallow` constraint
    #[serde(default)]
    pub items: Vec<String>,
    /// Values keep their units, e.g. `0.2mm`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}
impl Default for Constraint {
    fn default() -> Self {
        Self {
            constraint_type: "clearance".into(),
            items: Vec::new(),
            min: None,
            opt: None,
            max: None,
        }
    }
}
impl FromSexpr for Constraint {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "constraint")?;
        let mut c = Self {
            constraint_type: list.text(1)?,
            ..Default::default()
        };
        for item in list.from(2) {
            match item.tag() {
                Some("min") => c.min = Some(item.text_at(1)?),
                Some("opt") => c.opt = Some(item.text_at(1)?),
                Some("max") => c.max = Some(item.text_at(1)?),
                Some(other) => list.skip(other),
                None => match item.as_text() {
                    Some(t) => c.items.push(t.to_string()),
                    None => return list.fail("empty constraint argument"),
                },
            }
        }
        Ok(c)
    }
}
impl ToSexpr for Constraint {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(constraint {}", Indent(indent), self.constraint_type)?;
        for item in &self.items {
            write!(out, " {}", item)?;
        }
        for (tag, val) in [("min", &self.min), ("opt", &self.opt), ("max", &self.max)] {
            if let Some(v) = val {
                write!(out, " ({} {})", tag, v)?;
            }
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

///
/// # Design Rule
///
/// A named set of constraints, applied to the items matching its condition.
/// Names are written the way they were read: quoted, or as a bare word.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rule {
    pub name: String,
    /// Whether `name` was a bare word rather than a quoted string
    #[serde(default)]
    pub bare_name: bool,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Layer selector: `outer`, `inner` or a layer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// `error`, `warning`, `ignore` or `exclusion`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}
impl FromSexpr for Rule {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "rule")?;
        let mut rule = Self {
            name: list.text(1)?,
            bare_name: list.get(1)?.as_symbol().is_some(),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "constraint" => rule.constraints.push(Constraint::from_sexpr(item)?),
                "condition" => rule.condition = Some(item.text_at(1)?),
                "layer" => rule.layer = Some(item.text_at(1)?),
                "severity" => rule.severity = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(rule)
    }
}
impl ToSexpr for Rule {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        match self.bare_name {
            true => writeln!(out, "{}(rule {}", ind, self.name)?,
            false => writeln!(out, "{}(rule {}", ind, Quoted(&self.name))?,
        }
        for c in &self.constraints {
            c.write_sexpr(out, indent + 2, true)?;
        }
        if let Some(cond) = &self.condition {
            writeln!(out, "{}  (condition {})", ind, Quoted(cond))?;
        }
        if let Some(layer) = &self.layer {
            match layer.as_str() {
                "outer" | "inner" => writeln!(out, "{}  (layer {})", ind, layer)?,
                _ => writeln!(out, "{}  (layer {})", ind, Quoted(layer))?,
            }
        }
        if let Some(sev) = &self.severity {
            writeln!(out, "{}  (severity {})", ind, sev)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Design Rules Document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DesignRules {
    pub version: i64,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}

impl DesignRules {
    /// Create an empty rule set
    pub fn create_new() -> Self {
        Self {
            version: 1,
            ..Default::default()
        }
    }
    /// Find a rule by name
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }
}
impl FromSexpr for DesignRules {
    /// Decode from the untagged list of all forms in the file,
    /// the first of which must be `(version N)`
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::new(exp)?;
        let first = list.get(0)?;
        if first.tag() != Some("version") {
            return Err(KiError::tag("version", first.describe()));
        }
        let mut dru = Self {
            version: first.int_at(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "rule" => dru.rules.push(Rule::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(dru)
    }
}
impl ToSexpr for DesignRules {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(version {})", Indent(indent), self.version)?;
        for rule in &self.rules {
            out.push_str("\n\n");
            rule.write_sexpr(out, indent, false)?;
        }
        write!(out, "{}", Endline(newline))?;
        Ok(())
    }
}
impl KicadFile for DesignRules {
    fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
    fn set_file_path(&mut self, path: Option<PathBuf>) {
        self.file_path = path;
    }
    /// Decode from the file's text, wrapping its forms in an outer list
    fn from_str(src: &str) -> KiResult<Self> {
        Self::from_sexpr(&parse_str(&format!("({})", src))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules() -> KiResult<()> {
        let src = concat!(
            "(version 1)\n",
            "\n",
            "(rule \"HV clearance\"\n",
            "  (constraint clearance (min 1.5mm))\n",
            "  (condition \"A.NetClass == 'HV'\")\n",
            "  (layer outer)\n",
            "  (severity error)\n",
            ")\n",
            "\n",
            "(rule no_vias_under_bga\n",
            "  (constraint disallow via micro_via)\n",
            "  (condition \"A.insideCourtyard('U1')\")\n",
            "  (layer \"F.Cu\")\n",
            ")\n"
        );
        let dru = DesignRules::from_str(src)?;
        assert_eq!(dru.version, 1);
        assert_eq!(dru.rules.len(), 2);
        let hv = dru.rule("HV clearance");
        assert_eq!(hv.and_then(|r| r.constraints[0].min.as_deref()), Some("1.5mm"));
        let bga = dru.rule("no_vias_under_bga");
        assert_eq!(bga.map(|r| r.bare_name), Some(true));
        assert_eq!(bga.map(|r| r.constraints[0].items.len()), Some(2));
        assert_eq!(dru.to_string()?, src);
        Ok(())
    }

    #[test]
    fn requires_version() -> KiResult<()> {
        assert!(matches!(
            DesignRules::from_str("(rule x (constraint clearance (min 1mm)))"),
            Err(KiError::Tag { .. })
        ));
        assert_eq!(DesignRules::create_new().to_string()?, "(version 1)\n");
        Ok(())
    }
}
