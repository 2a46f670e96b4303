//!
//! # Dimensions
//!
//! Board measurement annotations: aligned, orthogonal, radial, center and leader dimensions.
//!

// Std-Lib
use std::fmt::Write;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use super::common::{decode_pts, Position};
use super::gritems::GrText;
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::{enumstr, ErrorHelper};
use crate::write::{Endline, Indent, Quoted};
use crate::KiResult;

enumstr!(
    /// # Dimension Types
    DimensionType {
        Aligned: "aligned",
        Leader: "leader",
        Center: "center",
        Orthogonal: "orthogonal",
        Radial: "radial",
    }
);
impl Default for DimensionType {
    fn default() -> Self {
        Self::Aligned
    }
}

/// # Dimension Value Format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DimensionFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Units: 0 inches, 1 mils, 2 millimeters, 3 automatic
    pub units: i64,
    /// Units suffix: 0 none, 1 bare, 2 parenthesized
    pub units_format: i64,
    /// Number of digits after the decimal point
    pub precision: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_value: Option<String>,
    #[serde(default)]
    pub suppress_zeroes: bool,
}
impl Default for DimensionFormat {
    fn default() -> Self {
        Self {
            prefix: None,
            suffix: None,
            units: 3,
            units_format: 1,
            precision: 4,
            override_value: None,
            suppress_zeroes: false,
        }
    }
}
impl FromSexpr for DimensionFormat {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "format")?;
        let mut format = Self {
            suppress_zeroes: list.has_flag("suppress_zeroes"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "prefix" => format.prefix = Some(item.text_at(1)?),
                "suffix" => format.suffix = Some(item.text_at(1)?),
                "units" => format.units = item.int_at(1)?,
                "units_format" => format.units_format = item.int_at(1)?,
                "precision" => format.precision = item.int_at(1)?,
                "override_value" => format.override_value = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(format)
    }
}
impl ToSexpr for DimensionFormat {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(format", Indent(indent))?;
        if let Some(p) = &self.prefix {
            write!(out, " (prefix {})", Quoted(p))?;
        }
        if let Some(s) = &self.suffix {
            write!(out, " (suffix {})", Quoted(s))?;
        }
        write!(
            out,
            " (units {}) (units_format {}) (precision {})",
            self.units, self.units_format, self.precision
        )?;
        if let Some(v) = &self.override_value {
            write!(out, " (override_value {})", Quoted(v))?;
        }
        if self.suppress_zeroes {
            out.push_str(" suppress_zeroes");
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Dimension Style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DimensionStyle {
    pub thickness: f64,
    pub arrow_length: f64,
    /// Text position: 0 outside, 1 inline, 2 manual
    pub text_position_mode: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_height: Option<f64>,
    /// Frame around leader text: 0 none, 1 rectangle, 2 circle, 3 rounded rectangle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_frame: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_offset: Option<f64>,
    #[serde(default)]
    pub keep_text_aligned: bool,
}
impl Default for DimensionStyle {
    fn default() -> Self {
        Self {
            thickness: 0.15,
            arrow_length: 1.27,
            text_position_mode: 0,
            extension_height: None,
            text_frame: None,
            extension_offset: None,
            keep_text_aligned: false,
        }
    }
}
impl FromSexpr for DimensionStyle {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "style")?;
        let mut style = Self {
            keep_text_aligned: list.has_flag("keep_text_aligned"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "thickness" => style.thickness = item.num_at(1)?,
                "arrow_length" => style.arrow_length = item.num_at(1)?,
                "text_position_mode" => style.text_position_mode = item.int_at(1)?,
                "extension_height" => style.extension_height = Some(item.num_at(1)?),
                "text_frame" => style.text_frame = Some(item.int_at(1)?),
                "extension_offset" => style.extension_offset = Some(item.num_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(style)
    }
}
impl ToSexpr for DimensionStyle {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(style (thickness {}) (arrow_length {}) (text_position_mode {})",
            Indent(indent),
            self.thickness,
            self.arrow_length,
            self.text_position_mode
        )?;
        if let Some(h) = self.extension_height {
            write!(out, " (extension_height {})", h)?;
        }
        if let Some(f) = self.text_frame {
            write!(out, " (text_frame {})", f)?;
        }
        if let Some(o) = self.extension_offset {
            write!(out, " (extension_offset {})", o)?;
        }
        if self.keep_text_aligned {
            out.push_str(" keep_text_aligned");
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Dimension
///
/// The measured points are given by `pts`, two for all types.
/// Center dimensions carry no text, format or style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Dimension {
    #[serde(default)]
    pub locked: bool,
    pub dimension_type: DimensionType,
    pub layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    pub pts: Vec<Position>,
    /// Distance of the crossbar from the measured points. Aligned and orthogonal types only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// 0 horizontal, 1 vertical. Orthogonal type only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<i64>,
    /// Radial type only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<GrText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DimensionFormat>,
    pub style: DimensionStyle,
}
impl FromSexpr for Dimension {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "dimension")?;
        let mut dim = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "type" => dim.dimension_type = item.keyword_at(1)?,
                "layer" => dim.layer = item.text_at(1)?,
                "tstamp" => dim.tstamp = Some(item.text_at(1)?),
                "pts" => dim.pts = decode_pts(item)?,
                "height" => dim.height = Some(item.num_at(1)?),
                "orientation" => dim.orientation = Some(item.int_at(1)?),
                "leader_length" => dim.leader_length = Some(item.num_at(1)?),
                "gr_text" => dim.text = Some(GrText::from_sexpr(item)?),
                "format" => dim.format = Some(DimensionFormat::from_sexpr(item)?),
                "style" => dim.style = DimensionStyle::from_sexpr(item)?,
                _ => list.skip(tag),
            }
        }
        list.assert(dim.pts.len() == 2, "expected two measured points")?;
        Ok(dim)
    }
}
impl ToSexpr for Dimension {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(dimension", ind)?;
        if self.locked {
            out.push_str(" locked");
        }
        write!(
            out,
            " (type {}) (layer {})",
            self.dimension_type,
            Quoted(&self.layer)
        )?;
        if let Some(t) = &self.tstamp {
            write!(out, " (tstamp {})", t)?;
        }
        write!(out, "\n{}  (pts", ind)?;
        for pt in &self.pts {
            write!(out, " {}", pt.xy("xy"))?;
        }
        out.push_str(")\n");
        if let Some(h) = self.height {
            writeln!(out, "{}  (height {})", ind, h)?;
        }
        if let Some(o) = self.orientation {
            writeln!(out, "{}  (orientation {})", ind, o)?;
        }
        if let Some(l) = self.leader_length {
            writeln!(out, "{}  (leader_length {})", ind, l)?;
        }
        if let Some(text) = &self.text {
            text.write_sexpr(out, indent + 2, true)?;
        }
        if let Some(format) = &self.format {
            format.write_sexpr(out, indent + 2, true)?;
        }
        self.style.write_sexpr(out, indent + 2, true)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;
    use crate::KiError;

    #[test]
    fn aligned_dimension() -> KiResult<()> {
        let src = concat!(
            "(dimension locked (type aligned) (layer \"Dwgs.User\") (tstamp 3b1e)\n",
            "  (pts (xy 10 20) (xy 30 20))\n",
            "  (height -2.5)\n",
            "  (gr_text \"20 mm\" (at 20 16.35) (layer \"Dwgs.User\") (tstamp 7c2a)\n",
            "    (effects (font (size 1 1) (thickness 0.15)))\n",
            "  )\n",
            "  (format (suffix \" mm\") (units 2) (units_format 0) (precision 2) suppress_zeroes)\n",
            "  (style (thickness 0.15) (arrow_length 1.27) (text_position_mode 0) (extension_height 0.58642) (extension_offset 0.5) keep_text_aligned)\n",
            ")"
        );
        let dim = Dimension::from_sexpr(&parse_str(src)?)?;
        assert!(dim.locked);
        assert_eq!(dim.dimension_type, DimensionType::Aligned);
        assert_eq!(dim.height, Some(-2.5));
        let format = dim.format.as_ref().unwrap();
        assert_eq!(format.suffix.as_deref(), Some(" mm"));
        assert!(format.suppress_zeroes);
        assert!(dim.style.keep_text_aligned);
        assert_eq!(dim.to_sexpr(0, false)?, src);
        Ok(())
    }

    #[test]
    fn center_dimension() -> KiResult<()> {
        let src = concat!(
            "  (dimension (type center) (layer \"F.SilkS\")\n",
            "    (pts (xy 0 0) (xy 1 1))\n",
            "    (style (thickness 0.1) (arrow_length 1.27) (text_position_mode 0))\n",
            "  )\n"
        );
        let dim = Dimension::from_sexpr(&parse_str(src)?)?;
        assert_eq!(dim.dimension_type, DimensionType::Center);
        assert!(dim.text.is_none());
        assert_eq!(dim.to_sexpr(2, true)?, src);
        Ok(())
    }

    #[test]
    fn bad_dimensions() -> KiResult<()> {
        let bad_type = parse_str("(dimension (type diagonal) (layer x) (pts (xy 0 0) (xy 1 1)))")?;
        assert!(matches!(Dimension::from_sexpr(&bad_type), Err(KiError::Format(_))));
        let one_point = parse_str("(dimension (type leader) (layer x) (pts (xy 0 0)))")?;
        assert!(Dimension::from_sexpr(&one_point).is_err());
        Ok(())
    }
}
