//!
//! # Board Graphical Items
//!
//! Free-standing text and shapes placed directly on a board, i.e. outside of any footprint.
//! Every shape carries either a legacy `(width W)` or a `(stroke ...)`, see [LineWidth].
//!

// Std-Lib
use std::fmt::Write;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use super::common::{decode_pts, Effects, LineWidth, Position, RenderCache};
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::ErrorHelper;
use crate::write::{Endline, Indent, Quoted};
use crate::KiResult;

/// Write the optional `(layer "L")`, `width`, `(fill F)` and `(tstamp T)` tail shared by most shapes
fn write_tail(
    out: &mut String,
    layer: &Option<String>,
    width: &Option<LineWidth>,
    fill: &Option<String>,
    tstamp: &Option<String>,
) -> KiResult<()> {
    if let Some(layer) = layer {
        write!(out, " (layer {})", Quoted(layer))?;
    }
    if let Some(width) = width {
        width.write_inline(out)?;
    }
    if let Some(fill) = fill {
        write!(out, " (fill {})", fill)?;
    }
    if let Some(tstamp) = tstamp {
        write!(out, " (tstamp {})", tstamp)?;
    }
    Ok(())
}

/// # Board Text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GrText {
    pub text: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    /// Knock-out text from its surrounding copper
    #[serde(default)]
    pub knockout: bool,
    pub effects: Effects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_cache: Option<RenderCache>,
}
impl FromSexpr for GrText {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "gr_text")?;
        let mut text = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        // The text is the first atom other than the `locked` flag
        let content = list
            .args()
            .iter()
            .find(|item| !item.is_list() && !item.is_symbol("locked"));
        text.text = list.unwrap(content.and_then(Sexp::as_text), "missing text")?.into();
        for item in list.args() {
            match item.tag() {
                Some("at") => text.position = Position::from_sexpr(item)?,
                Some("layer") => {
                    let layer = SexpList::new(item)?;
                    text.layer = Some(layer.text(1)?);
                    text.knockout = layer.has_flag("knockout");
                }
                Some("effects") => text.effects = Effects::from_sexpr(item)?,
                Some("tstamp") => text.tstamp = Some(item.text_at(1)?),
                Some("render_cache") => text.render_cache = Some(RenderCache::from_sexpr(item)?),
                Some(other) => list.skip(other),
                None => (),
            }
        }
        Ok(text)
    }
}
impl ToSexpr for GrText {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(gr_text", ind)?;
        if self.locked {
            out.push_str(" locked");
        }
        write!(
            out,
            " {} {}",
            Quoted(&self.text),
            self.position.xya("at")
        )?;
        if let Some(layer) = &self.layer {
            write!(out, " (layer {}", Quoted(layer))?;
            if self.knockout {
                out.push_str(" knockout");
            }
            out.push(')');
        }
        if let Some(tstamp) = &self.tstamp {
            write!(out, " (tstamp {})", tstamp)?;
        }
        out.push('\n');
        self.effects.write_sexpr(out, indent + 2, true)?;
        if let Some(cache) = &self.render_cache {
            cache.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Board Line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GrLine {
    pub start: Position,
    pub end: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    #[serde(default)]
    pub locked: bool,
}
impl FromSexpr for GrLine {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "gr_line")?;
        let mut line = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "start" => line.start = Position::from_sexpr(item)?,
                "end" => line.end = Position::from_sexpr(item)?,
                "angle" => line.angle = Some(item.num_at(1)?),
                "layer" => line.layer = Some(item.text_at(1)?),
                "width" | "stroke" => line.width = Some(LineWidth::from_sexpr(item)?),
                "tstamp" => line.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(line)
    }
}
impl ToSexpr for GrLine {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(gr_line", Indent(indent))?;
        if self.locked {
            out.push_str(" locked");
        }
        write!(out, " {} {}", self.start.xy("start"), self.end.xy("end"))?;
        if let Some(angle) = self.angle {
            write!(out, " (angle {})", angle)?;
        }
        write_tail(out, &self.layer, &self.width, &None, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Board Rectangle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GrRect {
    pub start: Position,
    pub end: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    /// Fill mode, `solid` or `none`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    #[serde(default)]
    pub locked: bool,
}
impl FromSexpr for GrRect {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "gr_rect")?;
        let mut rect = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "start" => rect.start = Position::from_sexpr(item)?,
                "end" => rect.end = Position::from_sexpr(item)?,
                "layer" => rect.layer = Some(item.text_at(1)?),
                "width" | "stroke" => rect.width = Some(LineWidth::from_sexpr(item)?),
                "fill" => rect.fill = Some(item.text_at(1)?),
                "tstamp" => rect.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(rect)
    }
}
impl ToSexpr for GrRect {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(gr_rect", Indent(indent))?;
        if self.locked {
            out.push_str(" locked");
        }
        write!(out, " {} {}", self.start.xy("start"), self.end.xy("end"))?;
        write_tail(out, &self.layer, &self.width, &self.fill, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Board Circle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GrCircle {
    pub center: Position,
    /// Any point on the circle
    pub end: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    #[serde(default)]
    pub locked: bool,
}
impl FromSexpr for GrCircle {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "gr_circle")?;
        let mut circle = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "center" => circle.center = Position::from_sexpr(item)?,
                "end" => circle.end = Position::from_sexpr(item)?,
                "layer" => circle.layer = Some(item.text_at(1)?),
                "width" | "stroke" => circle.width = Some(LineWidth::from_sexpr(item)?),
                "fill" => circle.fill = Some(item.text_at(1)?),
                "tstamp" => circle.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(circle)
    }
}
impl ToSexpr for GrCircle {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(gr_circle", Indent(indent))?;
        if self.locked {
            out.push_str(" locked");
        }
        write!(out, " {} {}", self.center.xy("center"), self.end.xy("end"))?;
        write_tail(out, &self.layer, &self.width, &self.fill, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Board Arc
/// Three-point form: start, mid-point, end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GrArc {
    pub start: Position,
    pub mid: Position,
    pub end: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    #[serde(default)]
    pub locked: bool,
}
impl FromSexpr for GrArc {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "gr_arc")?;
        let mut arc = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "start" => arc.start = Position::from_sexpr(item)?,
                "mid" => arc.mid = Position::from_sexpr(item)?,
                "end" => arc.end = Position::from_sexpr(item)?,
                "layer" => arc.layer = Some(item.text_at(1)?),
                "width" | "stroke" => arc.width = Some(LineWidth::from_sexpr(item)?),
                "tstamp" => arc.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(arc)
    }
}
impl ToSexpr for GrArc {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(gr_arc", Indent(indent))?;
        if self.locked {
            out.push_str(" locked");
        }
        write!(
            out,
            " {} {} {}",
            self.start.xy("start"),
            self.mid.xy("mid"),
            self.end.xy("end")
        )?;
        write_tail(out, &self.layer, &self.width, &None, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Board Polygon
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GrPoly {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default)]
    pub coordinates: Vec<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    #[serde(default)]
    pub locked: bool,
}
impl FromSexpr for GrPoly {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "gr_poly")?;
        let mut poly = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "pts" => poly.coordinates.extend(decode_pts(item)?),
                "layer" => poly.layer = Some(item.text_at(1)?),
                "width" | "stroke" => poly.width = Some(LineWidth::from_sexpr(item)?),
                "fill" => poly.fill = Some(item.text_at(1)?),
                "tstamp" => poly.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(poly)
    }
}
impl ToSexpr for GrPoly {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(gr_poly", ind)?;
        if self.locked {
            out.push_str(" locked");
        }
        out.push_str(" (pts\n");
        for pt in &self.coordinates {
            writeln!(out, "{}    {}", ind, pt.xy("xy"))?;
        }
        write!(out, "{}  )", ind)?;
        write_tail(out, &self.layer, &self.width, &self.fill, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Board Bezier Curve
/// Four control points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GrCurve {
    #[serde(default)]
    pub coordinates: Vec<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    #[serde(default)]
    pub locked: bool,
}
impl FromSexpr for GrCurve {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "gr_curve")?;
        let mut curve = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "pts" => curve.coordinates.extend(decode_pts(item)?),
                "layer" => curve.layer = Some(item.text_at(1)?),
                "width" | "stroke" => curve.width = Some(LineWidth::from_sexpr(item)?),
                "tstamp" => curve.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(curve)
    }
}
impl ToSexpr for GrCurve {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(gr_curve", ind)?;
        if self.locked {
            out.push_str(" locked");
        }
        out.push_str(" (pts\n");
        for pt in &self.coordinates {
            writeln!(out, "{}  {}", ind, pt.xy("xy"))?;
        }
        write!(out, "{})", ind)?;
        write_tail(out, &self.layer, &self.width, &None, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;

    #[test]
    fn line_keeps_width_kind() -> KiResult<()> {
        let src = r#"(gr_line (start 0 0) (end 10 0) (layer "Edge.Cuts") (width 0.1) (tstamp 1b2c))"#;
        let line = GrLine::from_sexpr(&parse_str(src)?)?;
        assert_eq!(line.width, Some(LineWidth::Width(0.1)));
        assert_eq!(line.to_sexpr(0, false)?, src);

        let src = r#"(gr_line locked (start 0 0) (end 10 0) (angle 90) (layer "F.SilkS") (stroke (width 0.15) (type solid)))"#;
        let line = GrLine::from_sexpr(&parse_str(src)?)?;
        assert!(line.locked);
        assert_eq!(line.to_sexpr(0, false)?, src);
        Ok(())
    }

    #[test]
    fn absent_width_stays_absent() -> KiResult<()> {
        let src = r#"(gr_circle (center 1 1) (end 2 1) (layer "F.Cu"))"#;
        let circle = GrCircle::from_sexpr(&parse_str(src)?)?;
        assert_eq!(circle.width, None);
        assert_eq!(circle.to_sexpr(0, false)?, src);
        Ok(())
    }

    #[test]
    fn text_and_poly() -> KiResult<()> {
        let src = concat!(
            "  (gr_text \"REV 1\" (at 10 20 90) (layer \"F.SilkS\" knockout) (tstamp 42)\n",
            "    (effects (font (size 1 1) (thickness 0.15)))\n",
            "  )\n"
        );
        let text = GrText::from_sexpr(&parse_str(src)?)?;
        assert!(text.knockout);
        assert_eq!(text.to_sexpr(2, true)?, src);

        let src = concat!(
            "(gr_poly (pts\n",
            "    (xy 0 0)\n",
            "    (xy 1 0)\n",
            "    (xy 1 1)\n",
            "  ) (layer \"F.Cu\") (width 0.2) (fill solid))"
        );
        let poly = GrPoly::from_sexpr(&parse_str(src)?)?;
        assert_eq!(poly.coordinates.len(), 3);
        assert_eq!(poly.to_sexpr(0, false)?, src);
        Ok(())
    }
}
