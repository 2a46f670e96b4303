//!
//! # Symbol Graphical Items
//!
//! Drawing primitives of library symbols and their units.
//! Most carry a `private` flag, marking items not shared by derived symbols.
//!

// Std-Lib
use std::fmt::Write;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use super::common::{decode_pts, Effects, Fill, Position, Stroke};
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::ErrorHelper;
use crate::write::{Endline, Indent, Quoted};
use crate::KiResult;

/// Write `(pts ...)` with one point per line, indented under `indent`
fn write_pts(out: &mut String, pts: &[Position], indent: usize) -> KiResult<()> {
    let ind = Indent(indent);
    writeln!(out, "{}  (pts", ind)?;
    for pt in pts {
        writeln!(out, "{}    {}", ind, pt.xy("xy"))?;
    }
    writeln!(out, "{}  )", ind)?;
    Ok(())
}

/// Write the `stroke` and `fill` lines shared by all symbol shapes
fn write_stroke_fill(out: &mut String, stroke: &Stroke, fill: &Fill, indent: usize) -> KiResult<()> {
    stroke.write_sexpr(out, indent + 2, true)?;
    fill.write_sexpr(out, indent + 2, true)
}

/// # Symbol Arc
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SyArc {
    #[serde(default)]
    pub private: bool,
    pub start: Position,
    pub mid: Position,
    pub end: Position,
    pub stroke: Stroke,
    pub fill: Fill,
}
impl FromSexpr for SyArc {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "arc")?;
        let mut arc = Self {
            private: list.has_flag("private"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "start" => arc.start = Position::from_sexpr(item)?,
                "mid" => arc.mid = Position::from_sexpr(item)?,
                "end" => arc.end = Position::from_sexpr(item)?,
                "stroke" => arc.stroke = Stroke::from_sexpr(item)?,
                "fill" => arc.fill = Fill::from_sexpr(item)?,
                _ => list.skip(tag),
            }
        }
        Ok(arc)
    }
}
impl ToSexpr for SyArc {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(arc", ind)?;
        if self.private {
            out.push_str(" private");
        }
        writeln!(
            out,
            " {} {} {}",
            self.start.xya("start"),
            self.mid.xya("mid"),
            self.end.xya("end")
        )?;
        write_stroke_fill(out, &self.stroke, &self.fill, indent)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Symbol Circle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SyCircle {
    #[serde(default)]
    pub private: bool,
    pub center: Position,
    pub radius: f64,
    pub stroke: Stroke,
    pub fill: Fill,
}
impl FromSexpr for SyCircle {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "circle")?;
        let mut circle = Self {
            private: list.has_flag("private"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "center" => circle.center = Position::from_sexpr(item)?,
                "radius" => circle.radius = item.num_at(1)?,
                "stroke" => circle.stroke = Stroke::from_sexpr(item)?,
                "fill" => circle.fill = Fill::from_sexpr(item)?,
                _ => list.skip(tag),
            }
        }
        Ok(circle)
    }
}
impl ToSexpr for SyCircle {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(circle", ind)?;
        if self.private {
            out.push_str(" private");
        }
        writeln!(
            out,
            " {} (radius {})",
            self.center.xy("center"),
            self.radius
        )?;
        write_stroke_fill(out, &self.stroke, &self.fill, indent)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Symbol Bezier Curve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SyCurve {
    pub points: Vec<Position>,
    pub stroke: Stroke,
    pub fill: Fill,
}
impl FromSexpr for SyCurve {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "curve")?;
        let mut curve = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "pts" => curve.points = decode_pts(item)?,
                "stroke" => curve.stroke = Stroke::from_sexpr(item)?,
                "fill" => curve.fill = Fill::from_sexpr(item)?,
                _ => list.skip(tag),
            }
        }
        Ok(curve)
    }
}
impl ToSexpr for SyCurve {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(curve", ind)?;
        write_pts(out, &self.points, indent)?;
        write_stroke_fill(out, &self.stroke, &self.fill, indent)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Symbol Poly-Line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SyPolyLine {
    pub points: Vec<Position>,
    pub stroke: Stroke,
    pub fill: Fill,
}
impl FromSexpr for SyPolyLine {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "polyline")?;
        let mut poly = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "pts" => poly.points = decode_pts(item)?,
                "stroke" => poly.stroke = Stroke::from_sexpr(item)?,
                "fill" => poly.fill = Fill::from_sexpr(item)?,
                _ => list.skip(tag),
            }
        }
        Ok(poly)
    }
}
impl ToSexpr for SyPolyLine {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(polyline", ind)?;
        write_pts(out, &self.points, indent)?;
        write_stroke_fill(out, &self.stroke, &self.fill, indent)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Symbol Rectangle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SyRect {
    #[serde(default)]
    pub private: bool,
    pub start: Position,
    pub end: Position,
    pub stroke: Stroke,
    pub fill: Fill,
}
impl FromSexpr for SyRect {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "rectangle")?;
        let mut rect = Self {
            private: list.has_flag("private"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "start" => rect.start = Position::from_sexpr(item)?,
                "end" => rect.end = Position::from_sexpr(item)?,
                "stroke" => rect.stroke = Stroke::from_sexpr(item)?,
                "fill" => rect.fill = Fill::from_sexpr(item)?,
                _ => list.skip(tag),
            }
        }
        Ok(rect)
    }
}
impl ToSexpr for SyRect {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(rectangle", ind)?;
        if self.private {
            out.push_str(" private");
        }
        writeln!(out, " {} {}", self.start.xy("start"), self.end.xy("end"))?;
        write_stroke_fill(out, &self.stroke, &self.fill, indent)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Symbol Text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SyText {
    #[serde(default)]
    pub private: bool,
    pub text: String,
    pub position: Position,
    pub effects: Effects,
}
impl FromSexpr for SyText {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "text")?;
        let (private, first) = leading_private(&list);
        let mut text = Self {
            private,
            text: list.text(first)?,
            ..Default::default()
        };
        for item in list.from(first + 1) {
            match item.tag() {
                Some("at") => text.position = Position::from_sexpr(item)?,
                Some("effects") => text.effects = Effects::from_sexpr(item)?,
                Some(other) => list.skip(other),
                None => (),
            }
        }
        Ok(text)
    }
}
impl ToSexpr for SyText {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(text", ind)?;
        if self.private {
            out.push_str(" private");
        }
        writeln!(out, " {} {}", Quoted(&self.text), self.position.xya("at"))?;
        self.effects.write_sexpr(out, indent + 2, true)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// Detect a leading `private` keyword, returning it and the index of the text that follows.
/// A text which itself reads "private" is told apart by being the last atom.
fn leading_private(list: &SexpList) -> (bool, usize) {
    let private = list.items.get(1).map_or(false, |i| i.is_symbol("private"))
        && list.items.get(2).map_or(false, |i| !i.is_list());
    match private {
        true => (true, 2),
        false => (false, 1),
    }
}

/// # Symbol Text Box
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SyTextBox {
    #[serde(default)]
    pub private: bool,
    pub text: String,
    pub position: Position,
    pub size: Position,
    pub stroke: Stroke,
    pub fill: Fill,
    pub effects: Effects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for SyTextBox {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "text_box")?;
        let (private, first) = leading_private(&list);
        let mut tb = Self {
            private,
            text: list.text(first)?,
            ..Default::default()
        };
        let mut has_size = false;
        for item in list.from(first + 1) {
            match item.tag() {
                Some("at") => tb.position = Position::from_sexpr(item)?,
                Some("size") => {
                    tb.size = Position::from_sexpr(item)?;
                    has_size = true;
                }
                Some("stroke") => tb.stroke = Stroke::from_sexpr(item)?,
                Some("fill") => tb.fill = Fill::from_sexpr(item)?,
                Some("effects") => tb.effects = Effects::from_sexpr(item)?,
                Some("uuid") => tb.uuid = Some(item.text_at(1)?),
                Some(other) => list.skip(other),
                None => (),
            }
        }
        list.assert(has_size, "missing size")?;
        Ok(tb)
    }
}
impl ToSexpr for SyTextBox {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(text_box", ind)?;
        if self.private {
            out.push_str(" private");
        }
        writeln!(out, " {}", Quoted(&self.text))?;
        writeln!(
            out,
            "{}  {} {}",
            ind,
            self.position.xya("at"),
            self.size.xy("size")
        )?;
        write_stroke_fill(out, &self.stroke, &self.fill, indent)?;
        self.effects.write_sexpr(out, indent + 2, true)?;
        if let Some(uuid) = &self.uuid {
            writeln!(out, "{}  (uuid {})", ind, uuid)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Symbol Graphical Item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum SyItem {
    Arc(SyArc),
    Circle(SyCircle),
    Curve(SyCurve),
    PolyLine(SyPolyLine),
    Rect(SyRect),
    Text(SyText),
    TextBox(SyTextBox),
}
impl SyItem {
    /// Decode from any of the symbol drawing lists. Returns `None` for other tags.
    pub fn decode(exp: &Sexp) -> KiResult<Option<Self>> {
        let item = match exp.tag() {
            Some("arc") => Self::Arc(SyArc::from_sexpr(exp)?),
            Some("circle") => Self::Circle(SyCircle::from_sexpr(exp)?),
            Some("curve") => Self::Curve(SyCurve::from_sexpr(exp)?),
            Some("polyline") => Self::PolyLine(SyPolyLine::from_sexpr(exp)?),
            Some("rectangle") => Self::Rect(SyRect::from_sexpr(exp)?),
            Some("text") => Self::Text(SyText::from_sexpr(exp)?),
            Some("text_box") => Self::TextBox(SyTextBox::from_sexpr(exp)?),
            _ => return Ok(None),
        };
        Ok(Some(item))
    }
}
impl ToSexpr for SyItem {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        match self {
            Self::Arc(i) => i.write_sexpr(out, indent, newline),
            Self::Circle(i) => i.write_sexpr(out, indent, newline),
            Self::Curve(i) => i.write_sexpr(out, indent, newline),
            Self::PolyLine(i) => i.write_sexpr(out, indent, newline),
            Self::Rect(i) => i.write_sexpr(out, indent, newline),
            Self::Text(i) => i.write_sexpr(out, indent, newline),
            Self::TextBox(i) => i.write_sexpr(out, indent, newline),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;

    #[test]
    fn shapes() -> KiResult<()> {
        let srcs = [
            concat!(
                "    (arc private (start 1 0) (mid 0.7071 0.7071) (end 0 1)\n",
                "      (stroke (width 0.254) (type default))\n",
                "      (fill (type none))\n",
                "    )\n"
            ),
            concat!(
                "    (circle (center 0 0) (radius 2.54)\n",
                "      (stroke (width 0) (type default))\n",
                "      (fill (type background))\n",
                "    )\n"
            ),
            concat!(
                "    (rectangle (start -5.08 5.08) (end 5.08 -5.08)\n",
                "      (stroke (width 0.254) (type default))\n",
                "      (fill (type background))\n",
                "    )\n"
            ),
            concat!(
                "    (polyline\n",
                "      (pts\n",
                "        (xy -1.27 0)\n",
                "        (xy 1.27 0)\n",
                "      )\n",
                "      (stroke (width 0) (type default))\n",
                "      (fill (type none))\n",
                "    )\n"
            ),
            concat!(
                "    (curve\n",
                "      (pts\n",
                "        (xy 0 0)\n",
                "        (xy 1 1)\n",
                "        (xy 2 1)\n",
                "        (xy 3 0)\n",
                "      )\n",
                "      (stroke (width 0.1) (type default))\n",
                "      (fill (type none))\n",
                "    )\n"
            ),
        ];
        for src in srcs {
            let item = SyItem::decode(&parse_str(src)?)?.unwrap();
            assert_eq!(item.to_sexpr(4, true)?, src);
        }
        Ok(())
    }

    #[test]
    fn texts() -> KiResult<()> {
        let src = concat!(
            "(text private \"private\" (at 0 1.27 900)\n",
            "  (effects (font (size 1.27 1.27)))\n",
            ")"
        );
        let text = SyText::from_sexpr(&parse_str(src)?)?;
        assert!(text.private);
        assert_eq!(text.text, "private");
        assert_eq!(text.to_sexpr(0, false)?, src);

        let src = concat!(
            "(text_box \"Notes\"\n",
            "  (at -2.54 2.54 0) (size 5.08 2.54)\n",
            "  (stroke (width 0) (type default))\n",
            "  (fill (type none))\n",
            "  (effects (font (size 1.27 1.27)) (justify left top))\n",
            ")"
        );
        let tb = SyTextBox::from_sexpr(&parse_str(src)?)?;
        assert!(!tb.private);
        assert_eq!(tb.to_sexpr(0, false)?, src);
        assert!(SyTextBox::from_sexpr(&parse_str("(text_box \"x\" (at 0 0))")?).is_err());
        Ok(())
    }
}
