//!
//! # Footprint Graphical Items
//!
//! Text and shapes owned by a footprint, in footprint-local coordinates.
//!

// Std-Lib
use std::fmt::Write;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use super::common::{decode_pts, Effects, LineWidth, Position, RenderCache, Stroke};
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::{enumstr, ErrorHelper, Unwrapper};
use crate::write::{Endline, Indent, Quoted};
use crate::{KiError, KiResult};

enumstr!(
    /// # Footprint Text Kinds
    FpTextType {
        Reference: "reference",
        Value: "value",
        User: "user",
    }
);

/// Write the `(layer "L")[ width][ (fill F)][ locked][ (tstamp T)]` tail shared by footprint shapes
fn write_tail(
    out: &mut String,
    layer: &str,
    width: &Option<LineWidth>,
    fill: &Option<String>,
    locked: bool,
    tstamp: &Option<String>,
) -> KiResult<()> {
    write!(out, " (layer {})", Quoted(layer))?;
    if let Some(width) = width {
        width.write_inline(out)?;
    }
    if let Some(fill) = fill {
        write!(out, " (fill {})", fill)?;
    }
    if locked {
        out.push_str(" locked");
    }
    if let Some(tstamp) = tstamp {
        write!(out, " (tstamp {})", tstamp)?;
    }
    Ok(())
}

fn default_layer() -> String {
    "F.Cu".into()
}

/// # Footprint Text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FpText {
    pub text_type: FpTextType,
    pub text: String,
    pub position: Position,
    pub layer: String,
    #[serde(default)]
    pub knockout: bool,
    #[serde(default)]
    pub hide: bool,
    pub effects: Effects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_cache: Option<RenderCache>,
}
impl Default for FpText {
    fn default() -> Self {
        Self {
            text_type: FpTextType::Reference,
            text: "%REF".into(),
            position: Position::default(),
            layer: default_layer(),
            knockout: false,
            hide: false,
            effects: Effects::default(),
            tstamp: None,
            render_cache: None,
        }
    }
}
impl FpText {
    /// Create a new [FpText] of kind `text_type` on `layer`
    pub fn new(text_type: FpTextType, text: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            text_type,
            text: text.into(),
            layer: layer.into(),
            ..Default::default()
        }
    }
}
impl FromSexpr for FpText {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "fp_text")?;
        let mut text = Self {
            text_type: list.keyword(1)?,
            text: list.text(2)?,
            hide: list.has_flag("hide"),
            ..Default::default()
        };
        for item in list.from(3) {
            match item.tag() {
                Some("at") => text.position = Position::from_sexpr(item)?,
                Some("layer") => {
                    let layer = SexpList::new(item)?;
                    text.layer = layer.text(1)?;
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
impl ToSexpr for FpText {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(fp_text {} {} (at {} {}",
            ind,
            self.text_type,
            Quoted(&self.text),
            self.position.x,
            self.position.y
        )?;
        if let Some(angle) = self.position.angle {
            write!(out, " {}", angle)?;
        }
        if self.position.unlocked {
            out.push_str(" unlocked");
        }
        write!(out, ") (layer {}", Quoted(&self.layer))?;
        if self.knockout {
            out.push_str(" knockout");
        }
        out.push(')');
        if self.hide {
            out.push_str(" hide");
        }
        out.push('\n');
        self.effects.write_sexpr(out, indent + 2, true)?;
        if let Some(tstamp) = &self.tstamp {
            writeln!(out, "{}  (tstamp {})", ind, tstamp)?;
        }
        if let Some(cache) = &self.render_cache {
            cache.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Footprint Text Box
///
/// Axis-aligned boxes are described by `start` and `end`.
/// Boxes rotated by other than a multiple of 90 degrees carry their four corners in `pts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FpTextBox {
    #[serde(default)]
    pub locked: bool,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Position>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pts: Vec<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    pub layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Effects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_cache: Option<RenderCache>,
}
impl Default for FpTextBox {
    fn default() -> Self {
        Self {
            locked: false,
            text: String::new(),
            start: None,
            end: None,
            pts: Vec::new(),
            angle: None,
            layer: default_layer(),
            tstamp: None,
            effects: None,
            stroke: None,
            render_cache: None,
        }
    }
}
impl FpTextBox {
    fn is_orthogonal(&self) -> bool {
        match self.angle {
            None => true,
            Some(a) => [0.0, 90.0, 180.0, 270.0].contains(&a),
        }
    }
}
impl FromSexpr for FpTextBox {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "fp_text_box")?;
        let mut tb = Self::default();
        // Optional leading `locked`, then the text
        let text_idx = match list.get(1)?.is_symbol("locked") && list.len() > 2 && !list.get(2)?.is_list() {
            true => {
                tb.locked = true;
                2
            }
            false => 1,
        };
        tb.text = list.text(text_idx)?;
        for item in list.from(text_idx + 1) {
            match item.tag() {
                Some("start") => tb.start = Some(Position::from_sexpr(item)?),
                Some("end") => tb.end = Some(Position::from_sexpr(item)?),
                Some("pts") => tb.pts.extend(decode_pts(item)?),
                Some("angle") => tb.angle = Some(item.num_at(1)?),
                Some("layer") => tb.layer = item.text_at(1)?,
                Some("tstamp") => tb.tstamp = Some(item.text_at(1)?),
                Some("effects") => tb.effects = Some(Effects::from_sexpr(item)?),
                Some("stroke") => tb.stroke = Some(Stroke::from_sexpr(item)?),
                Some("render_cache") => tb.render_cache = Some(RenderCache::from_sexpr(item)?),
                Some(other) => list.skip(other),
                None => (),
            }
        }
        Ok(tb)
    }
}
impl ToSexpr for FpTextBox {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        if !self.is_orthogonal() && self.pts.len() != 4 {
            return Err(KiError::format(
                "Text boxes with non-orthogonal angles require exactly four corner points",
            ));
        }
        if self.is_orthogonal() && (self.start.is_none() || self.end.is_none()) {
            return Err(KiError::format(
                "Text boxes with orthogonal angles require start and end positions",
            ));
        }
        let ind = Indent(indent);
        write!(out, "{}(fp_text_box", ind)?;
        if self.locked {
            out.push_str(" locked");
        }
        writeln!(out, " {}", Quoted(&self.text))?;
        if self.pts.len() == 4 {
            writeln!(out, "{}  (pts", ind)?;
            let corners: Vec<String> = self.pts.iter().map(|p| p.xy("xy").to_string()).collect();
            writeln!(out, "{}    {}", ind, corners.join(" "))?;
            writeln!(out, "{}  )", ind)?;
        }
        write!(out, "{}  ", ind)?;
        if let Some(start) = &self.start {
            write!(out, "{} ", start.xy("start"))?;
        }
        if let Some(end) = &self.end {
            write!(out, "{} ", end.xy("end"))?;
        }
        if let Some(angle) = self.angle {
            write!(out, "(angle {}) ", angle)?;
        }
        write!(out, "(layer {})", Quoted(&self.layer))?;
        if let Some(tstamp) = &self.tstamp {
            write!(out, " (tstamp {})", tstamp)?;
        }
        out.push('\n');
        if let Some(effects) = &self.effects {
            effects.write_sexpr(out, indent + 2, true)?;
        }
        if let Some(stroke) = &self.stroke {
            stroke.write_sexpr(out, indent + 2, true)?;
        }
        if let Some(cache) = &self.render_cache {
            cache.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Footprint Line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FpLine {
    pub start: Position,
    pub end: Position,
    pub layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
}
impl Default for FpLine {
    fn default() -> Self {
        Self {
            start: Position::default(),
            end: Position::default(),
            layer: default_layer(),
            width: None,
            locked: false,
            tstamp: None,
        }
    }
}
impl FromSexpr for FpLine {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "fp_line")?;
        let mut line = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "start" => line.start = Position::from_sexpr(item)?,
                "end" => line.end = Position::from_sexpr(item)?,
                "layer" => line.layer = item.text_at(1)?,
                "width" | "stroke" => line.width = Some(LineWidth::from_sexpr(item)?),
                "tstamp" => line.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(line)
    }
}
impl ToSexpr for FpLine {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(fp_line {} {}",
            Indent(indent),
            self.start.xy("start"),
            self.end.xy("end")
        )?;
        write_tail(out, &self.layer, &self.width, &None, self.locked, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Footprint Rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FpRect {
    pub start: Position,
    pub end: Position,
    pub layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
}
impl Default for FpRect {
    fn default() -> Self {
        Self {
            start: Position::default(),
            end: Position::default(),
            layer: default_layer(),
            width: None,
            fill: None,
            locked: false,
            tstamp: None,
        }
    }
}
impl FromSexpr for FpRect {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "fp_rect")?;
        let mut rect = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "start" => rect.start = Position::from_sexpr(item)?,
                "end" => rect.end = Position::from_sexpr(item)?,
                "layer" => rect.layer = item.text_at(1)?,
                "width" | "stroke" => rect.width = Some(LineWidth::from_sexpr(item)?),
                "fill" => rect.fill = Some(item.text_at(1)?),
                "tstamp" => rect.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(rect)
    }
}
impl ToSexpr for FpRect {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(fp_rect {} {}",
            Indent(indent),
            self.start.xy("start"),
            self.end.xy("end")
        )?;
        write_tail(out, &self.layer, &self.width, &self.fill, self.locked, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Footprint Circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FpCircle {
    pub center: Position,
    pub end: Position,
    pub layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
}
impl Default for FpCircle {
    fn default() -> Self {
        Self {
            center: Position::default(),
            end: Position::default(),
            layer: default_layer(),
            width: None,
            fill: None,
            locked: false,
            tstamp: None,
        }
    }
}
impl FromSexpr for FpCircle {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "fp_circle")?;
        let mut circle = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "center" => circle.center = Position::from_sexpr(item)?,
                "end" => circle.end = Position::from_sexpr(item)?,
                "layer" => circle.layer = item.text_at(1)?,
                "width" | "stroke" => circle.width = Some(LineWidth::from_sexpr(item)?),
                "fill" => circle.fill = Some(item.text_at(1)?),
                "tstamp" => circle.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(circle)
    }
}
impl ToSexpr for FpCircle {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(fp_circle {} {}",
            Indent(indent),
            self.center.xy("center"),
            self.end.xy("end")
        )?;
        write_tail(out, &self.layer, &self.width, &self.fill, self.locked, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

///
/// # Footprint Arc
///
/// Always held in three-point (start, mid, end) form.
///
/// Footprints from KiCad 5 and earlier describe arcs as `(start CENTER) (end ARC_START) (angle SWEEP)`.
/// These are converted on decode by rotating the arc's start point around its center,
/// first by half the sweep (the mid-point) then by the remainder (the end point).
/// Negative sweeps swap the resulting start and end.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FpArc {
    pub start: Position,
    pub mid: Position,
    pub end: Position,
    pub layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
}
impl Default for FpArc {
    fn default() -> Self {
        Self {
            start: Position::default(),
            mid: Position::default(),
            end: Position::default(),
            layer: default_layer(),
            width: None,
            locked: false,
            tstamp: None,
        }
    }
}
impl FromSexpr for FpArc {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "fp_arc")?;
        let mut arc = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        let (mut start, mut mid, mut end, mut angle) = (None, None, None, None);
        for (tag, item) in list.children() {
            match tag {
                "start" => start = Some(Position::from_sexpr(item)?),
                "mid" => mid = Some(Position::from_sexpr(item)?),
                "end" => end = Some(Position::from_sexpr(item)?),
                "angle" => angle = Some(item.num_at(1)?),
                "layer" => arc.layer = item.text_at(1)?,
                "width" | "stroke" => arc.width = Some(LineWidth::from_sexpr(item)?),
                "tstamp" => arc.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        match (angle, mid) {
            (Some(_), Some(_)) => list.fail("both `angle` and `mid` specified"),
            (Some(sweep), None) => {
                let center = start.unwrapper(&list, "legacy arc missing its center `start`")?;
                let arc_start = end.unwrapper(&list, "legacy arc missing its starting point `end`")?;
                let mut arc_end = arc_start.clone();
                arc_end.rotate_around_center(&center, -sweep / 2.0);
                arc.mid = arc_end.clone();
                arc_end.rotate_around_center(&center, -sweep / 2.0);
                if sweep < 0.0 {
                    arc.start = arc_end;
                    arc.end = arc_start;
                } else {
                    arc.start = arc_start;
                    arc.end = arc_end;
                }
                Ok(arc)
            }
            (None, mid) => {
                arc.start = start.unwrap_or_default();
                arc.mid = mid.unwrap_or_default();
                arc.end = end.unwrap_or_default();
                Ok(arc)
            }
        }
    }
}
impl ToSexpr for FpArc {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(fp_arc {} {} {}",
            Indent(indent),
            self.start.xy("start"),
            self.mid.xy("mid"),
            self.end.xy("end")
        )?;
        write_tail(out, &self.layer, &self.width, &None, self.locked, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Footprint Polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FpPoly {
    pub layer: String,
    #[serde(default)]
    pub coordinates: Vec<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
}
impl Default for FpPoly {
    fn default() -> Self {
        Self {
            layer: default_layer(),
            coordinates: Vec::new(),
            width: None,
            fill: None,
            locked: false,
            tstamp: None,
        }
    }
}
impl FromSexpr for FpPoly {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "fp_poly")?;
        let mut poly = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "pts" => poly.coordinates.extend(decode_pts(item)?),
                "layer" => poly.layer = item.text_at(1)?,
                "width" | "stroke" => poly.width = Some(LineWidth::from_sexpr(item)?),
                "fill" => poly.fill = Some(item.text_at(1)?),
                "tstamp" => poly.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(poly)
    }
}
impl ToSexpr for FpPoly {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(fp_poly (pts", ind)?;
        for pt in &self.coordinates {
            writeln!(out, "{}    {}", ind, pt.xy("xy"))?;
        }
        write!(out, "{}  )", ind)?;
        write_tail(out, &self.layer, &self.width, &self.fill, self.locked, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Footprint Bezier Curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FpCurve {
    #[serde(default)]
    pub coordinates: Vec<Position>,
    pub layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<LineWidth>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
}
impl Default for FpCurve {
    fn default() -> Self {
        Self {
            coordinates: Vec::new(),
            layer: default_layer(),
            width: None,
            locked: false,
            tstamp: None,
        }
    }
}
impl FromSexpr for FpCurve {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "fp_curve")?;
        let mut curve = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "pts" => curve.coordinates.extend(decode_pts(item)?),
                "layer" => curve.layer = item.text_at(1)?,
                "width" | "stroke" => curve.width = Some(LineWidth::from_sexpr(item)?),
                "tstamp" => curve.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(curve)
    }
}
impl ToSexpr for FpCurve {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(fp_curve (pts", ind)?;
        for pt in &self.coordinates {
            writeln!(out, "{}  {}", ind, pt.xy("xy"))?;
        }
        write!(out, "{})", ind)?;
        write_tail(out, &self.layer, &self.width, &None, self.locked, &self.tstamp)?;
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;

    fn close(a: &Position, x: f64, y: f64) -> bool {
        (a.x - x).abs() < 1e-9 && (a.y - y).abs() < 1e-9
    }

    #[test]
    fn legacy_arc_upgrade() -> KiResult<()> {
        let src = r#"(fp_arc (start 0 0) (end 10 0) (angle 90) (layer "F.SilkS") (width 0.12))"#;
        let arc = FpArc::from_sexpr(&parse_str(src)?)?;
        assert!(close(&arc.start, 10.0, 0.0), "{:?}", arc.start);
        assert!(close(&arc.end, 0.0, 10.0), "{:?}", arc.end);
        let half = 10.0 / 2f64.sqrt();
        assert!(close(&arc.mid, half, half), "{:?}", arc.mid);
        assert_eq!(arc.width, Some(LineWidth::Width(0.12)));

        let src = r#"(fp_arc (start 0 0) (end 10 0) (angle -90) (layer "F.SilkS"))"#;
        let arc = FpArc::from_sexpr(&parse_str(src)?)?;
        assert!(close(&arc.start, 0.0, -10.0), "{:?}", arc.start);
        assert!(close(&arc.end, 10.0, 0.0), "{:?}", arc.end);
        assert!(close(&arc.mid, half, -half), "{:?}", arc.mid);
        Ok(())
    }

    #[test]
    fn arc_with_angle_and_mid_fails() -> KiResult<()> {
        let src = r#"(fp_arc (start 0 0) (mid 1 1) (end 10 0) (angle 90) (layer "F.SilkS"))"#;
        assert!(matches!(
            FpArc::from_sexpr(&parse_str(src)?),
            Err(KiError::Format(_))
        ));
        Ok(())
    }

    #[test]
    fn modern_arc() -> KiResult<()> {
        let src = r#"(fp_arc (start 1 0) (mid 0.7071 0.7071) (end 0 1) (layer "F.Fab") (stroke (width 0.1) (type solid)) locked (tstamp 0f3c))"#;
        let arc = FpArc::from_sexpr(&parse_str(src)?)?;
        assert!(arc.locked);
        assert_eq!(arc.to_sexpr(0, false)?, src);
        Ok(())
    }

    #[test]
    fn text() -> KiResult<()> {
        let src = concat!(
            "  (fp_text reference \"R1\" (at 0 -1.5 90 unlocked) (layer \"F.SilkS\" knockout) hide\n",
            "    (effects (font (size 1 1) (thickness 0.15)))\n",
            "    (tstamp 7a1b)\n",
            "  )\n"
        );
        let text = FpText::from_sexpr(&parse_str(src)?)?;
        assert_eq!(text.text_type, FpTextType::Reference);
        assert!(text.hide && text.knockout && text.position.unlocked);
        assert_eq!(text.to_sexpr(2, true)?, src);

        let bad = parse_str(r#"(fp_text label "x" (at 0 0) (layer "F.SilkS"))"#)?;
        assert!(FpText::from_sexpr(&bad).is_err());
        Ok(())
    }

    #[test]
    fn text_box_requires_geometry() {
        let tb = FpTextBox {
            text: "note".into(),
            ..Default::default()
        };
        assert!(tb.to_sexpr(0, false).is_err());
        let tb = FpTextBox {
            text: "note".into(),
            angle: Some(45.0),
            start: Some(Position::new(0.0, 0.0)),
            end: Some(Position::new(1.0, 1.0)),
            ..Default::default()
        };
        assert!(tb.to_sexpr(0, false).is_err());
    }

    #[test]
    fn text_box() -> KiResult<()> {
        let src = concat!(
            "(fp_text_box locked \"note\"\n",
            "  (start 0 0) (end 5 2) (layer \"F.Fab\") (tstamp 11)\n",
            "  (effects (font (size 1 1)))\n",
            "  (stroke (width 0.1) (type solid))\n",
            ")"
        );
        let tb = FpTextBox::from_sexpr(&parse_str(src)?)?;
        assert!(tb.locked);
        assert_eq!(tb.text, "note");
        assert_eq!(tb.to_sexpr(0, false)?, src);
        Ok(())
    }
}
