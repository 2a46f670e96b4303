//!
//! # Footprints
//!
//! Footprint documents (`.kicad_mod` files) and footprints placed on boards,
//! along with their pads, 3D models and manufacturing attributes.
//!

// Std-Lib
use std::fmt::Write;
use std::path::PathBuf;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::document::kicad_file;
use crate::items::common::{Coordinate, Effects, Font, Group, Net, Position};
use crate::items::fpitems::*;
use crate::items::gritems::{GrArc, GrCircle, GrCurve, GrLine, GrPoly, GrRect};
use crate::items::zones::{write_layers, Zone};
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::enumstr;
use crate::write::{Endline, Indent, Quoted};
use crate::KiResult;

enumstr!(
    /// # Pad Types
    PadType {
        ThruHole: "thru_hole",
        Smd: "smd",
        Connect: "connect",
        NpThruHole: "np_thru_hole",
    }
);
enumstr!(
    /// # Pad Shapes
    PadShape {
        Circle: "circle",
        Rect: "rect",
        Oval: "oval",
        Trapezoid: "trapezoid",
        RoundRect: "roundrect",
        Custom: "custom",
    }
);
enumstr!(
    /// # Footprint Mounting Types
    FootprintType {
        Smd: "smd",
        ThroughHole: "through_hole",
    }
);

/// # Footprint Attributes
/// `(attr [smd|through_hole] [board_only] [exclude_from_pos_files] [exclude_from_bom] ...)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Attributes {
    /// Mounting type. `None` for "other".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint_type: Option<FootprintType>,
    #[serde(default)]
    pub board_only: bool,
    #[serde(default)]
    pub exclude_from_pos_files: bool,
    #[serde(default)]
    pub exclude_from_bom: bool,
    #[serde(default)]
    pub allow_missing_courtyard: bool,
    #[serde(default)]
    pub dnp: bool,
    #[serde(default)]
    pub allow_soldermask_bridges: bool,
}
impl Attributes {
    /// Boolean indication of whether no attribute is set.
    /// Empty attributes are not written.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
impl FromSexpr for Attributes {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "attr")?;
        let mut attr = Self::default();
        for item in list.args() {
            match item.as_symbol() {
                Some("smd") => attr.footprint_type = Some(FootprintType::Smd),
                Some("through_hole") => attr.footprint_type = Some(FootprintType::ThroughHole),
                Some("board_only") => attr.board_only = true,
                Some("exclude_from_pos_files") => attr.exclude_from_pos_files = true,
                Some("exclude_from_bom") => attr.exclude_from_bom = true,
                Some("allow_missing_courtyard") => attr.allow_missing_courtyard = true,
                Some("dnp") => attr.dnp = true,
                Some("allow_soldermask_bridges") => attr.allow_soldermask_bridges = true,
                _ => (),
            }
        }
        Ok(attr)
    }
}
impl ToSexpr for Attributes {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        write!(out, "{}(attr", Indent(indent))?;
        if let Some(t) = &self.footprint_type {
            write!(out, " {}", t)?;
        }
        let flags = [
            (self.board_only, "board_only"),
            (self.exclude_from_pos_files, "exclude_from_pos_files"),
            (self.exclude_from_bom, "exclude_from_bom"),
            (self.allow_missing_courtyard, "allow_missing_courtyard"),
            (self.dnp, "dnp"),
            (self.allow_soldermask_bridges, "allow_soldermask_bridges"),
        ];
        for (set, name) in flags {
            if set {
                write!(out, " {}", name)?;
            }
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # 3D Model Reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Model {
    pub path: String,
    #[serde(default)]
    pub hide: bool,
    pub offset: Coordinate,
    pub scale: Coordinate,
    pub rotate: Coordinate,
}
impl Default for Model {
    fn default() -> Self {
        Self {
            path: String::new(),
            hide: false,
            offset: Coordinate::default(),
            scale: Coordinate::new(1.0, 1.0, 1.0),
            rotate: Coordinate::default(),
        }
    }
}
impl Model {
    /// Decode the `(xyz ..)` inside a transform list such as `(offset (xyz ..))`
    fn transform(item: &Sexp) -> KiResult<Coordinate> {
        Coordinate::from_sexpr(item.at(1)?)
    }
}
impl FromSexpr for Model {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "model")?;
        let mut model = Self {
            path: list.text(1)?,
            hide: list.has_flag("hide"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                // KiCad 5 wrote the offset as `at`
                "offset" | "at" => model.offset = Self::transform(item)?,
                "scale" => model.scale = Self::transform(item)?,
                "rotate" => model.rotate = Self::transform(item)?,
                _ => list.skip(tag),
            }
        }
        Ok(model)
    }
}
impl ToSexpr for Model {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(model {}", ind, Quoted(&self.path))?;
        if self.hide {
            out.push_str(" hide");
        }
        out.push('\n');
        let transforms = [
            ("offset", &self.offset),
            ("scale", &self.scale),
            ("rotate", &self.rotate),
        ];
        for (tag, xyz) in transforms {
            write!(out, "{}  ({} ", ind, tag)?;
            xyz.write_sexpr(out, 0, false)?;
            out.push_str(")\n");
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Pad Drill Definition
/// `(drill [oval] [D] [W] [(offset X Y)])`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DrillDefinition {
    #[serde(default)]
    pub oval: bool,
    /// Diameter, or slot height for oval drills
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
    /// Slot width, for oval drills
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Position>,
}
impl FromSexpr for DrillDefinition {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "drill")?;
        let mut drill = Self::default();
        for item in list.args() {
            match item {
                Sexp::Symbol(s) if s == "oval" => drill.oval = true,
                Sexp::Number { value, .. } => match drill.diameter {
                    None => drill.diameter = Some(*value),
                    Some(_) => drill.width = Some(*value),
                },
                Sexp::List(_) if item.tag() == Some("offset") => {
                    drill.offset = Some(Position::from_sexpr(item)?)
                }
                _ => (),
            }
        }
        Ok(drill)
    }
}
impl ToSexpr for DrillDefinition {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(drill", Indent(indent))?;
        if self.oval {
            out.push_str(" oval");
        }
        if let Some(d) = self.diameter {
            write!(out, " {}", d)?;
        }
        if let Some(w) = self.width {
            write!(out, " {}", w)?;
        }
        if let Some(offset) = &self.offset {
            write!(out, " {}", offset.xy("offset"))?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Custom Pad Options
/// `(options (clearance outline|convexhull) (anchor rect|circle))`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PadOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}
impl FromSexpr for PadOptions {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "options")?;
        let mut opts = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "clearance" => opts.clearance = Some(item.text_at(1)?),
                "anchor" => opts.anchor = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(opts)
    }
}
impl ToSexpr for PadOptions {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(options", Indent(indent))?;
        if let Some(c) = &self.clearance {
            write!(out, " (clearance {})", c)?;
        }
        if let Some(a) = &self.anchor {
            write!(out, " (anchor {})", a)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Custom Pad Primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum PadPrimitive {
    Line(GrLine),
    Rect(GrRect),
    Circle(GrCircle),
    Arc(GrArc),
    Poly(GrPoly),
    Curve(GrCurve),
}
impl ToSexpr for PadPrimitive {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        match self {
            Self::Line(p) => p.write_sexpr(out, indent, newline),
            Self::Rect(p) => p.write_sexpr(out, indent, newline),
            Self::Circle(p) => p.write_sexpr(out, indent, newline),
            Self::Arc(p) => p.write_sexpr(out, indent, newline),
            Self::Poly(p) => p.write_sexpr(out, indent, newline),
            Self::Curve(p) => p.write_sexpr(out, indent, newline),
        }
    }
}

///
/// # Pad
///
/// Written over one or more lines: geometry and layers on the first,
/// then electrical and clearance settings, custom options, and custom primitives.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pad {
    pub number: String,
    pub pad_type: PadType,
    pub shape: PadShape,
    pub position: Position,
    #[serde(default)]
    pub locked: bool,
    /// Width and height
    pub size: (f64, f64),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect_delta: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill: Option<DrillDefinition>,
    /// Fabrication property, e.g. `pad_prop_bga`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default)]
    pub layers: Vec<String>,
    #[serde(default)]
    pub remove_unused_layers: bool,
    #[serde(default)]
    pub keep_end_layers: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roundrect_rratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chamfer_ratio: Option<f64>,
    /// Chamfered corners, e.g. `top_left`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chamfer: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net: Option<Net>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub die_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solder_mask_margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solder_paste_margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solder_paste_margin_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_connect: Option<i64>,
    /// KiCad 6 thermal spoke width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_width: Option<f64>,
    /// KiCad 7 thermal spoke width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_bridge_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_bridge_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_gap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_pad_options: Option<PadOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_pad_primitives: Vec<PadPrimitive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
}
impl Default for Pad {
    fn default() -> Self {
        Self {
            number: "1".into(),
            pad_type: PadType::Smd,
            shape: PadShape::Rect,
            position: Position::default(),
            locked: false,
            size: (1.0, 1.0),
            rect_delta: None,
            drill: None,
            property: None,
            layers: Vec::new(),
            remove_unused_layers: false,
            keep_end_layers: false,
            roundrect_rratio: None,
            chamfer_ratio: None,
            chamfer: Vec::new(),
            net: None,
            pin_function: None,
            pin_type: None,
            die_length: None,
            solder_mask_margin: None,
            solder_paste_margin: None,
            solder_paste_margin_ratio: None,
            clearance: None,
            zone_connect: None,
            thermal_width: None,
            thermal_bridge_width: None,
            thermal_bridge_angle: None,
            thermal_gap: None,
            custom_pad_options: None,
            custom_pad_primitives: Vec::new(),
            tstamp: None,
        }
    }
}
impl Pad {
    /// Collect the settings written on the pad's second line
    fn second_line(&self) -> KiResult<Vec<String>> {
        let mut items = Vec::new();
        if let Some(net) = &self.net {
            items.push(net.to_sexpr(0, false)?);
        }
        if let Some(f) = &self.pin_function {
            items.push(format!("(pinfunction {})", Quoted(f)));
        }
        if let Some(t) = &self.pin_type {
            items.push(format!("(pintype {})", Quoted(t)));
        }
        let nums = [
            ("die_length", self.die_length),
            ("solder_mask_margin", self.solder_mask_margin),
            ("solder_paste_margin", self.solder_paste_margin),
            ("solder_paste_margin_ratio", self.solder_paste_margin_ratio),
            ("clearance", self.clearance),
        ];
        for (tag, val) in nums {
            if let Some(v) = val {
                items.push(format!("({} {})", tag, v));
            }
        }
        if let Some(z) = self.zone_connect {
            items.push(format!("(zone_connect {})", z));
        }
        let nums = [
            ("thermal_width", self.thermal_width),
            ("thermal_bridge_width", self.thermal_bridge_width),
            ("thermal_bridge_angle", self.thermal_bridge_angle),
            ("thermal_gap", self.thermal_gap),
        ];
        for (tag, val) in nums {
            if let Some(v) = val {
                items.push(format!("({} {})", tag, v));
            }
        }
        if let Some(t) = &self.tstamp {
            items.push(format!("(tstamp {})", t));
        }
        Ok(items)
    }
}
impl FromSexpr for Pad {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "pad")?;
        let mut pad = Self {
            number: list.text(1)?,
            pad_type: list.keyword(2)?,
            shape: list.keyword(3)?,
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "at" => pad.position = Position::from_sexpr(item)?,
                "size" => pad.size = (item.num_at(1)?, item.num_at(2)?),
                "rect_delta" => pad.rect_delta = Some((item.num_at(1)?, item.num_at(2)?)),
                "drill" => pad.drill = Some(DrillDefinition::from_sexpr(item)?),
                "property" => pad.property = Some(item.text_at(1)?),
                "layers" => {
                    let layers = SexpList::new(item)?;
                    for idx in 1..layers.len() {
                        pad.layers.push(layers.text(idx)?);
                    }
                }
                "remove_unused_layers" => pad.remove_unused_layers = true,
                "keep_end_layers" => pad.keep_end_layers = true,
                "roundrect_rratio" => pad.roundrect_rratio = Some(item.num_at(1)?),
                "chamfer_ratio" => pad.chamfer_ratio = Some(item.num_at(1)?),
                "chamfer" => {
                    let corners = SexpList::new(item)?;
                    for idx in 1..corners.len() {
                        pad.chamfer.push(corners.text(idx)?);
                    }
                }
                "net" => pad.net = Some(Net::from_sexpr(item)?),
                "pinfunction" => pad.pin_function = Some(item.text_at(1)?),
                "pintype" => pad.pin_type = Some(item.text_at(1)?),
                "die_length" => pad.die_length = Some(item.num_at(1)?),
                "solder_mask_margin" => pad.solder_mask_margin = Some(item.num_at(1)?),
                "solder_paste_margin" => pad.solder_paste_margin = Some(item.num_at(1)?),
                "solder_paste_margin_ratio" => {
                    pad.solder_paste_margin_ratio = Some(item.num_at(1)?)
                }
                "clearance" => pad.clearance = Some(item.num_at(1)?),
                "zone_connect" => pad.zone_connect = Some(item.int_at(1)?),
                "thermal_width" => pad.thermal_width = Some(item.num_at(1)?),
                "thermal_bridge_width" => pad.thermal_bridge_width = Some(item.num_at(1)?),
                "thermal_bridge_angle" => pad.thermal_bridge_angle = Some(item.num_at(1)?),
                "thermal_gap" => pad.thermal_gap = Some(item.num_at(1)?),
                "options" => pad.custom_pad_options = Some(PadOptions::from_sexpr(item)?),
                "primitives" => {
                    let prims = SexpList::new(item)?;
                    for (ptag, prim) in prims.children() {
                        let prim = match ptag {
                            "gr_line" => PadPrimitive::Line(GrLine::from_sexpr(prim)?),
                            "gr_rect" => PadPrimitive::Rect(GrRect::from_sexpr(prim)?),
                            "gr_circle" => PadPrimitive::Circle(GrCircle::from_sexpr(prim)?),
                            "gr_arc" => PadPrimitive::Arc(GrArc::from_sexpr(prim)?),
                            "gr_poly" => PadPrimitive::Poly(GrPoly::from_sexpr(prim)?),
                            "gr_curve" => PadPrimitive::Curve(GrCurve::from_sexpr(prim)?),
                            _ => {
                                prims.skip(ptag);
                                continue;
                            }
                        };
                        pad.custom_pad_primitives.push(prim);
                    }
                }
                "tstamp" => pad.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(pad)
    }
}
impl ToSexpr for Pad {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(pad {} {} {}",
            ind,
            Quoted(&self.number),
            self.pad_type,
            self.shape
        )?;
        if self.locked {
            out.push_str(" locked");
        }
        write!(
            out,
            " {} (size {} {})",
            self.position.xya("at"),
            self.size.0,
            self.size.1
        )?;
        if let Some((x, y)) = self.rect_delta {
            write!(out, " (rect_delta {} {})", x, y)?;
        }
        if let Some(drill) = &self.drill {
            out.push(' ');
            drill.write_sexpr(out, 0, false)?;
        }
        if let Some(p) = &self.property {
            write!(out, " (property {})", p)?;
        }
        if !self.layers.is_empty() {
            out.push_str(" (layers");
            write_layers(out, &self.layers)?;
            out.push(')');
        }
        if self.remove_unused_layers {
            out.push_str(" (remove_unused_layers)");
        }
        if self.keep_end_layers {
            out.push_str(" (keep_end_layers)");
        }
        if let Some(r) = self.roundrect_rratio {
            write!(out, " (roundrect_rratio {})", r)?;
        }
        if let Some(r) = self.chamfer_ratio {
            write!(out, " (chamfer_ratio {})", r)?;
        }
        if !self.chamfer.is_empty() {
            write!(out, " (chamfer {})", self.chamfer.join(" "))?;
        }

        let second = self.second_line()?;
        if !second.is_empty() {
            write!(out, "\n{}  {}", ind, second.join(" "))?;
        }
        if let Some(opts) = &self.custom_pad_options {
            out.push('\n');
            opts.write_sexpr(out, indent + 2, false)?;
        }
        if !self.custom_pad_primitives.is_empty() {
            writeln!(out, "\n{}  (primitives", ind)?;
            for prim in &self.custom_pad_primitives {
                prim.write_sexpr(out, indent + 4, true)?;
            }
            write!(out, "{}  )", ind)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Footprint Graphical Item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum FpItem {
    Text(FpText),
    TextBox(FpTextBox),
    Line(FpLine),
    Rect(FpRect),
    Circle(FpCircle),
    Arc(FpArc),
    Poly(FpPoly),
    Curve(FpCurve),
}
impl FpItem {
    /// Decode from any of the `fp_*` graphical lists.
    /// Returns `None` for other tags.
    pub fn decode(exp: &Sexp) -> KiResult<Option<Self>> {
        let item = match exp.tag() {
            Some("fp_text") => Self::Text(FpText::from_sexpr(exp)?),
            Some("fp_text_box") => Self::TextBox(FpTextBox::from_sexpr(exp)?),
            Some("fp_line") => Self::Line(FpLine::from_sexpr(exp)?),
            Some("fp_rect") => Self::Rect(FpRect::from_sexpr(exp)?),
            Some("fp_circle") => Self::Circle(FpCircle::from_sexpr(exp)?),
            Some("fp_arc") => Self::Arc(FpArc::from_sexpr(exp)?),
            Some("fp_poly") => Self::Poly(FpPoly::from_sexpr(exp)?),
            Some("fp_curve") => Self::Curve(FpCurve::from_sexpr(exp)?),
            _ => return Ok(None),
        };
        Ok(Some(item))
    }
}
impl ToSexpr for FpItem {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        match self {
            Self::Text(i) => i.write_sexpr(out, indent, newline),
            Self::TextBox(i) => i.write_sexpr(out, indent, newline),
            Self::Line(i) => i.write_sexpr(out, indent, newline),
            Self::Rect(i) => i.write_sexpr(out, indent, newline),
            Self::Circle(i) => i.write_sexpr(out, indent, newline),
            Self::Arc(i) => i.write_sexpr(out, indent, newline),
            Self::Poly(i) => i.write_sexpr(out, indent, newline),
            Self::Curve(i) => i.write_sexpr(out, indent, newline),
        }
    }
}

///
/// # Footprint
///
/// Root of `.kicad_mod` files, and the `footprint` entries of boards.
/// Identified by `library:entry`, where the library nickname is optional.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Footprint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_nickname: Option<String>,
    pub entry_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub placed: bool,
    pub layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tedit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    /// Placement, for footprints on boards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Key-value properties, in file order
    #[serde(default)]
    pub properties: Vec<(String, String)>,
    /// Hierarchical path of the schematic symbol, for footprints on boards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplace_cost90: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplace_cost180: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solder_mask_margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solder_paste_margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solder_paste_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_connect: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_gap: Option<f64>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private_layers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub net_tie_pad_groups: Vec<String>,
    #[serde(default)]
    pub graphic_items: Vec<FpItem>,
    #[serde(default)]
    pub pads: Vec<Pad>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}
impl Default for Footprint {
    fn default() -> Self {
        Self {
            library_nickname: None,
            entry_name: String::new(),
            version: None,
            generator: None,
            locked: false,
            placed: false,
            layer: "F.Cu".into(),
            tedit: None,
            tstamp: None,
            position: None,
            description: None,
            tags: None,
            properties: Vec::new(),
            path: None,
            autoplace_cost90: None,
            autoplace_cost180: None,
            solder_mask_margin: None,
            solder_paste_margin: None,
            solder_paste_ratio: None,
            clearance: None,
            zone_connect: None,
            thermal_width: None,
            thermal_gap: None,
            attributes: Attributes::default(),
            private_layers: Vec::new(),
            net_tie_pad_groups: Vec::new(),
            graphic_items: Vec::new(),
            pads: Vec::new(),
            zones: Vec::new(),
            groups: Vec::new(),
            models: Vec::new(),
            file_path: None,
        }
    }
}
kicad_file!(Footprint);

impl Footprint {
    /// Create a new footprint `library_id`, with reference and value texts.
    pub fn create_new(
        library_id: &str,
        value: &str,
        footprint_type: Option<FootprintType>,
        reference: &str,
    ) -> Self {
        let mut fp = Self {
            version: Some("20211014".into()),
            generator: Some("kicad21".into()),
            ..Default::default()
        };
        fp.set_lib_id(library_id);
        fp.attributes.footprint_type = footprint_type;

        let effects = Effects {
            font: Font {
                thickness: Some(0.15),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut ref_text = FpText::new(FpTextType::Reference, reference, "F.SilkS");
        ref_text.position = Position {
            x: 0.0,
            y: -0.5,
            angle: None,
            unlocked: true,
        };
        ref_text.effects = effects.clone();
        let mut value_text = FpText::new(FpTextType::Value, value, "F.Fab");
        value_text.position = Position {
            x: 0.0,
            y: 1.0,
            angle: None,
            unlocked: true,
        };
        value_text.effects = effects;
        fp.graphic_items.push(FpItem::Text(ref_text));
        fp.graphic_items.push(FpItem::Text(value_text));
        fp
    }
    /// Get our combined `library:entry` identifier
    pub fn lib_id(&self) -> String {
        match &self.library_nickname {
            Some(lib) => format!("{}:{}", lib, self.entry_name),
            None => self.entry_name.clone(),
        }
    }
    /// Set our identifier from `library:entry` or bare `entry` form.
    /// Both sides of the colon must be non-empty to name a library.
    pub fn set_lib_id(&mut self, id: &str) {
        match id.split_once(':') {
            Some((lib, entry)) if !lib.is_empty() && !entry.is_empty() => {
                self.library_nickname = Some(lib.into());
                self.entry_name = entry.into();
            }
            _ => {
                self.library_nickname = None;
                self.entry_name = id.into();
            }
        }
    }
    /// Get the value of property `key`
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
    /// Write, optionally with our layer on the header line as boards do
    pub fn write_footprint(
        &self,
        out: &mut String,
        indent: usize,
        newline: bool,
        layer_in_first_line: bool,
    ) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(footprint {}", ind, Quoted(&self.lib_id()))?;
        if self.locked {
            out.push_str(" locked");
        }
        if self.placed {
            out.push_str(" placed");
        }
        if let Some(v) = &self.version {
            write!(out, " (version {})", v)?;
        }
        if let Some(g) = &self.generator {
            write!(out, " (generator {})", g)?;
        }
        if layer_in_first_line {
            writeln!(out, " (layer {})", Quoted(&self.layer))?;
        } else {
            write!(out, "\n{}  (layer {})\n", ind, Quoted(&self.layer))?;
        }
        match (&self.tedit, &self.tstamp) {
            (Some(e), Some(t)) => writeln!(out, "{}  (tedit {}) (tstamp {})", ind, e, t)?,
            (Some(e), None) => writeln!(out, "{}  (tedit {})", ind, e)?,
            (None, Some(t)) => writeln!(out, "{}  (tstamp {})", ind, t)?,
            (None, None) => (),
        }
        if let Some(pos) = &self.position {
            writeln!(out, "{}  {}", ind, pos.xya("at"))?;
        }
        if let Some(d) = &self.description {
            writeln!(out, "{}  (descr {})", ind, Quoted(d))?;
        }
        if let Some(t) = &self.tags {
            writeln!(out, "{}  (tags {})", ind, Quoted(t))?;
        }
        for (k, v) in &self.properties {
            writeln!(out, "{}  (property {} {})", ind, Quoted(k), Quoted(v))?;
        }
        if let Some(p) = &self.path {
            writeln!(out, "{}  (path {})", ind, Quoted(p))?;
        }
        let ints = [
            ("autoplace_cost90", self.autoplace_cost90),
            ("autoplace_cost180", self.autoplace_cost180),
        ];
        for (tag, val) in ints {
            if let Some(v) = val {
                writeln!(out, "{}  ({} {})", ind, tag, v)?;
            }
        }
        let nums = [
            ("solder_mask_margin", self.solder_mask_margin),
            ("solder_paste_margin", self.solder_paste_margin),
            ("solder_paste_ratio", self.solder_paste_ratio),
            ("clearance", self.clearance),
        ];
        for (tag, val) in nums {
            if let Some(v) = val {
                writeln!(out, "{}  ({} {})", ind, tag, v)?;
            }
        }
        if let Some(z) = self.zone_connect {
            writeln!(out, "{}  (zone_connect {})", ind, z)?;
        }
        if let Some(w) = self.thermal_width {
            writeln!(out, "{}  (thermal_width {})", ind, w)?;
        }
        if let Some(g) = self.thermal_gap {
            writeln!(out, "{}  (thermal_gap {})", ind, g)?;
        }
        self.attributes.write_sexpr(out, indent + 2, true)?;
        if !self.private_layers.is_empty() {
            write!(out, "{}  (private_layers", ind)?;
            write_layers(out, &self.private_layers)?;
            out.push_str(")\n");
        }
        if !self.net_tie_pad_groups.is_empty() {
            write!(out, "{}  (net_tie_pad_groups", ind)?;
            for g in &self.net_tie_pad_groups {
                write!(out, " {}", Quoted(g))?;
            }
            out.push_str(")\n");
        }
        for item in &self.graphic_items {
            item.write_sexpr(out, indent + 2, true)?;
        }
        for pad in &self.pads {
            pad.write_sexpr(out, indent + 2, true)?;
        }
        for zone in &self.zones {
            zone.write_sexpr(out, indent + 2, true)?;
        }
        for group in &self.groups {
            group.write_sexpr(out, indent + 2, true)?;
        }
        for model in &self.models {
            model.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}
impl FromSexpr for Footprint {
    /// Decode from a `footprint` list, or a KiCad 5 `module`
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect_any(exp, &["footprint", "module"])?;
        let mut fp = Self {
            locked: list.has_flag("locked"),
            placed: list.has_flag("placed"),
            ..Default::default()
        };
        fp.set_lib_id(&list.text(1)?);
        for item in list.from(2) {
            let tag = match item.tag() {
                Some(tag) => tag,
                None => continue,
            };
            match tag {
                "version" => fp.version = Some(item.text_at(1)?),
                "generator" => fp.generator = Some(item.text_at(1)?),
                "layer" => fp.layer = item.text_at(1)?,
                "tedit" => fp.tedit = Some(item.text_at(1)?),
                "tstamp" => fp.tstamp = Some(item.text_at(1)?),
                "at" => fp.position = Some(Position::from_sexpr(item)?),
                "descr" => fp.description = Some(item.text_at(1)?),
                "tags" => fp.tags = Some(item.text_at(1)?),
                "property" => fp.properties.push((item.text_at(1)?, item.text_at(2)?)),
                "path" => fp.path = Some(item.text_at(1)?),
                "autoplace_cost90" => fp.autoplace_cost90 = Some(item.int_at(1)?),
                "autoplace_cost180" => fp.autoplace_cost180 = Some(item.int_at(1)?),
                "solder_mask_margin" => fp.solder_mask_margin = Some(item.num_at(1)?),
                "solder_paste_margin" => fp.solder_paste_margin = Some(item.num_at(1)?),
                "solder_paste_ratio" => fp.solder_paste_ratio = Some(item.num_at(1)?),
                "clearance" => fp.clearance = Some(item.num_at(1)?),
                "zone_connect" => fp.zone_connect = Some(item.int_at(1)?),
                "thermal_width" => fp.thermal_width = Some(item.num_at(1)?),
                "thermal_gap" => fp.thermal_gap = Some(item.num_at(1)?),
                "attr" => fp.attributes = Attributes::from_sexpr(item)?,
                "private_layers" => {
                    let layers = SexpList::new(item)?;
                    for idx in 1..layers.len() {
                        fp.private_layers.push(layers.text(idx)?);
                    }
                }
                "net_tie_pad_groups" => {
                    let groups = SexpList::new(item)?;
                    for idx in 1..groups.len() {
                        fp.net_tie_pad_groups.push(groups.text(idx)?);
                    }
                }
                "pad" => fp.pads.push(Pad::from_sexpr(item)?),
                "zone" => fp.zones.push(Zone::from_sexpr(item)?),
                "group" => fp.groups.push(Group::from_sexpr(item)?),
                "model" => fp.models.push(Model::from_sexpr(item)?),
                _ => match FpItem::decode(item)? {
                    Some(gi) => fp.graphic_items.push(gi),
                    None => list.skip(tag),
                },
            }
        }
        Ok(fp)
    }
}
impl ToSexpr for Footprint {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        self.write_footprint(out, indent, newline, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;

    #[test]
    fn lib_ids() {
        let mut fp = Footprint::default();
        fp.set_lib_id("Resistor_SMD:R_0603");
        assert_eq!(fp.library_nickname.as_deref(), Some("Resistor_SMD"));
        assert_eq!(fp.entry_name, "R_0603");
        assert_eq!(fp.lib_id(), "Resistor_SMD:R_0603");
        fp.set_lib_id("R_0805");
        assert_eq!(fp.library_nickname, None);
        assert_eq!(fp.lib_id(), "R_0805");
        // An empty side names no library
        for id in [":R_0805", "Resistor_SMD:"] {
            fp.set_lib_id(id);
            assert_eq!(fp.library_nickname, None);
            assert_eq!(fp.entry_name, id);
            assert_eq!(fp.lib_id(), id);
        }
    }

    #[test]
    fn empty_attributes_disappear() -> KiResult<()> {
        let attr = Attributes::from_sexpr(&parse_str("(attr)")?)?;
        assert!(attr.is_empty());
        assert_eq!(attr.to_sexpr(2, true)?, "");
        let attr = Attributes::from_sexpr(&parse_str("(attr smd exclude_from_bom board_only)")?)?;
        assert_eq!(attr.to_sexpr(0, false)?, "(attr smd board_only exclude_from_bom)");
        Ok(())
    }

    #[test]
    fn drills() -> KiResult<()> {
        for src in ["(drill 0.8)", "(drill oval 1 2)", "(drill 1 (offset 0.1 0))", "(drill (offset 0 0))"] {
            let drill = DrillDefinition::from_sexpr(&parse_str(src)?)?;
            assert_eq!(drill.to_sexpr(0, false)?, src);
        }
        Ok(())
    }

    #[test]
    fn pads() -> KiResult<()> {
        let src = concat!(
            "(pad \"1\" thru_hole roundrect locked (at 0 0 90) (size 1.7 1.7) (drill 1) (layers \"*.Cu\" \"*.Mask\") (remove_unused_layers) (roundrect_rratio 0.25)\n",
            "  (net 1 \"GND\") (pinfunction \"Pin_1\") (pintype \"passive\") (tstamp 0cb2))"
        );
        let pad = Pad::from_sexpr(&parse_str(src)?)?;
        assert_eq!(pad.pad_type, PadType::ThruHole);
        assert_eq!(pad.shape, PadShape::RoundRect);
        assert!(pad.locked);
        assert_eq!(pad.to_sexpr(0, false)?, src);

        let src = concat!(
            "    (pad \"\" smd custom (at 0 0) (size 0.5 0.5) (layers \"F.Cu\" \"F.Mask\")\n",
            "      (options (clearance outline) (anchor circle))\n",
            "      (primitives\n",
            "        (gr_circle (center 0 0) (end 1 0) (width 0.1) (fill yes))\n",
            "      ))\n",
        );
        let pad = Pad::from_sexpr(&parse_str(src)?)?;
        assert_eq!(pad.number, "");
        assert_eq!(pad.custom_pad_primitives.len(), 1);
        assert_eq!(pad.to_sexpr(4, true)?, src);

        let bad = parse_str(r#"(pad "1" smd hexagon (at 0 0) (size 1 1))"#)?;
        assert!(Pad::from_sexpr(&bad).is_err());
        Ok(())
    }

    #[test]
    fn models() -> KiResult<()> {
        let src = concat!(
            "  (model \"${KICAD6_3DMODEL_DIR}/R.wrl\" hide\n",
            "    (offset (xyz 0 0 0))\n",
            "    (scale (xyz 1 1 1))\n",
            "    (rotate (xyz 0 0 -90))\n",
            "  )\n",
        );
        let model = Model::from_sexpr(&parse_str(src)?)?;
        assert!(model.hide);
        assert_eq!(model.rotate.z, -90.0);
        assert_eq!(model.to_sexpr(2, true)?, src);
        Ok(())
    }
}
