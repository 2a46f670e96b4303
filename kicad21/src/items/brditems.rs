//!
//! # Board Items
//!
//! Board-level settings (general, layers, stack-up, setup and plot parameters)
//! and the routing items: track segments, vias and track arcs.
//!

// Std-Lib
use std::fmt::Write;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use super::common::Position;
use super::zones::write_layers;
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::ErrorHelper;
use crate::write::{Endline, Indent, Quoted, YesNo};
use crate::KiResult;

/// # General Board Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneralSettings {
    /// Board thickness
    pub thickness: f64,
}
impl Default for GeneralSettings {
    fn default() -> Self {
        Self { thickness: 1.6 }
    }
}
impl FromSexpr for GeneralSettings {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "general")?;
        let mut general = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "thickness" => general.thickness = item.num_at(1)?,
                _ => list.skip(tag),
            }
        }
        Ok(general)
    }
}
impl ToSexpr for GeneralSettings {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(general", ind)?;
        writeln!(out, "{}  (thickness {})", ind, self.thickness)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Layer Definition
/// `(ORDINAL "name" TYPE ["user name"])`, as listed in a board's `layers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LayerToken {
    pub ordinal: i64,
    pub name: String,
    /// `signal`, `power`, `mixed`, `jumper` or `user`
    pub layer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}
impl LayerToken {
    pub fn new(ordinal: i64, name: &str, layer_type: &str, user_name: Option<&str>) -> Self {
        Self {
            ordinal,
            name: name.into(),
            layer_type: layer_type.into(),
            user_name: user_name.map(String::from),
        }
    }
}
impl FromSexpr for LayerToken {
    /// Layer lists carry no tag; their first element is the numeric ordinal
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::new(exp)?;
        list.assert(list.len() >= 3, "expected ordinal, name and type")?;
        Ok(Self {
            ordinal: list.int(0)?,
            name: list.text(1)?,
            layer_type: list.text(2)?,
            user_name: match list.len() {
                n if n > 3 => Some(list.text(3)?),
                _ => None,
            },
        })
    }
}
impl ToSexpr for LayerToken {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}({} {} {}",
            Indent(indent),
            self.ordinal,
            Quoted(&self.name),
            self.layer_type
        )?;
        if let Some(u) = &self.user_name {
            write!(out, " {}", Quoted(u))?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Stack-up Sub-Layer
/// Additional dielectric sub-layer, introduced by `addsublayer`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StackupSubLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default)]
    pub thickness_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsilon_r: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_tangent: Option<f64>,
}
impl StackupSubLayer {
    /// Apply a property list such as `(material "FR4")`. Returns `false` for unknown tags.
    fn apply(&mut self, tag: &str, item: &Sexp) -> KiResult<bool> {
        match tag {
            "thickness" => {
                self.thickness = Some(item.num_at(1)?);
                self.thickness_locked = SexpList::new(item)?.has_flag("locked");
            }
            "material" => self.material = Some(item.text_at(1)?),
            "epsilon_r" => self.epsilon_r = Some(item.num_at(1)?),
            "loss_tangent" => self.loss_tangent = Some(item.num_at(1)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
    fn write_props(&self, out: &mut String) -> KiResult<()> {
        if let Some(t) = self.thickness {
            write!(out, " (thickness {}", t)?;
            if self.thickness_locked {
                out.push_str(" locked");
            }
            out.push(')');
        }
        if let Some(m) = &self.material {
            write!(out, " (material {})", Quoted(m))?;
        }
        if let Some(e) = self.epsilon_r {
            write!(out, " (epsilon_r {})", e)?;
        }
        if let Some(l) = self.loss_tangent {
            write!(out, " (loss_tangent {})", l)?;
        }
        Ok(())
    }
}

/// # Stack-up Layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StackupLayer {
    pub name: String,
    /// Layer type, e.g. `copper`, `core` or `Top Solder Mask`
    pub layer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Thickness, material and dielectric properties of the primary layer
    #[serde(default)]
    pub props: StackupSubLayer,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sublayers: Vec<StackupSubLayer>,
}
impl FromSexpr for StackupLayer {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "layer")?;
        let mut layer = Self {
            name: list.text(1)?,
            ..Default::default()
        };
        // Properties following an `addsublayer` keyword apply to that sub-layer
        let mut sub: Option<StackupSubLayer> = None;
        for item in list.from(2) {
            if item.is_symbol("addsublayer") {
                if let Some(done) = sub.take() {
                    layer.sublayers.push(done);
                }
                sub = Some(StackupSubLayer::default());
                continue;
            }
            let tag = match item.tag() {
                Some(t) => t,
                None => continue,
            };
            match tag {
                "type" => layer.layer_type = item.text_at(1)?,
                "color" => layer.color = Some(item.text_at(1)?),
                _ => {
                    let target = match sub.as_mut() {
                        Some(s) => s,
                        None => &mut layer.props,
                    };
                    if !target.apply(tag, item)? {
                        list.skip(tag);
                    }
                }
            }
        }
        if let Some(done) = sub {
            layer.sublayers.push(done);
        }
        Ok(layer)
    }
}
impl ToSexpr for StackupLayer {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(layer {} (type {})",
            ind,
            Quoted(&self.name),
            Quoted(&self.layer_type)
        )?;
        if let Some(c) = &self.color {
            write!(out, " (color {})", Quoted(c))?;
        }
        self.props.write_props(out)?;
        for sub in &self.sublayers {
            write!(out, "\n{}  addsublayer", ind)?;
            sub.write_props(out)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Board Stack-up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Stackup {
    #[serde(default)]
    pub layers: Vec<StackupLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copper_finish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dielectric_constraints: Option<bool>,
    /// `yes` or `bevelled`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_connector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub castellated_pads: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_plating: Option<bool>,
}
impl FromSexpr for Stackup {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "stackup")?;
        let mut stackup = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "layer" => stackup.layers.push(StackupLayer::from_sexpr(item)?),
                "copper_finish" => stackup.copper_finish = Some(item.text_at(1)?),
                "dielectric_constraints" => {
                    stackup.dielectric_constraints = Some(item.yes_no_at(1)?)
                }
                "edge_connector" => stackup.edge_connector = Some(item.text_at(1)?),
                "castellated_pads" => stackup.castellated_pads = Some(item.yes_no_at(1)?),
                "edge_plating" => stackup.edge_plating = Some(item.yes_no_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(stackup)
    }
}
impl ToSexpr for Stackup {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(stackup", ind)?;
        for layer in &self.layers {
            layer.write_sexpr(out, indent + 2, true)?;
        }
        if let Some(c) = &self.copper_finish {
            writeln!(out, "{}  (copper_finish {})", ind, Quoted(c))?;
        }
        if let Some(d) = self.dielectric_constraints {
            writeln!(out, "{}  (dielectric_constraints {})", ind, YesNo(d))?;
        }
        if let Some(e) = &self.edge_connector {
            writeln!(out, "{}  (edge_connector {})", ind, e)?;
        }
        if let Some(c) = self.castellated_pads {
            writeln!(out, "{}  (castellated_pads {})", ind, YesNo(c))?;
        }
        if let Some(e) = self.edge_plating {
            writeln!(out, "{}  (edge_plating {})", ind, YesNo(e))?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Plot Parameter
/// One `(name VALUE)` entry of the `pcbplotparams`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlotParam {
    pub name: String,
    pub value: Sexp,
}

///
/// # Plot Settings
///
/// The `pcbplotparams` of a board's setup.
/// Held as an ordered list of name-value pairs, as the set of parameters
/// varies between KiCad versions.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlotSettings {
    pub params: Vec<PlotParam>,
}
impl PlotSettings {
    /// Get the text of parameter `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.as_text())
    }
    /// Set parameter `name` to `value`, appending it if not yet present
    pub fn set(&mut self, name: &str, value: Sexp) {
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(p) => p.value = value,
            None => self.params.push(PlotParam {
                name: name.into(),
                value,
            }),
        }
    }
}
impl FromSexpr for PlotSettings {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "pcbplotparams")?;
        let mut plot = Self::default();
        for (tag, item) in list.children() {
            plot.params.push(PlotParam {
                name: tag.into(),
                value: item.at(1)?.clone(),
            });
        }
        Ok(plot)
    }
}
impl ToSexpr for PlotSettings {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(pcbplotparams", ind)?;
        for param in &self.params {
            writeln!(out, "{}  ({} {})", ind, param.name, param.value)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Board Setup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SetupData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stackup: Option<Stackup>,
    pub pad_to_mask_clearance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solder_mask_min_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_to_paste_clearance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_to_paste_clearance_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_soldermask_bridges_in_footprints: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux_axis_origin: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_origin: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_settings: Option<PlotSettings>,
}
impl FromSexpr for SetupData {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "setup")?;
        let mut setup = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "stackup" => setup.stackup = Some(Stackup::from_sexpr(item)?),
                "pad_to_mask_clearance" => setup.pad_to_mask_clearance = item.num_at(1)?,
                "solder_mask_min_width" => setup.solder_mask_min_width = Some(item.num_at(1)?),
                "pad_to_paste_clearance" => setup.pad_to_paste_clearance = Some(item.num_at(1)?),
                "pad_to_paste_clearance_ratio" => {
                    setup.pad_to_paste_clearance_ratio = Some(item.num_at(1)?)
                }
                "allow_soldermask_bridges_in_footprints" => {
                    setup.allow_soldermask_bridges_in_footprints = Some(item.yes_no_at(1)?)
                }
                "aux_axis_origin" => setup.aux_axis_origin = Some(Position::from_sexpr(item)?),
                "grid_origin" => setup.grid_origin = Some(Position::from_sexpr(item)?),
                "pcbplotparams" => setup.plot_settings = Some(PlotSettings::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(setup)
    }
}
impl ToSexpr for SetupData {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(setup", ind)?;
        if let Some(stackup) = &self.stackup {
            stackup.write_sexpr(out, indent + 2, true)?;
        }
        writeln!(
            out,
            "{}  (pad_to_mask_clearance {})",
            ind, self.pad_to_mask_clearance
        )?;
        let nums = [
            ("solder_mask_min_width", self.solder_mask_min_width),
            ("pad_to_paste_clearance", self.pad_to_paste_clearance),
            ("pad_to_paste_clearance_ratio", self.pad_to_paste_clearance_ratio),
        ];
        for (tag, val) in nums {
            if let Some(v) = val {
                writeln!(out, "{}  ({} {})", ind, tag, v)?;
            }
        }
        if let Some(a) = self.allow_soldermask_bridges_in_footprints {
            writeln!(
                out,
                "{}  (allow_soldermask_bridges_in_footprints {})",
                ind,
                YesNo(a)
            )?;
        }
        if let Some(o) = &self.aux_axis_origin {
            writeln!(out, "{}  {}", ind, o.xy("aux_axis_origin"))?;
        }
        if let Some(o) = &self.grid_origin {
            writeln!(out, "{}  {}", ind, o.xy("grid_origin"))?;
        }
        if let Some(plot) = &self.plot_settings {
            plot.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Track Segment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    pub start: Position,
    pub end: Position,
    pub width: f64,
    pub layer: String,
    #[serde(default)]
    pub locked: bool,
    pub net: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
}
impl FromSexpr for Segment {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "segment")?;
        let mut seg = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "start" => seg.start = Position::from_sexpr(item)?,
                "end" => seg.end = Position::from_sexpr(item)?,
                "width" => seg.width = item.num_at(1)?,
                "layer" => seg.layer = item.text_at(1)?,
                "net" => seg.net = item.int_at(1)?,
                "tstamp" => seg.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(seg)
    }
}
impl ToSexpr for Segment {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(segment", Indent(indent))?;
        if self.locked {
            out.push_str(" locked");
        }
        write!(
            out,
            " {} {} (width {}) (layer {}) (net {})",
            self.start.xy("start"),
            self.end.xy("end"),
            self.width,
            Quoted(&self.layer),
            self.net
        )?;
        if let Some(t) = &self.tstamp {
            write!(out, " (tstamp {})", t)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Via
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Via {
    /// `blind` or `micro`. Through-vias carry no type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via_type: Option<String>,
    #[serde(default)]
    pub locked: bool,
    pub position: Position,
    pub size: f64,
    pub drill: f64,
    pub layers: Vec<String>,
    #[serde(default)]
    pub remove_unused_layers: bool,
    #[serde(default)]
    pub keep_end_layers: bool,
    /// Not automatically updated to the net of connected tracks
    #[serde(default)]
    pub free: bool,
    pub net: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
}
impl FromSexpr for Via {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "via")?;
        let mut via = Self::default();
        for item in list.args() {
            match item.tag() {
                Some("at") => via.position = Position::from_sexpr(item)?,
                Some("size") => via.size = item.num_at(1)?,
                Some("drill") => via.drill = item.num_at(1)?,
                Some("layers") => {
                    let layers = SexpList::new(item)?;
                    for idx in 1..layers.len() {
                        via.layers.push(layers.text(idx)?);
                    }
                }
                Some("remove_unused_layers") => via.remove_unused_layers = true,
                Some("keep_end_layers") => via.keep_end_layers = true,
                Some("free") => via.free = true,
                Some("net") => via.net = item.int_at(1)?,
                Some("tstamp") => via.tstamp = Some(item.text_at(1)?),
                Some(other) => list.skip(other),
                None => match item.as_symbol() {
                    Some("locked") => via.locked = true,
                    Some(t @ ("blind" | "micro")) => via.via_type = Some(t.into()),
                    _ => (),
                },
            }
        }
        Ok(via)
    }
}
impl ToSexpr for Via {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(via", Indent(indent))?;
        if let Some(t) = &self.via_type {
            write!(out, " {}", t)?;
        }
        if self.locked {
            out.push_str(" locked");
        }
        write!(
            out,
            " {} (size {}) (drill {}) (layers",
            self.position.xy("at"),
            self.size,
            self.drill
        )?;
        write_layers(out, &self.layers)?;
        out.push(')');
        if self.remove_unused_layers {
            out.push_str(" (remove_unused_layers)");
        }
        if self.keep_end_layers {
            out.push_str(" (keep_end_layers)");
        }
        if self.free {
            out.push_str(" (free)");
        }
        write!(out, " (net {})", self.net)?;
        if let Some(t) = &self.tstamp {
            write!(out, " (tstamp {})", t)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Track Arc
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Arc {
    pub start: Position,
    pub mid: Position,
    pub end: Position,
    pub width: f64,
    pub layer: String,
    #[serde(default)]
    pub locked: bool,
    pub net: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
}
impl FromSexpr for Arc {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "arc")?;
        let mut arc = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "start" => arc.start = Position::from_sexpr(item)?,
                "mid" => arc.mid = Position::from_sexpr(item)?,
                "end" => arc.end = Position::from_sexpr(item)?,
                "width" => arc.width = item.num_at(1)?,
                "layer" => arc.layer = item.text_at(1)?,
                "net" => arc.net = item.int_at(1)?,
                "tstamp" => arc.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(arc)
    }
}
impl ToSexpr for Arc {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(arc", Indent(indent))?;
        if self.locked {
            out.push_str(" locked");
        }
        write!(
            out,
            " {} {} {} (width {}) (layer {}) (net {})",
            self.start.xy("start"),
            self.mid.xy("mid"),
            self.end.xy("end"),
            self.width,
            Quoted(&self.layer),
            self.net
        )?;
        if let Some(t) = &self.tstamp {
            write!(out, " (tstamp {})", t)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Target Marker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Target {
    /// `plus` or `x`
    pub shape: String,
    pub position: Position,
    pub size: f64,
    pub width: f64,
    pub layer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
}
impl FromSexpr for Target {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "target")?;
        let mut target = Self {
            shape: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "at" => target.position = Position::from_sexpr(item)?,
                "size" => target.size = item.num_at(1)?,
                "width" => target.width = item.num_at(1)?,
                "layer" => target.layer = item.text_at(1)?,
                "tstamp" => target.tstamp = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(target)
    }
}
impl ToSexpr for Target {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(target {} {} (size {}) (width {}) (layer {})",
            Indent(indent),
            self.shape,
            self.position.xy("at"),
            self.size,
            self.width,
            Quoted(&self.layer)
        )?;
        if let Some(t) = &self.tstamp {
            write!(out, " (tstamp {})", t)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;

    #[test]
    fn layers() -> KiResult<()> {
        let layer = LayerToken::from_sexpr(&parse_str(r#"(31 "B.Cu" signal "Bottom")"#)?)?;
        assert_eq!(layer.ordinal, 31);
        assert_eq!(layer.user_name.as_deref(), Some("Bottom"));
        assert_eq!(layer.to_sexpr(4, true)?, "    (31 \"B.Cu\" signal \"Bottom\")\n");
        Ok(())
    }

    #[test]
    fn stackup_sublayers() -> KiResult<()> {
        let src = concat!(
            "(stackup\n",
            "  (layer \"F.Cu\" (type \"copper\") (thickness 0.035))\n",
            "  (layer \"dielectric 1\" (type \"prepreg\") (thickness 0.1 locked) (material \"FR4\") (epsilon_r 4.5) (loss_tangent 0.02)\n",
            "    addsublayer (thickness 0.2) (material \"FR408-HR\") (epsilon_r 3.69) (loss_tangent 0.0091))\n",
            "  (copper_finish \"None\")\n",
            "  (dielectric_constraints no)\n",
            ")"
        );
        let stackup = Stackup::from_sexpr(&parse_str(src)?)?;
        let dielectric = &stackup.layers[1];
        assert!(dielectric.props.thickness_locked);
        assert_eq!(dielectric.sublayers.len(), 1);
        assert_eq!(dielectric.sublayers[0].material.as_deref(), Some("FR408-HR"));
        assert_eq!(stackup.to_sexpr(0, false)?, src);
        Ok(())
    }

    #[test]
    fn plot_params_keep_order_and_quoting() -> KiResult<()> {
        let src = concat!(
            "(pcbplotparams\n",
            "  (layerselection 0x00010fc_ffffffff)\n",
            "  (usegerberextensions false)\n",
            "  (outputdirectory \"gerbers/\")\n",
            ")"
        );
        let mut plot = PlotSettings::from_sexpr(&parse_str(src)?)?;
        assert_eq!(plot.get("outputdirectory"), Some("gerbers/"));
        assert_eq!(plot.to_sexpr(0, false)?, src);
        plot.set("usegerberextensions", Sexp::symbol("true"));
        assert_eq!(plot.get("usegerberextensions"), Some("true"));
        Ok(())
    }

    #[test]
    fn routing() -> KiResult<()> {
        let srcs = [
            r#"(segment (start 1 2) (end 3 4) (width 0.25) (layer "F.Cu") (net 1) (tstamp 5d1c))"#,
            r#"(segment locked (start 1 2) (end 3 4) (width 0.25) (layer "B.Cu") (net 0))"#,
            r#"(via blind locked (at 5 5) (size 0.8) (drill 0.4) (layers "F.Cu" "In1.Cu") (remove_unused_layers) (keep_end_layers) (free) (net 2) (tstamp 77))"#,
            r#"(arc (start 0 0) (mid 1 1) (end 2 0) (width 0.2) (layer "F.Cu") (net 3) (tstamp ab))"#,
            r#"(target plus (at 10 10) (size 5) (width 0.1) (layer "Edge.Cuts") (tstamp 9f))"#,
        ];
        for src in srcs {
            let exp = parse_str(src)?;
            let text = match exp.tag() {
                Some("segment") => Segment::from_sexpr(&exp)?.to_sexpr(0, false)?,
                Some("via") => Via::from_sexpr(&exp)?.to_sexpr(0, false)?,
                Some("arc") => Arc::from_sexpr(&exp)?.to_sexpr(0, false)?,
                _ => Target::from_sexpr(&exp)?.to_sexpr(0, false)?,
            };
            assert_eq!(text, src);
        }
        Ok(())
    }
}
