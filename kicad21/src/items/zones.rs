//!
//! # Zones
//!
//! Copper pours and rule areas (keep-outs), for boards and footprints.
//!

// Std-Lib
use std::fmt::Write;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use super::common::{decode_pts, Position};
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::enumstr;
use crate::write::{Endline, Indent, Quoted, YesNo};
use crate::KiResult;

enumstr!(
    /// # Keep-Out Rules
    KeepoutRule {
        Allowed: "allowed",
        NotAllowed: "not_allowed",
    }
);

/// Write a list of layer names.
/// The combined front-and-back copper keyword `F&B.Cu` is written bare, all others quoted.
pub(crate) fn write_layers(out: &mut String, layers: &[String]) -> KiResult<()> {
    for layer in layers {
        if layer == "F&B.Cu" {
            write!(out, " {}", layer)?;
        } else {
            write!(out, " {}", Quoted(layer))?;
        }
    }
    Ok(())
}

/// Write a `pts` list, one point per line
fn write_pts(out: &mut String, pts: &[Position], indent: usize) -> KiResult<()> {
    let ind = Indent(indent);
    writeln!(out, "{}(pts", ind)?;
    for pt in pts {
        writeln!(out, "{}  {}", ind, pt.xy("xy"))?;
    }
    writeln!(out, "{})", ind)?;
    Ok(())
}

/// # Zone Hatch
/// Outline display style: `none`, `edge` or `full`, and hatch pitch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Hatch {
    pub style: String,
    pub pitch: f64,
}
impl Default for Hatch {
    fn default() -> Self {
        Self {
            style: "edge".into(),
            pitch: 0.508,
        }
    }
}

/// # Pad Connection Settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConnectPads {
    /// `yes`, `no` or `thru_hole_only`. Thermal reliefs if `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    pub clearance: f64,
}
impl FromSexpr for ConnectPads {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "connect_pads")?;
        let mut conn = Self::default();
        for item in list.args() {
            match item.tag() {
                Some("clearance") => conn.clearance = item.num_at(1)?,
                Some(other) => list.skip(other),
                None => conn.connection_type = item.as_text().map(String::from),
            }
        }
        Ok(conn)
    }
}
impl ToSexpr for ConnectPads {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(connect_pads", Indent(indent))?;
        if let Some(t) = &self.connection_type {
            write!(out, " {}", t)?;
        }
        write!(out, " (clearance {})){}", self.clearance, Endline(newline))?;
        Ok(())
    }
}

/// # Keep-Out Settings
/// Present on rule areas only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeepoutSettings {
    pub tracks: KeepoutRule,
    pub vias: KeepoutRule,
    pub pads: KeepoutRule,
    pub copperpour: KeepoutRule,
    pub footprints: KeepoutRule,
}
impl Default for KeepoutSettings {
    fn default() -> Self {
        Self {
            tracks: KeepoutRule::NotAllowed,
            vias: KeepoutRule::NotAllowed,
            pads: KeepoutRule::NotAllowed,
            copperpour: KeepoutRule::NotAllowed,
            footprints: KeepoutRule::NotAllowed,
        }
    }
}
impl FromSexpr for KeepoutSettings {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "keepout")?;
        let mut keepout = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "tracks" => keepout.tracks = item.keyword_at(1)?,
                "vias" => keepout.vias = item.keyword_at(1)?,
                "pads" => keepout.pads = item.keyword_at(1)?,
                "copperpour" => keepout.copperpour = item.keyword_at(1)?,
                "footprints" => keepout.footprints = item.keyword_at(1)?,
                _ => list.skip(tag),
            }
        }
        Ok(keepout)
    }
}
impl ToSexpr for KeepoutSettings {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(keepout (tracks {}) (vias {}) (pads {}) (copperpour {}) (footprints {})){}",
            Indent(indent),
            self.tracks,
            self.vias,
            self.pads,
            self.copperpour,
            self.footprints,
            Endline(newline)
        )?;
        Ok(())
    }
}

/// # Zone Fill Settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FillSettings {
    /// Whether the zone is currently filled
    #[serde(default)]
    pub yes: bool,
    /// Hatched fill if `Some("hatch")`, solid otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub thermal_gap: f64,
    pub thermal_bridge_width: f64,
    /// Corner smoothing: `chamfer` or `fillet`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub island_removal_mode: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub island_area_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hatch_thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hatch_gap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hatch_orientation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hatch_smoothing_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hatch_smoothing_value: Option<f64>,
    /// `hatch_thickness` or `min_thickness`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hatch_border_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hatch_min_hole_area: Option<f64>,
}
impl FillSettings {
    fn has_hatch_params(&self) -> bool {
        self.hatch_thickness.is_some()
            || self.hatch_gap.is_some()
            || self.hatch_orientation.is_some()
            || self.hatch_smoothing_level.is_some()
            || self.hatch_smoothing_value.is_some()
            || self.hatch_border_algorithm.is_some()
            || self.hatch_min_hole_area.is_some()
    }
}
impl FromSexpr for FillSettings {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "fill")?;
        let mut fill = Self {
            yes: list.has_flag("yes"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "mode" => fill.mode = Some(item.text_at(1)?),
                "thermal_gap" => fill.thermal_gap = item.num_at(1)?,
                "thermal_bridge_width" => fill.thermal_bridge_width = item.num_at(1)?,
                "smoothing" => fill.smoothing = Some(item.text_at(1)?),
                "radius" => fill.radius = Some(item.num_at(1)?),
                "island_removal_mode" => fill.island_removal_mode = Some(item.int_at(1)?),
                "island_area_min" => fill.island_area_min = Some(item.num_at(1)?),
                "hatch_thickness" => fill.hatch_thickness = Some(item.num_at(1)?),
                "hatch_gap" => fill.hatch_gap = Some(item.num_at(1)?),
                "hatch_orientation" => fill.hatch_orientation = Some(item.num_at(1)?),
                "hatch_smoothing_level" => fill.hatch_smoothing_level = Some(item.int_at(1)?),
                "hatch_smoothing_value" => fill.hatch_smoothing_value = Some(item.num_at(1)?),
                "hatch_border_algorithm" => fill.hatch_border_algorithm = Some(item.text_at(1)?),
                "hatch_min_hole_area" => fill.hatch_min_hole_area = Some(item.num_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(fill)
    }
}
impl ToSexpr for FillSettings {
    /// Hatch parameters, if any, continue on a second line
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(fill", ind)?;
        if self.yes {
            out.push_str(" yes");
        }
        if let Some(mode) = &self.mode {
            write!(out, " (mode {})", mode)?;
        }
        write!(
            out,
            " (thermal_gap {}) (thermal_bridge_width {})",
            self.thermal_gap, self.thermal_bridge_width
        )?;
        if let Some(s) = &self.smoothing {
            write!(out, " (smoothing {})", s)?;
        }
        if let Some(r) = self.radius {
            write!(out, " (radius {})", r)?;
        }
        if let Some(m) = self.island_removal_mode {
            write!(out, " (island_removal_mode {})", m)?;
        }
        if let Some(a) = self.island_area_min {
            write!(out, " (island_area_min {})", a)?;
        }
        if self.has_hatch_params() {
            write!(out, "\n{}  ", ind)?;
            let mut params = Vec::new();
            if let Some(v) = self.hatch_thickness {
                params.push(format!("(hatch_thickness {})", v));
            }
            if let Some(v) = self.hatch_gap {
                params.push(format!("(hatch_gap {})", v));
            }
            if let Some(v) = self.hatch_orientation {
                params.push(format!("(hatch_orientation {})", v));
            }
            if let Some(v) = self.hatch_smoothing_level {
                params.push(format!("(hatch_smoothing_level {})", v));
            }
            if let Some(v) = self.hatch_smoothing_value {
                params.push(format!("(hatch_smoothing_value {})", v));
            }
            if let Some(v) = &self.hatch_border_algorithm {
                params.push(format!("(hatch_border_algorithm {})", v));
            }
            if let Some(v) = self.hatch_min_hole_area {
                params.push(format!("(hatch_min_hole_area {})", v));
            }
            out.push_str(&params.join(" "));
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Zone Outline Polygon
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ZonePolygon {
    pub coordinates: Vec<Position>,
}
impl FromSexpr for ZonePolygon {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "polygon")?;
        let mut poly = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "pts" => poly.coordinates.extend(decode_pts(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(poly)
    }
}
impl ToSexpr for ZonePolygon {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(polygon", ind)?;
        write_pts(out, &self.coordinates, indent + 2)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Filled Polygon
/// Result of a zone fill, per layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilledPolygon {
    pub layer: String,
    /// Fill area not connected to the zone's net
    #[serde(default)]
    pub island: bool,
    pub coordinates: Vec<Position>,
}
impl FromSexpr for FilledPolygon {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "filled_polygon")?;
        let mut poly = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "layer" => poly.layer = item.text_at(1)?,
                "island" => poly.island = true,
                "pts" => poly.coordinates.extend(decode_pts(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(poly)
    }
}
impl ToSexpr for FilledPolygon {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(filled_polygon", ind)?;
        writeln!(out, "{}  (layer {})", ind, Quoted(&self.layer))?;
        if self.island {
            writeln!(out, "{}  (island)", ind)?;
        }
        write_pts(out, &self.coordinates, indent + 2)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Fill Segments
/// Legacy segment-based fill, per layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FillSegments {
    pub layer: String,
    pub coordinates: Vec<Position>,
}
impl FromSexpr for FillSegments {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "fill_segments")?;
        let mut segs = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "layer" => segs.layer = item.text_at(1)?,
                "pts" => segs.coordinates.extend(decode_pts(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(segs)
    }
}
impl ToSexpr for FillSegments {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(fill_segments", ind)?;
        writeln!(out, "{}  (layer {})", ind, Quoted(&self.layer))?;
        write_pts(out, &self.coordinates, indent + 2)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

///
/// # Zone
///
/// Copper pour or keep-out area.
/// The layer list is written with whichever of `(layer ..)` and `(layers ..)` it was read from.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Zone {
    #[serde(default)]
    pub locked: bool,
    pub net: i64,
    pub net_name: String,
    pub layers: Vec<String>,
    /// Whether the layers were read as `(layers ..)` rather than `(layer ..)`
    #[serde(default)]
    pub multi_layer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tstamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub hatch: Hatch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_pads: Option<ConnectPads>,
    pub min_thickness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filled_areas_thickness: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keepout: Option<KeepoutSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_settings: Option<FillSettings>,
    #[serde(default)]
    pub polygons: Vec<ZonePolygon>,
    #[serde(default)]
    pub filled_polygons: Vec<FilledPolygon>,
    #[serde(default)]
    pub fill_segments: Vec<FillSegments>,
}
impl FromSexpr for Zone {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "zone")?;
        let mut zone = Self {
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "net" => zone.net = item.int_at(1)?,
                "net_name" => zone.net_name = item.text_at(1)?,
                "layer" | "layers" => {
                    zone.multi_layer = tag == "layers";
                    let layers = SexpList::new(item)?;
                    zone.layers = (1..layers.len())
                        .map(|idx| layers.text(idx))
                        .collect::<KiResult<_>>()?;
                }
                "tstamp" => zone.tstamp = Some(item.text_at(1)?),
                "name" => zone.name = Some(item.text_at(1)?),
                "hatch" => {
                    zone.hatch = Hatch {
                        style: item.text_at(1)?,
                        pitch: item.num_at(2)?,
                    }
                }
                "priority" => zone.priority = Some(item.int_at(1)?),
                "connect_pads" => zone.connect_pads = Some(ConnectPads::from_sexpr(item)?),
                "min_thickness" => zone.min_thickness = item.num_at(1)?,
                "filled_areas_thickness" => zone.filled_areas_thickness = Some(item.yes_no_at(1)?),
                "keepout" => zone.keepout = Some(KeepoutSettings::from_sexpr(item)?),
                "fill" => zone.fill_settings = Some(FillSettings::from_sexpr(item)?),
                "polygon" => zone.polygons.push(ZonePolygon::from_sexpr(item)?),
                "filled_polygon" => zone.filled_polygons.push(FilledPolygon::from_sexpr(item)?),
                "fill_segments" => zone.fill_segments.push(FillSegments::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(zone)
    }
}
impl ToSexpr for Zone {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(zone", ind)?;
        if self.locked {
            out.push_str(" locked");
        }
        write!(
            out,
            " (net {}) (net_name {})",
            self.net,
            Quoted(&self.net_name)
        )?;
        out.push_str(match self.multi_layer {
            true => " (layers",
            false => " (layer",
        });
        write_layers(out, &self.layers)?;
        out.push(')');
        if let Some(tstamp) = &self.tstamp {
            write!(out, " (tstamp {})", tstamp)?;
        }
        if let Some(name) = &self.name {
            write!(out, " (name {})", Quoted(name))?;
        }
        writeln!(out, " (hatch {} {})", self.hatch.style, self.hatch.pitch)?;
        if let Some(p) = self.priority {
            writeln!(out, "{}  (priority {})", ind, p)?;
        }
        if let Some(conn) = &self.connect_pads {
            conn.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}  (min_thickness {})", ind, self.min_thickness)?;
        if let Some(t) = self.filled_areas_thickness {
            write!(out, " (filled_areas_thickness {})", YesNo(t))?;
        }
        out.push('\n');
        if let Some(keepout) = &self.keepout {
            keepout.write_sexpr(out, indent + 2, true)?;
        }
        if let Some(fill) = &self.fill_settings {
            fill.write_sexpr(out, indent + 2, true)?;
        }
        for poly in &self.polygons {
            poly.write_sexpr(out, indent + 2, true)?;
        }
        for poly in &self.filled_polygons {
            poly.write_sexpr(out, indent + 2, true)?;
        }
        for segs in &self.fill_segments {
            segs.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;

    #[test]
    fn keepout_zone() -> KiResult<()> {
        let src = concat!(
            "  (zone (net 0) (net_name \"\") (layers F&B.Cu) (tstamp 1d2e) (name \"rule\") (hatch full 0.508)\n",
            "    (connect_pads (clearance 0))\n",
            "    (min_thickness 0.254)\n",
            "    (keepout (tracks not_allowed) (vias not_allowed) (pads allowed) (copperpour not_allowed) (footprints allowed))\n",
            "    (fill (thermal_gap 0.508) (thermal_bridge_width 0.508))\n",
            "    (polygon\n",
            "      (pts\n",
            "        (xy 0 0)\n",
            "        (xy 10 0)\n",
            "        (xy 10 10)\n",
            "      )\n",
            "    )\n",
            "  )\n",
        );
        let zone = Zone::from_sexpr(&parse_str(src)?)?;
        assert_eq!(zone.layers, vec!["F&B.Cu".to_string()]);
        assert!(zone.multi_layer);
        let keepout = zone.keepout.as_ref().map(|k| k.pads);
        assert_eq!(keepout, Some(KeepoutRule::Allowed));
        assert_eq!(zone.to_sexpr(2, true)?, src);
        // The keyword is kept as read, regardless of the layer count
        let one = Zone::from_sexpr(&parse_str(&src.replace("F&B.Cu", "\"F.Cu\""))?)?;
        assert!(one.to_sexpr(0, false)?.contains("(layers \"F.Cu\")"));
        let two = Zone::from_sexpr(&parse_str(
            &src.replace("(layers F&B.Cu)", "(layer \"F.Cu\" \"B.Cu\")"),
        )?)?;
        assert!(!two.multi_layer);
        assert!(two.to_sexpr(0, false)?.contains("(layer \"F.Cu\" \"B.Cu\")"));
        Ok(())
    }

    #[test]
    fn filled_zone() -> KiResult<()> {
        let src = concat!(
            "(zone (net 1) (net_name \"GND\") (layers \"F.Cu\" \"B.Cu\") (hatch edge 0.508)\n",
            "  (priority 2)\n",
            "  (connect_pads yes (clearance 0.2))\n",
            "  (min_thickness 0.254) (filled_areas_thickness no)\n",
            "  (fill yes (mode hatch) (thermal_gap 0.5) (thermal_bridge_width 0.5) (smoothing fillet) (radius 1)\n",
            "    (hatch_thickness 1) (hatch_gap 1.5) (hatch_orientation 0) (hatch_border_algorithm hatch_thickness) (hatch_min_hole_area 0.3))\n",
            "  (filled_polygon\n",
            "    (layer \"F.Cu\")\n",
            "    (island)\n",
            "    (pts\n",
            "      (xy 1 1)\n",
            "      (xy 2 2)\n",
            "    )\n",
            "  )\n",
            ")",
        );
        let zone = Zone::from_sexpr(&parse_str(src)?)?;
        assert_eq!(zone.priority, Some(2));
        assert!(zone.filled_polygons[0].island);
        assert_eq!(zone.to_sexpr(0, false)?, src);
        Ok(())
    }
}
