//!
//! # Schematic Items
//!
//! Connectivity (wires, junctions, labels), annotations (texts, shapes),
//! placed symbols and hierarchical sheets of `.kicad_sch` files.
//!

// Std-Lib
use std::fmt::Write;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use super::common::{decode_pts, ColorRGBA, Effects, Fill, Position, ProjectInstance, Property, Stroke};
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::{enumstr, ErrorHelper};
use crate::write::{Endline, Indent, Quoted, YesNo};
use crate::KiResult;

enumstr!(
    /// # Connection Kinds
    ConnectionType {
        Wire: "wire",
        Bus: "bus",
    }
);
impl Default for ConnectionType {
    fn default() -> Self {
        Self::Wire
    }
}

enumstr!(
    /// # Label and Sheet-Pin Shapes
    LabelShape {
        Input: "input",
        Output: "output",
        Bidirectional: "bidirectional",
        TriState: "tri_state",
        Passive: "passive",
    }
);
impl Default for LabelShape {
    fn default() -> Self {
        Self::Input
    }
}

/// Write an optional `(uuid U)` line
fn write_uuid(out: &mut String, indent: usize, uuid: &Option<String>) -> KiResult<()> {
    if let Some(uuid) = uuid {
        writeln!(out, "{}  (uuid {})", Indent(indent), uuid)?;
    }
    Ok(())
}

/// # Junction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Junction {
    pub position: Position,
    /// Zero for the default size
    pub diameter: f64,
    pub color: ColorRGBA,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for Junction {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "junction")?;
        let mut junction = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "at" => junction.position = Position::from_sexpr(item)?,
                "diameter" => junction.diameter = item.num_at(1)?,
                "color" => junction.color = ColorRGBA::from_sexpr(item)?,
                "uuid" => junction.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(junction)
    }
}
impl ToSexpr for Junction {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(junction {} (diameter {}) ",
            ind,
            self.position.xy("at"),
            self.diameter
        )?;
        self.color.write_sexpr(out, 0, false)?;
        if self.uuid.is_some() {
            out.push('\n');
            write_uuid(out, indent, &self.uuid)?;
            write!(out, "{}", ind)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # No-Connect Flag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NoConnect {
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for NoConnect {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "no_connect")?;
        let mut nc = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "at" => nc.position = Position::from_sexpr(item)?,
                "uuid" => nc.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(nc)
    }
}
impl ToSexpr for NoConnect {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(no_connect {}", Indent(indent), self.position.xy("at"))?;
        if let Some(uuid) = &self.uuid {
            write!(out, " (uuid {})", uuid)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Bus Entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BusEntry {
    pub position: Position,
    /// Extent of the entry, as X and Y offsets
    pub size: Position,
    pub stroke: Stroke,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for BusEntry {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "bus_entry")?;
        let mut entry = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "at" => entry.position = Position::from_sexpr(item)?,
                "size" => entry.size = Position::from_sexpr(item)?,
                "stroke" => entry.stroke = Stroke::from_sexpr(item)?,
                "uuid" => entry.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(entry)
    }
}
impl ToSexpr for BusEntry {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(
            out,
            "{}(bus_entry {} {}",
            ind,
            self.position.xy("at"),
            self.size.xy("size")
        )?;
        self.stroke.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Bus Alias
/// `(bus_alias "name" (members "a" "b" ...))`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BusAlias {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}
impl FromSexpr for BusAlias {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "bus_alias")?;
        let mut alias = Self {
            name: list.text(1)?,
            members: Vec::new(),
        };
        for (tag, item) in list.children() {
            match tag {
                "members" => {
                    let members = SexpList::new(item)?;
                    for idx in 1..members.len() {
                        alias.members.push(members.text(idx)?);
                    }
                }
                _ => list.skip(tag),
            }
        }
        Ok(alias)
    }
}
impl ToSexpr for BusAlias {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(bus_alias {} (members", Indent(indent), Quoted(&self.name))?;
        for member in &self.members {
            write!(out, " {}", Quoted(member))?;
        }
        write!(out, ")){}", Endline(newline))?;
        Ok(())
    }
}

/// Write `(pts (xy ..) (xy ..))` on a single line
fn write_inline_pts(out: &mut String, pts: &[Position]) -> KiResult<()> {
    out.push_str("(pts");
    for pt in pts {
        write!(out, " {}", pt.xy("xy"))?;
    }
    out.push(')');
    Ok(())
}

/// # Wire or Bus
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Connection {
    pub connection_type: ConnectionType,
    pub points: Vec<Position>,
    pub stroke: Stroke,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for Connection {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect_any(exp, &["wire", "bus"])?;
        let mut conn = Self {
            connection_type: list.keyword(0)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "pts" => conn.points = decode_pts(item)?,
                "stroke" => conn.stroke = Stroke::from_sexpr(item)?,
                "uuid" => conn.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(conn)
    }
}
impl ToSexpr for Connection {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}({} ", ind, self.connection_type)?;
        write_inline_pts(out, &self.points)?;
        out.push('\n');
        self.stroke.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Graphical Poly-Line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolyLine {
    pub points: Vec<Position>,
    pub stroke: Stroke,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for PolyLine {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "polyline")?;
        let mut poly = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "pts" => poly.points = decode_pts(item)?,
                "stroke" => poly.stroke = Stroke::from_sexpr(item)?,
                "uuid" => poly.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(poly)
    }
}
impl ToSexpr for PolyLine {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(polyline ", ind)?;
        write_inline_pts(out, &self.points)?;
        out.push('\n');
        self.stroke.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Schematic Wiring Item
/// Wires, buses and graphical lines, which share one section of the schematic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum WiringItem {
    Connection(Connection),
    PolyLine(PolyLine),
}
impl ToSexpr for WiringItem {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        match self {
            Self::Connection(i) => i.write_sexpr(out, indent, newline),
            Self::PolyLine(i) => i.write_sexpr(out, indent, newline),
        }
    }
}

/// # Text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Text {
    pub text: String,
    pub position: Position,
    pub effects: Effects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for Text {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "text")?;
        let mut text = Self {
            text: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "at" => text.position = Position::from_sexpr(item)?,
                "effects" => text.effects = Effects::from_sexpr(item)?,
                "uuid" => text.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(text)
    }
}
impl ToSexpr for Text {
    /// Texts of fifty characters or more have their position on the following line
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(text {}", ind, Quoted(&self.text))?;
        if self.text.chars().count() >= 50 {
            write!(out, "\n{}  ", ind)?;
        } else {
            out.push(' ');
        }
        writeln!(out, "{}", self.position.xya("at"))?;
        self.effects.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Text Box
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextBox {
    pub text: String,
    pub position: Position,
    pub size: Position,
    pub stroke: Stroke,
    pub fill: Fill,
    pub effects: Effects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for TextBox {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "text_box")?;
        let mut tb = Self {
            text: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "at" => tb.position = Position::from_sexpr(item)?,
                "size" => tb.size = Position::from_sexpr(item)?,
                "stroke" => tb.stroke = Stroke::from_sexpr(item)?,
                "fill" => tb.fill = Fill::from_sexpr(item)?,
                "effects" => tb.effects = Effects::from_sexpr(item)?,
                "uuid" => tb.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(tb)
    }
}
impl ToSexpr for TextBox {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(text_box {}", ind, Quoted(&self.text))?;
        writeln!(
            out,
            "{}  {} {}",
            ind,
            self.position.xya("at"),
            self.size.xy("size")
        )?;
        self.stroke.write_sexpr(out, indent + 2, true)?;
        self.fill.write_sexpr(out, indent + 2, true)?;
        self.effects.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Local Label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocalLabel {
    pub text: String,
    pub position: Position,
    #[serde(default)]
    pub fields_autoplaced: bool,
    pub effects: Effects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for LocalLabel {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "label")?;
        let mut label = Self {
            text: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "at" => label.position = Position::from_sexpr(item)?,
                "fields_autoplaced" => label.fields_autoplaced = true,
                "effects" => label.effects = Effects::from_sexpr(item)?,
                "uuid" => label.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(label)
    }
}
impl ToSexpr for LocalLabel {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(label {} {}",
            ind,
            Quoted(&self.text),
            self.position.xya("at")
        )?;
        if self.fields_autoplaced {
            out.push_str(" (fields_autoplaced)");
        }
        out.push('\n');
        self.effects.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Global Label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GlobalLabel {
    pub text: String,
    pub shape: LabelShape,
    pub position: Position,
    #[serde(default)]
    pub fields_autoplaced: bool,
    pub effects: Effects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Intersheet references and similar fields
    #[serde(default)]
    pub properties: Vec<Property>,
}
impl FromSexpr for GlobalLabel {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "global_label")?;
        let mut label = Self {
            text: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "shape" => label.shape = item.keyword_at(1)?,
                "at" => label.position = Position::from_sexpr(item)?,
                "fields_autoplaced" => label.fields_autoplaced = true,
                "effects" => label.effects = Effects::from_sexpr(item)?,
                "uuid" => label.uuid = Some(item.text_at(1)?),
                "property" => label.properties.push(Property::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(label)
    }
}
impl ToSexpr for GlobalLabel {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(global_label {} (shape {}) {}",
            ind,
            Quoted(&self.text),
            self.shape,
            self.position.xya("at")
        )?;
        if self.fields_autoplaced {
            out.push_str(" (fields_autoplaced)");
        }
        out.push('\n');
        self.effects.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        for prop in &self.properties {
            prop.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Hierarchical Label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HierarchicalLabel {
    pub text: String,
    pub shape: LabelShape,
    pub position: Position,
    #[serde(default)]
    pub fields_autoplaced: bool,
    pub effects: Effects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for HierarchicalLabel {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "hierarchical_label")?;
        let mut label = Self {
            text: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "shape" => label.shape = item.keyword_at(1)?,
                "at" => label.position = Position::from_sexpr(item)?,
                "fields_autoplaced" => label.fields_autoplaced = true,
                "effects" => label.effects = Effects::from_sexpr(item)?,
                "uuid" => label.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(label)
    }
}
impl ToSexpr for HierarchicalLabel {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(hierarchical_label {} (shape {}) {}",
            ind,
            Quoted(&self.text),
            self.shape,
            self.position.xya("at")
        )?;
        if self.fields_autoplaced {
            out.push_str(" (fields_autoplaced)");
        }
        out.push('\n');
        self.effects.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Net-Class Flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NetclassFlag {
    pub text: String,
    pub length: f64,
    /// `round`, `dot`, `diamond` or `rectangle`
    pub shape: String,
    pub position: Position,
    #[serde(default)]
    pub fields_autoplaced: bool,
    pub effects: Effects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}
impl Default for NetclassFlag {
    fn default() -> Self {
        Self {
            text: String::new(),
            length: 2.54,
            shape: "round".into(),
            position: Position::default(),
            fields_autoplaced: false,
            effects: Effects::default(),
            uuid: None,
            properties: Vec::new(),
        }
    }
}
impl FromSexpr for NetclassFlag {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "netclass_flag")?;
        let mut flag = Self {
            text: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "length" => flag.length = item.num_at(1)?,
                "shape" => flag.shape = item.text_at(1)?,
                "at" => flag.position = Position::from_sexpr(item)?,
                "fields_autoplaced" => flag.fields_autoplaced = true,
                "effects" => flag.effects = Effects::from_sexpr(item)?,
                "uuid" => flag.uuid = Some(item.text_at(1)?),
                "property" => flag.properties.push(Property::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(flag)
    }
}
impl ToSexpr for NetclassFlag {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(netclass_flag {} (length {}) (shape {}) {}",
            ind,
            Quoted(&self.text),
            self.length,
            self.shape,
            self.position.xya("at")
        )?;
        if self.fields_autoplaced {
            out.push_str(" (fields_autoplaced)");
        }
        out.push('\n');
        self.effects.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        for prop in &self.properties {
            prop.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Rectangle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rectangle {
    pub start: Position,
    pub end: Position,
    pub stroke: Stroke,
    pub fill: Fill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for Rectangle {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "rectangle")?;
        let mut rect = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "start" => rect.start = Position::from_sexpr(item)?,
                "end" => rect.end = Position::from_sexpr(item)?,
                "stroke" => rect.stroke = Stroke::from_sexpr(item)?,
                "fill" => rect.fill = Fill::from_sexpr(item)?,
                "uuid" => rect.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(rect)
    }
}
impl ToSexpr for Rectangle {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(
            out,
            "{}(rectangle {} {}",
            ind,
            self.start.xy("start"),
            self.end.xy("end")
        )?;
        self.stroke.write_sexpr(out, indent + 2, true)?;
        self.fill.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Arc
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Arc {
    pub start: Position,
    pub mid: Position,
    pub end: Position,
    pub stroke: Stroke,
    pub fill: Fill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for Arc {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "arc")?;
        let mut arc = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "start" => arc.start = Position::from_sexpr(item)?,
                "mid" => arc.mid = Position::from_sexpr(item)?,
                "end" => arc.end = Position::from_sexpr(item)?,
                "stroke" => arc.stroke = Stroke::from_sexpr(item)?,
                "fill" => arc.fill = Fill::from_sexpr(item)?,
                "uuid" => arc.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(arc)
    }
}
impl ToSexpr for Arc {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(
            out,
            "{}(arc {} {} {}",
            ind,
            self.start.xy("start"),
            self.mid.xy("mid"),
            self.end.xy("end")
        )?;
        self.stroke.write_sexpr(out, indent + 2, true)?;
        self.fill.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Circle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Circle {
    pub center: Position,
    pub radius: f64,
    pub stroke: Stroke,
    pub fill: Fill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for Circle {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "circle")?;
        let mut circle = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "center" => circle.center = Position::from_sexpr(item)?,
                "radius" => circle.radius = item.num_at(1)?,
                "stroke" => circle.stroke = Stroke::from_sexpr(item)?,
                "fill" => circle.fill = Fill::from_sexpr(item)?,
                "uuid" => circle.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(circle)
    }
}
impl ToSexpr for Circle {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(
            out,
            "{}(circle {} (radius {})",
            ind,
            self.center.xy("center"),
            self.radius
        )?;
        self.stroke.write_sexpr(out, indent + 2, true)?;
        self.fill.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Schematic Shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum Shape {
    Arc(Arc),
    Circle(Circle),
    Rectangle(Rectangle),
}
impl ToSexpr for Shape {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        match self {
            Self::Arc(i) => i.write_sexpr(out, indent, newline),
            Self::Circle(i) => i.write_sexpr(out, indent, newline),
            Self::Rectangle(i) => i.write_sexpr(out, indent, newline),
        }
    }
}

/// # Symbol Project Path
/// Annotation of a placed symbol within one sheet path of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SymbolProjectPath {
    pub sheet_instance_path: String,
    pub reference: String,
    pub unit: i64,
}
impl Default for SymbolProjectPath {
    fn default() -> Self {
        Self {
            sheet_instance_path: String::new(),
            reference: String::new(),
            unit: 1,
        }
    }
}
impl FromSexpr for SymbolProjectPath {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "path")?;
        let mut path = Self {
            sheet_instance_path: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "reference" => path.reference = item.text_at(1)?,
                "unit" => path.unit = item.int_at(1)?,
                _ => list.skip(tag),
            }
        }
        Ok(path)
    }
}
impl ToSexpr for SymbolProjectPath {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(path {}", ind, Quoted(&self.sheet_instance_path))?;
        writeln!(
            out,
            "{}  (reference {}) (unit {})",
            ind,
            Quoted(&self.reference),
            self.unit
        )?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Hierarchical Sheet Project Path
/// Page number of a sheet within one sheet path of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HierarchicalSheetProjectPath {
    pub sheet_instance_path: String,
    pub page: String,
}
impl FromSexpr for HierarchicalSheetProjectPath {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "path")?;
        let mut path = Self {
            sheet_instance_path: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "page" => path.page = item.text_at(1)?,
                _ => list.skip(tag),
            }
        }
        Ok(path)
    }
}
impl ToSexpr for HierarchicalSheetProjectPath {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(path {} (page {})){}",
            Indent(indent),
            Quoted(&self.sheet_instance_path),
            Quoted(&self.page),
            Endline(newline)
        )?;
        Ok(())
    }
}

/// Decode the `project` entries of an `instances` list
fn decode_instances<P: FromSexpr>(exp: &Sexp) -> KiResult<Vec<ProjectInstance<P>>> {
    let list = SexpList::expect(exp, "instances")?;
    list.args().iter().map(ProjectInstance::from_sexpr).collect()
}
/// Write a non-empty `instances` block
fn write_instances<P: ToSexpr>(
    out: &mut String,
    indent: usize,
    instances: &[ProjectInstance<P>],
) -> KiResult<()> {
    if instances.is_empty() {
        return Ok(());
    }
    let ind = Indent(indent);
    writeln!(out, "{}  (instances", ind)?;
    for inst in instances {
        inst.write_sexpr(out, indent + 4, true)?;
    }
    writeln!(out, "{}  )", ind)?;
    Ok(())
}

///
/// # Schematic Symbol
///
/// A placed instance of a library symbol.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchematicSymbol {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_nickname: Option<String>,
    pub entry_name: String,
    /// Name of the cached library symbol, when it differs from the library id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib_name: Option<String>,
    pub position: Position,
    /// `x` or `y`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<i64>,
    #[serde(default)]
    pub in_bom: bool,
    #[serde(default)]
    pub on_board: bool,
    /// Do not populate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnp: Option<bool>,
    #[serde(default)]
    pub fields_autoplaced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Pin numbers and their uuids, in file order
    #[serde(default)]
    pub pins: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instances: Vec<ProjectInstance<SymbolProjectPath>>,
}
impl SchematicSymbol {
    /// Get our combined `library:entry` identifier
    pub fn lib_id(&self) -> String {
        match &self.library_nickname {
            Some(lib) => format!("{}:{}", lib, self.entry_name),
            None => self.entry_name.clone(),
        }
    }
    /// Set our identifier from `library:entry` or bare `entry` form
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
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
    /// Get the uuid of pin `number`
    pub fn pin_uuid(&self, number: &str) -> Option<&str> {
        self.pins
            .iter()
            .find(|(n, _)| n == number)
            .map(|(_, u)| u.as_str())
    }
}
impl FromSexpr for SchematicSymbol {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "symbol")?;
        let mut symbol = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "lib_id" => symbol.set_lib_id(&item.text_at(1)?),
                "lib_name" => symbol.lib_name = Some(item.text_at(1)?),
                "at" => symbol.position = Position::from_sexpr(item)?,
                "mirror" => symbol.mirror = Some(item.text_at(1)?),
                "unit" => symbol.unit = Some(item.int_at(1)?),
                "in_bom" => symbol.in_bom = item.yes_no_at(1)?,
                "on_board" => symbol.on_board = item.yes_no_at(1)?,
                "dnp" => symbol.dnp = Some(item.yes_no_at(1)?),
                "fields_autoplaced" => symbol.fields_autoplaced = true,
                "uuid" => symbol.uuid = Some(item.text_at(1)?),
                "property" => symbol.properties.push(Property::from_sexpr(item)?),
                "pin" => {
                    let pin = SexpList::new(item)?;
                    let uuid = pin.children().find(|(t, _)| *t == "uuid").map(|(_, u)| u);
                    let uuid = pin.unwrap(uuid, "missing pin uuid")?;
                    symbol.pins.push((pin.text(1)?, uuid.text_at(1)?));
                }
                "instances" => symbol.instances = decode_instances(item)?,
                _ => list.skip(tag),
            }
        }
        Ok(symbol)
    }
}
impl ToSexpr for SchematicSymbol {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(symbol", ind)?;
        if let Some(name) = &self.lib_name {
            write!(out, " (lib_name {})", Quoted(name))?;
        }
        write!(
            out,
            " (lib_id {}) {}",
            Quoted(&self.lib_id()),
            self.position.xya("at")
        )?;
        if let Some(m) = &self.mirror {
            write!(out, " (mirror {})", m)?;
        }
        if let Some(u) = self.unit {
            write!(out, " (unit {})", u)?;
        }
        write!(
            out,
            "\n{}  (in_bom {}) (on_board {})",
            ind,
            YesNo(self.in_bom),
            YesNo(self.on_board)
        )?;
        if let Some(dnp) = self.dnp {
            write!(out, " (dnp {})", YesNo(dnp))?;
        }
        if self.fields_autoplaced {
            out.push_str(" (fields_autoplaced)");
        }
        out.push('\n');
        write_uuid(out, indent, &self.uuid)?;
        for prop in &self.properties {
            prop.write_sexpr(out, indent + 2, true)?;
        }
        for (number, uuid) in &self.pins {
            writeln!(out, "{}  (pin {} (uuid {}))", ind, Quoted(number), uuid)?;
        }
        write_instances(out, indent, &self.instances)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Hierarchical Sheet Pin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HierarchicalPin {
    pub name: String,
    pub connection_type: LabelShape,
    pub position: Position,
    pub effects: Effects,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}
impl FromSexpr for HierarchicalPin {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "pin")?;
        let mut pin = Self {
            name: list.text(1)?,
            connection_type: list.keyword(2)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "at" => pin.position = Position::from_sexpr(item)?,
                "effects" => pin.effects = Effects::from_sexpr(item)?,
                "uuid" => pin.uuid = Some(item.text_at(1)?),
                _ => list.skip(tag),
            }
        }
        Ok(pin)
    }
}
impl ToSexpr for HierarchicalPin {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(
            out,
            "{}(pin {} {} {}",
            ind,
            Quoted(&self.name),
            self.connection_type,
            self.position.xya("at")
        )?;
        self.effects.write_sexpr(out, indent + 2, true)?;
        write_uuid(out, indent, &self.uuid)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

///
/// # Hierarchical Sheet
///
/// A sub-schematic placed on its parent sheet.
/// Its name and file are held in the `Sheet name` and `Sheet file` properties.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HierarchicalSheet {
    pub position: Position,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub fields_autoplaced: bool,
    pub stroke: Stroke,
    /// Background color, written with four decimals of alpha
    pub fill: ColorRGBA,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub sheet_name: Property,
    pub file_name: Property,
    #[serde(default)]
    pub pins: Vec<HierarchicalPin>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instances: Vec<ProjectInstance<HierarchicalSheetProjectPath>>,
}
impl Default for HierarchicalSheet {
    fn default() -> Self {
        Self {
            position: Position::default(),
            width: 0.0,
            height: 0.0,
            fields_autoplaced: false,
            stroke: Stroke::default(),
            fill: ColorRGBA {
                precision: Some(4),
                ..Default::default()
            },
            uuid: None,
            sheet_name: Property::new("Sheet name", ""),
            file_name: Property::new("Sheet file", ""),
            pins: Vec::new(),
            instances: Vec::new(),
        }
    }
}
impl FromSexpr for HierarchicalSheet {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "sheet")?;
        let mut sheet = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "at" => sheet.position = Position::from_sexpr(item)?,
                "size" => {
                    sheet.width = item.num_at(1)?;
                    sheet.height = item.num_at(2)?;
                }
                "fields_autoplaced" => sheet.fields_autoplaced = true,
                "stroke" => sheet.stroke = Stroke::from_sexpr(item)?,
                "fill" => {
                    sheet.fill = ColorRGBA::from_sexpr(item.at(1)?)?;
                    sheet.fill.precision = Some(4);
                }
                "uuid" => sheet.uuid = Some(item.text_at(1)?),
                "property" => {
                    let prop = Property::from_sexpr(item)?;
                    match prop.key.as_str() {
                        "Sheet name" | "Sheetname" => sheet.sheet_name = prop,
                        "Sheet file" | "Sheetfile" => sheet.file_name = prop,
                        _ => list.skip("property"),
                    }
                }
                "pin" => sheet.pins.push(HierarchicalPin::from_sexpr(item)?),
                "instances" => sheet.instances = decode_instances(item)?,
                _ => list.skip(tag),
            }
        }
        Ok(sheet)
    }
}
impl ToSexpr for HierarchicalSheet {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(sheet {} (size {} {})",
            ind,
            self.position.xy("at"),
            self.width,
            self.height
        )?;
        if self.fields_autoplaced {
            out.push_str(" (fields_autoplaced)");
        }
        out.push('\n');
        self.stroke.write_sexpr(out, indent + 2, true)?;
        write!(out, "{}  (fill ", ind)?;
        self.fill.write_sexpr(out, 0, false)?;
        out.push_str(")\n");
        write_uuid(out, indent, &self.uuid)?;
        self.sheet_name.write_sexpr(out, indent + 2, true)?;
        self.file_name.write_sexpr(out, indent + 2, true)?;
        for pin in &self.pins {
            pin.write_sexpr(out, indent + 2, true)?;
        }
        write_instances(out, indent, &self.instances)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Sheet Instance
/// Page number of one sheet path, as listed in the root schematic's `sheet_instances`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HierarchicalSheetInstance {
    pub instance_path: String,
    pub page: String,
}
impl Default for HierarchicalSheetInstance {
    fn default() -> Self {
        Self {
            instance_path: "/".into(),
            page: "1".into(),
        }
    }
}
impl FromSexpr for HierarchicalSheetInstance {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "path")?;
        let mut inst = Self {
            instance_path: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "page" => inst.page = item.text_at(1)?,
                _ => list.skip(tag),
            }
        }
        Ok(inst)
    }
}
impl ToSexpr for HierarchicalSheetInstance {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(path {} (page {})){}",
            Indent(indent),
            Quoted(&self.instance_path),
            Quoted(&self.page),
            Endline(newline)
        )?;
        Ok(())
    }
}

/// # Symbol Instance
/// Annotation of one placed symbol, as listed in the root schematic's `symbol_instances`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SymbolInstance {
    pub path: String,
    pub reference: String,
    pub unit: i64,
    pub value: String,
    pub footprint: String,
}
impl Default for SymbolInstance {
    fn default() -> Self {
        Self {
            path: "/".into(),
            reference: String::new(),
            unit: 0,
            value: String::new(),
            footprint: String::new(),
        }
    }
}
impl FromSexpr for SymbolInstance {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "path")?;
        let mut inst = Self {
            path: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "reference" => inst.reference = item.text_at(1)?,
                "unit" => inst.unit = item.int_at(1)?,
                "value" => inst.value = item.text_at(1)?,
                "footprint" => inst.footprint = item.text_at(1)?,
                _ => list.skip(tag),
            }
        }
        Ok(inst)
    }
}
impl ToSexpr for SymbolInstance {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(path {}", ind, Quoted(&self.path))?;
        writeln!(
            out,
            "{}  (reference {}) (unit {}) (value {}) (footprint {})",
            ind,
            Quoted(&self.reference),
            self.unit,
            Quoted(&self.value),
            Quoted(&self.footprint)
        )?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;

    #[test]
    fn junctions() -> KiResult<()> {
        let src = concat!(
            "  (junction (at 100.33 50.8) (diameter 0.9144) (color 0 0 0 0)\n",
            "    (uuid 0b5e0b34-5a4c-4f1c-9d8d-2a6a3c1b7e21)\n",
            "  )\n"
        );
        let junction = Junction::from_sexpr(&parse_str(src)?)?;
        assert_eq!(junction.diameter, 0.9144);
        assert_eq!(junction.to_sexpr(2, true)?, src);

        let bare = Junction::from_sexpr(&parse_str("(junction (at 1 2) (diameter 0) (color 0 0 0 0))")?)?;
        assert_eq!(bare.to_sexpr(0, false)?, "(junction (at 1 2) (diameter 0) (color 0 0 0 0))");
        Ok(())
    }

    #[test]
    fn wires() -> KiResult<()> {
        let src = concat!(
            "  (bus (pts (xy 50.8 25.4) (xy 76.2 25.4))\n",
            "    (stroke (width 0) (type default) (color 0 0 0 0))\n",
            "    (uuid 5f0a)\n",
            "  )\n"
        );
        let conn = Connection::from_sexpr(&parse_str(src)?)?;
        assert_eq!(conn.connection_type, ConnectionType::Bus);
        assert_eq!(conn.points.len(), 2);
        assert_eq!(conn.to_sexpr(2, true)?, src);
        assert!(Connection::from_sexpr(&parse_str("(polyline (pts))")?).is_err());
        Ok(())
    }

    #[test]
    fn long_texts_wrap() -> KiResult<()> {
        let mut text = Text {
            text: "short".into(),
            position: Position::with_angle(10.0, 20.0, 0.0),
            ..Default::default()
        };
        assert!(text.to_sexpr(0, false)?.starts_with("(text \"short\" (at 10 20 0)\n"));
        text.text = "x".repeat(50);
        let wrapped = text.to_sexpr(0, false)?;
        assert!(wrapped.starts_with(&format!("(text \"{}\"\n  (at 10 20 0)\n", text.text)));
        assert_eq!(Text::from_sexpr(&parse_str(&wrapped)?)?, text);
        Ok(())
    }

    #[test]
    fn labels() -> KiResult<()> {
        let src = concat!(
            "(global_label \"SDA\" (shape bidirectional) (at 25.4 30.48 180) (fields_autoplaced)\n",
            "  (effects (font (size 1.27 1.27)) (justify right))\n",
            "  (uuid 4c1d)\n",
            "  (property \"Intersheet References\" \"${INTERSHEET_REFS}\" (id 0) (at 0 0 0)\n",
            "    (effects (font (size 1.27 1.27)) hide)\n",
            "  )\n",
            ")"
        );
        let label = GlobalLabel::from_sexpr(&parse_str(src)?)?;
        assert_eq!(label.shape, LabelShape::Bidirectional);
        assert_eq!(label.to_sexpr(0, false)?, src);
        let bad = parse_str("(hierarchical_label \"X\" (shape sideways) (at 0 0 0))")?;
        assert!(HierarchicalLabel::from_sexpr(&bad).is_err());
        Ok(())
    }

    #[test]
    fn schematic_symbol() -> KiResult<()> {
        let src = concat!(
            "  (symbol (lib_name \"R_1\") (lib_id \"Device:R\") (at 127 63.5 90) (mirror x) (unit 1)\n",
            "    (in_bom yes) (on_board yes) (dnp no) (fields_autoplaced)\n",
            "    (uuid 2b3c)\n",
            "    (property \"Reference\" \"R1\" (id 0) (at 127 58.42 90))\n",
            "    (pin \"1\" (uuid 9a1b))\n",
            "    (pin \"2\" (uuid 9a1c))\n",
            "    (instances\n",
            "      (project \"demo\"\n",
            "        (path \"/0c1a\"\n",
            "          (reference \"R1\") (unit 1)\n",
            "        )\n",
            "      )\n",
            "    )\n",
            "  )\n"
        );
        let mut symbol = SchematicSymbol::from_sexpr(&parse_str(src)?)?;
        assert_eq!(symbol.lib_id(), "Device:R");
        assert_eq!(symbol.pin_uuid("2"), Some("9a1c"));
        assert_eq!(symbol.instances[0].paths[0].reference, "R1");
        assert_eq!(symbol.to_sexpr(2, true)?, src);
        symbol.set_lib_id("Unset_Lib_Id");
        assert_eq!(symbol.library_nickname, None);
        assert_eq!(symbol.property("Reference"), Some("R1"));
        Ok(())
    }

    #[test]
    fn sheet() -> KiResult<()> {
        let src = concat!(
            "  (sheet (at 50.8 38.1) (size 25.4 12.7) (fields_autoplaced)\n",
            "    (stroke (width 0.1524) (type solid) (color 0 0 0 0))\n",
            "    (fill (color 0 0 0 0.0000))\n",
            "    (uuid 7d3e)\n",
            "    (property \"Sheet name\" \"Power\" (id 0) (at 50.8 37.3884 0)\n",
            "      (effects (font (size 1.27 1.27)) (justify left bottom))\n",
            "    )\n",
            "    (property \"Sheet file\" \"power.kicad_sch\" (id 1) (at 50.8 51.3846 0)\n",
            "      (effects (font (size 1.27 1.27)) (justify left top))\n",
            "    )\n",
            "    (pin \"VIN\" input (at 50.8 43.18 180)\n",
            "      (effects (font (size 1.27 1.27)) (justify left))\n",
            "      (uuid 11aa)\n",
            "    )\n",
            "    (instances\n",
            "      (project \"demo\"\n",
            "        (path \"/\" (page \"2\"))\n",
            "      )\n",
            "    )\n",
            "  )\n"
        );
        let sheet = HierarchicalSheet::from_sexpr(&parse_str(src)?)?;
        assert_eq!(sheet.sheet_name.value, "Power");
        assert_eq!(sheet.instances[0].paths[0].page, "2");
        assert_eq!(sheet.to_sexpr(2, true)?, src);
        Ok(())
    }

    #[test]
    fn instances() -> KiResult<()> {
        let src = concat!(
            "    (path \"/2b3c\"\n",
            "      (reference \"R1\") (unit 1) (value \"10k\") (footprint \"Resistor_SMD:R_0603\")\n",
            "    )\n"
        );
        let inst = SymbolInstance::from_sexpr(&parse_str(src)?)?;
        assert_eq!(inst.to_sexpr(4, true)?, src);
        let sheet = HierarchicalSheetInstance::default();
        assert_eq!(sheet.to_sexpr(4, true)?, "    (path \"/\" (page \"1\"))\n");
        Ok(())
    }
}
