//!
//! # Common Records
//!
//! Records shared among boards, footprints, schematics, symbols and worksheets:
//! positions, strokes, fonts, text effects, properties, title blocks and the like.
//!

// Std-Lib
use std::fmt::{self, Write};

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::ErrorHelper;
use crate::write::{Endline, Indent, OptAngle, Quoted};
use crate::KiResult;

/// # Position
///
/// A point with optional rotation, as used by `at`, `start`, `end`, `xy` and similar lists.
/// Has no S-expression form of its own; its owners pick the tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Text position unlocked from its parent's rotation
    #[serde(default)]
    pub unlocked: bool,
}
impl Position {
    /// Create a new [Position] without rotation
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }
    /// Create a new [Position] with rotation `angle`
    pub fn with_angle(x: f64, y: f64, angle: f64) -> Self {
        Self {
            x,
            y,
            angle: Some(angle),
            unlocked: false,
        }
    }
    /// Rotate around `center` by `angle` degrees, clockwise-positive in KiCad's y-down frame
    pub fn rotate_around_center(&mut self, center: &Position, angle: f64) {
        let ox = self.x - center.x;
        let oy = self.y - center.y;
        let (sin, cos) = angle.to_radians().sin_cos();
        self.x = ox * cos + oy * sin + center.x;
        self.y = oy * cos - ox * sin + center.y;
    }
    /// Format as `(tag X Y)`
    pub fn xy<'a>(&'a self, tag: &'a str) -> PositionFmt<'a> {
        PositionFmt {
            tag,
            pos: self,
            angle: false,
        }
    }
    /// Format as `(tag X Y[ angle])`
    pub fn xya<'a>(&'a self, tag: &'a str) -> PositionFmt<'a> {
        PositionFmt {
            tag,
            pos: self,
            angle: true,
        }
    }
}
impl FromSexpr for Position {
    /// Decode from any list of the form `(tag X Y [angle] [unlocked])`.
    /// The tag is not checked.
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::new(exp)?;
        list.assert(list.len() >= 3, "expected X and Y values")?;
        let mut pos = Position::new(list.num(1)?, list.num(2)?);
        if let Some(angle) = list.items.get(3) {
            if !angle.is_symbol("unlocked") {
                pos.angle = Some(list.num(3)?);
            }
        }
        pos.unlocked = list.has_flag("unlocked");
        Ok(pos)
    }
}
/// Display helper for [Position]s, created by [Position::xy] and [Position::xya]
pub struct PositionFmt<'a> {
    tag: &'a str,
    pos: &'a Position,
    angle: bool,
}
impl fmt::Display for PositionFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {}", self.tag, self.pos.x, self.pos.y)?;
        if self.angle {
            write!(f, "{}", OptAngle(self.pos.angle))?;
        }
        write!(f, ")")
    }
}

/// Decode each `(xy X Y)` entry of a `(pts ...)` list
pub fn decode_pts(exp: &Sexp) -> KiResult<Vec<Position>> {
    let list = SexpList::expect(exp, "pts")?;
    list.args().iter().map(Position::from_sexpr).collect()
}

/// # Three-Dimensional Coordinate
/// `(xyz X Y Z)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
impl Coordinate {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}
impl FromSexpr for Coordinate {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "xyz")?;
        list.assert(list.len() == 4, "expected exactly three values")?;
        Ok(Self::new(list.num(1)?, list.num(2)?, list.num(3)?))
    }
}
impl ToSexpr for Coordinate {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(xyz {} {} {}){}",
            Indent(indent),
            self.x,
            self.y,
            self.z,
            Endline(newline)
        )?;
        Ok(())
    }
}

/// # RGBA Color
/// `(color R G B A)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColorRGBA {
    pub r: i64,
    pub g: i64,
    pub b: i64,
    pub a: f64,
    /// Fixed number of decimal places for the alpha channel.
    /// Shortest form if `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,
}
impl ColorRGBA {
    pub fn new(r: i64, g: i64, b: i64, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a,
            precision: None,
        }
    }
}
impl FromSexpr for ColorRGBA {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "color")?;
        list.assert(list.len() == 5, "expected exactly four values")?;
        Ok(Self::new(
            list.int(1)?,
            list.int(2)?,
            list.int(3)?,
            list.num(4)?,
        ))
    }
}
impl ToSexpr for ColorRGBA {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(color {} {} {} ",
            Indent(indent),
            self.r,
            self.g,
            self.b
        )?;
        match self.precision {
            Some(p) => write!(out, "{:.*}", p, self.a)?,
            None => write!(out, "{}", self.a)?,
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Stroke
/// `(stroke (width W) [(type T)] [(color R G B A)])`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Stroke {
    pub width: f64,
    /// Line style, e.g. `default`, `solid`, `dash`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorRGBA>,
}
impl FromSexpr for Stroke {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "stroke")?;
        list.assert(list.len() >= 2, "empty stroke")?;
        let mut stroke = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "width" => stroke.width = item.num_at(1)?,
                "type" => stroke.stroke_type = Some(item.text_at(1)?),
                "color" => stroke.color = Some(ColorRGBA::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(stroke)
    }
}
impl ToSexpr for Stroke {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(stroke (width {})", Indent(indent), self.width)?;
        if let Some(t) = &self.stroke_type {
            write!(out, " (type {})", t)?;
        }
        if let Some(color) = &self.color {
            out.push(' ');
            color.write_sexpr(out, 0, false)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Line Width Specification
///
/// Graphical items carry either the legacy `(width W)` token (KiCad 6)
/// or a full `(stroke ...)` definition (KiCad 7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum LineWidth {
    Width(f64),
    Stroke(Stroke),
}
impl LineWidth {
    /// Decode from a `width` or `stroke` list
    pub fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        match exp.tag() {
            Some("stroke") => Ok(Self::Stroke(Stroke::from_sexpr(exp)?)),
            _ => Ok(Self::Width(SexpList::expect(exp, "width")?.num(1)?)),
        }
    }
    /// Write with a leading space
    pub fn write_inline(&self, out: &mut String) -> KiResult<()> {
        match self {
            Self::Width(w) => write!(out, " (width {})", w)?,
            Self::Stroke(s) => {
                out.push(' ');
                s.write_sexpr(out, 0, false)?;
            }
        }
        Ok(())
    }
}

/// # Font
/// `(font [(face "F")] (size H W) [color] [(thickness T)] [bold] [italic] [(line_spacing L)])`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Font {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<String>,
    pub height: f64,
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorRGBA>,
}
impl Default for Font {
    fn default() -> Self {
        Self {
            face: None,
            height: 1.0,
            width: 1.0,
            thickness: None,
            bold: false,
            italic: false,
            line_spacing: None,
            color: None,
        }
    }
}
impl Font {
    /// Create a font of square size `size`
    pub fn sized(size: f64) -> Self {
        Self {
            height: size,
            width: size,
            ..Default::default()
        }
    }
}
impl FromSexpr for Font {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "font")?;
        let mut font = Self::default();
        for item in list.args() {
            match item.tag() {
                Some("face") => font.face = Some(item.text_at(1)?),
                Some("size") => {
                    font.height = item.num_at(1)?;
                    font.width = item.num_at(2)?;
                }
                Some("thickness") => font.thickness = Some(item.num_at(1)?),
                Some("line_spacing") => font.line_spacing = Some(item.num_at(1)?),
                Some("color") => font.color = Some(ColorRGBA::from_sexpr(item)?),
                Some(other) => list.skip(other),
                None if item.is_symbol("bold") => font.bold = true,
                None if item.is_symbol("italic") => font.italic = true,
                None => (),
            }
        }
        Ok(font)
    }
}
impl ToSexpr for Font {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(font ", Indent(indent))?;
        if let Some(face) = &self.face {
            write!(out, "(face {}) ", Quoted(face))?;
        }
        write!(out, "(size {} {})", self.height, self.width)?;
        if let Some(color) = &self.color {
            out.push(' ');
            color.write_sexpr(out, 0, false)?;
        }
        if let Some(t) = self.thickness {
            write!(out, " (thickness {})", t)?;
        }
        if self.bold {
            out.push_str(" bold");
        }
        if self.italic {
            out.push_str(" italic");
        }
        if let Some(l) = self.line_spacing {
            write!(out, " (line_spacing {})", l)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Text Justification
/// `(justify [left|right|center] [top|bottom] [mirror])`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Justify {
    /// `left`, `right` or `center`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontally: Option<String>,
    /// `top` or `bottom`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertically: Option<String>,
    #[serde(default)]
    pub mirror: bool,
}
impl Justify {
    /// Boolean indication of whether no justification is set.
    /// Empty justifications write nothing.
    pub fn is_empty(&self) -> bool {
        self.horizontally.is_none() && self.vertically.is_none() && !self.mirror
    }
}
impl FromSexpr for Justify {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "justify")?;
        let mut justify = Self::default();
        for item in list.args() {
            match item.as_symbol() {
                // `center` is the horizontal default, except in worksheets
                Some(h @ ("left" | "right" | "center")) => justify.horizontally = Some(h.into()),
                Some(v @ ("top" | "bottom")) => justify.vertically = Some(v.into()),
                Some("mirror") => justify.mirror = true,
                _ => (),
            }
        }
        Ok(justify)
    }
}
impl ToSexpr for Justify {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}", Indent(indent))?;
        if !self.is_empty() {
            out.push_str("(justify");
            if let Some(h) = &self.horizontally {
                write!(out, " {}", h)?;
            }
            if let Some(v) = &self.vertically {
                write!(out, " {}", v)?;
            }
            if self.mirror {
                out.push_str(" mirror");
            }
            out.push(')');
        }
        write!(out, "{}", Endline(newline))?;
        Ok(())
    }
}

/// # Text Effects
/// `(effects FONT [JUSTIFY] [(href "url")] [hide])`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Effects {
    pub font: Font,
    #[serde(default)]
    pub justify: Justify,
    #[serde(default)]
    pub hide: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}
impl Effects {
    /// Create effects with a square font of `size`, optionally hidden
    pub fn sized(size: f64, hide: bool) -> Self {
        Self {
            font: Font::sized(size),
            hide,
            ..Default::default()
        }
    }
}
impl FromSexpr for Effects {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "effects")?;
        let mut effects = Self::default();
        for item in list.args() {
            match item.tag() {
                Some("font") => effects.font = Font::from_sexpr(item)?,
                Some("justify") => effects.justify = Justify::from_sexpr(item)?,
                Some("href") => effects.href = Some(item.text_at(1)?),
                Some(other) => list.skip(other),
                None if item.is_symbol("hide") => effects.hide = true,
                None => (),
            }
        }
        Ok(effects)
    }
}
impl ToSexpr for Effects {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(effects ", Indent(indent))?;
        self.font.write_sexpr(out, 0, false)?;
        if !self.justify.is_empty() {
            out.push(' ');
            self.justify.write_sexpr(out, 0, false)?;
        }
        if let Some(href) = &self.href {
            write!(out, " (href {})", Quoted(href))?;
        }
        if self.hide {
            out.push_str(" hide");
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Net
/// `(net N "name")`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Net {
    pub number: i64,
    pub name: String,
}
impl Net {
    pub fn new(number: i64, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }
}
impl FromSexpr for Net {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "net")?;
        Ok(Self::new(list.int(1)?, list.text(2)?))
    }
}
impl ToSexpr for Net {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(net {} {}){}",
            Indent(indent),
            self.number,
            Quoted(&self.name),
            Endline(newline)
        )?;
        Ok(())
    }
}

/// # Group
/// Named collection of board or footprint items, referenced by their timestamps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub locked: bool,
    pub id: String,
    #[serde(default)]
    pub members: Vec<String>,
}
impl FromSexpr for Group {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "group")?;
        let mut group = Self {
            name: list.text(1)?,
            locked: list.has_flag("locked"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "id" => group.id = item.text_at(1)?,
                "members" => {
                    let members = SexpList::new(item)?;
                    for idx in 1..members.len() {
                        group.members.push(members.text(idx)?);
                    }
                }
                _ => list.skip(tag),
            }
        }
        Ok(group)
    }
}
impl ToSexpr for Group {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(group {}", ind, Quoted(&self.name))?;
        if self.locked {
            out.push_str(" locked");
        }
        writeln!(out, " (id {})", self.id)?;
        writeln!(out, "{}  (members", ind)?;
        for member in &self.members {
            writeln!(out, "{}    {}", ind, member)?;
        }
        writeln!(out, "{}  )", ind)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Page Settings
/// `(paper "A4"|"User" [W H] [portrait])`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PageSettings {
    /// Paper size name, e.g. `A4`, `USLetter` or `User`
    pub paper_size: String,
    /// Width, for `User` paper sizes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height, for `User` paper sizes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub portrait: bool,
}
impl Default for PageSettings {
    fn default() -> Self {
        Self {
            paper_size: "A4".into(),
            width: None,
            height: None,
            portrait: false,
        }
    }
}
impl FromSexpr for PageSettings {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "paper")?;
        let mut page = Self {
            paper_size: list.text(1)?,
            portrait: list.has_flag("portrait"),
            ..Default::default()
        };
        if page.paper_size == "User" {
            list.assert(list.len() >= 4, "expected width and height for paper size `User`")?;
            page.width = Some(list.num(2)?);
            page.height = Some(list.num(3)?);
        }
        Ok(page)
    }
}
impl ToSexpr for PageSettings {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(paper {}", Indent(indent), Quoted(&self.paper_size))?;
        if self.paper_size == "User" {
            match (self.width, self.height) {
                (Some(w), Some(h)) => write!(out, " {} {}", w, h)?,
                _ => {
                    return Err(crate::KiError::format(
                        "Paper size set to `User` but width or height not specified",
                    ))
                }
            }
        }
        if self.portrait {
            out.push_str(" portrait");
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Title Block Comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
    pub number: i64,
    pub text: String,
}

/// # Title Block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TitleBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Numbered comments, in file order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}
impl TitleBlock {
    /// Set comment number `number`, replacing any existing text in place
    pub fn set_comment(&mut self, number: i64, text: impl Into<String>) {
        let text = text.into();
        match self.comments.iter_mut().find(|c| c.number == number) {
            Some(c) => c.text = text,
            None => self.comments.push(Comment { number, text }),
        }
    }
}
impl FromSexpr for TitleBlock {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "title_block")?;
        let mut tb = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "title" => tb.title = Some(item.text_at(1)?),
                "date" => tb.date = Some(item.text_at(1)?),
                "rev" => tb.revision = Some(item.text_at(1)?),
                "company" => tb.company = Some(item.text_at(1)?),
                "comment" => tb.set_comment(item.int_at(1)?, item.text_at(2)?),
                _ => list.skip(tag),
            }
        }
        Ok(tb)
    }
}
impl ToSexpr for TitleBlock {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(title_block", ind)?;
        let fields = [
            ("title", &self.title),
            ("date", &self.date),
            ("rev", &self.revision),
            ("company", &self.company),
        ];
        for (tag, value) in fields {
            if let Some(value) = value {
                writeln!(out, "{}  ({} {})", ind, tag, Quoted(value))?;
            }
        }
        for c in &self.comments {
            writeln!(out, "{}  (comment {} {})", ind, c.number, Quoted(&c.text))?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Property
/// `(property "key" "value" [(id N)] (at X Y [A]) [(show_name)] [EFFECTS])`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Property {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Effects>,
    #[serde(default)]
    pub show_name: bool,
}
impl Default for Property {
    fn default() -> Self {
        Self {
            key: String::new(),
            value: String::new(),
            id: None,
            position: Position::with_angle(0.0, 0.0, 0.0),
            effects: None,
            show_name: false,
        }
    }
}
impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }
}
impl FromSexpr for Property {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "property")?;
        let mut prop = Self::new(list.text(1)?, list.text(2)?);
        for item in list.from(3) {
            match item.tag() {
                Some("id") => prop.id = Some(item.int_at(1)?),
                Some("at") => prop.position = Position::from_sexpr(item)?,
                Some("effects") => prop.effects = Some(Effects::from_sexpr(item)?),
                Some("show_name") => prop.show_name = true,
                Some(other) => list.skip(other),
                None => (),
            }
        }
        Ok(prop)
    }
}
impl ToSexpr for Property {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(property {} {}",
            ind,
            Quoted(&self.key),
            Quoted(&self.value)
        )?;
        if let Some(id) = self.id {
            write!(out, " (id {})", id)?;
        }
        write!(out, " {}", self.position.xya("at"))?;
        if self.show_name {
            out.push_str(" (show_name)");
        }
        match &self.effects {
            Some(effects) => {
                out.push('\n');
                effects.write_sexpr(out, indent + 2, true)?;
                write!(out, "{}){}", ind, Endline(newline))?;
            }
            None => write!(out, "){}", Endline(newline))?,
        }
        Ok(())
    }
}

/// # Render-Cache Polygon
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderCachePolygon {
    pub pts: Vec<Position>,
}
impl FromSexpr for RenderCachePolygon {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "polygon")?;
        let mut poly = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "pts" => poly.pts.extend(decode_pts(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(poly)
    }
}
impl ToSexpr for RenderCachePolygon {
    /// Points are written four to a line
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(polygon", ind)?;
        write!(out, "{}  (pts", ind)?;
        for (idx, pt) in self.pts.iter().enumerate() {
            if idx % 4 == 0 {
                write!(out, "\n{}    ", ind)?;
            } else {
                out.push(' ');
            }
            write!(out, "{}", pt.xy("xy"))?;
        }
        writeln!(out, "\n{}  )", ind)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Render Cache
///
/// Pre-rendered outline polygons of a text item,
/// as written by KiCad for texts using non-default fonts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderCache {
    pub text: String,
    /// Text rotation in degrees
    pub angle: f64,
    #[serde(default)]
    pub polygons: Vec<RenderCachePolygon>,
}
impl FromSexpr for RenderCache {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "render_cache")?;
        let mut cache = Self {
            text: list.text(1)?,
            angle: list.num(2)?,
            polygons: Vec::new(),
        };
        for (tag, item) in list.children() {
            match tag {
                "polygon" => cache.polygons.push(RenderCachePolygon::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(cache)
    }
}
impl ToSexpr for RenderCache {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(
            out,
            "{}(render_cache {} {}",
            ind,
            Quoted(&self.text),
            self.angle
        )?;
        for poly in &self.polygons {
            poly.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Fill
/// `(fill (type none|outline|background) [(color R G B A)])`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Fill {
    pub fill_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorRGBA>,
}
impl Default for Fill {
    fn default() -> Self {
        Self {
            fill_type: "none".into(),
            color: None,
        }
    }
}
impl FromSexpr for Fill {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "fill")?;
        let mut fill = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "type" => fill.fill_type = item.text_at(1)?,
                "color" => fill.color = Some(ColorRGBA::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(fill)
    }
}
impl ToSexpr for Fill {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(fill (type {})", Indent(indent), self.fill_type)?;
        if let Some(color) = &self.color {
            out.push(' ');
            color.write_sexpr(out, 0, false)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Embedded Image
/// Base64-encoded PNG, split over several atoms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Image {
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Base64 data chunks, one per line
    #[serde(default)]
    pub data: Vec<String>,
}
impl FromSexpr for Image {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "image")?;
        let mut image = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "at" => image.position = Position::from_sexpr(item)?,
                "scale" => image.scale = Some(item.num_at(1)?),
                "uuid" => image.uuid = Some(item.text_at(1)?),
                "layer" => image.layer = Some(item.text_at(1)?),
                "data" => {
                    let data = SexpList::new(item)?;
                    for idx in 1..data.len() {
                        image.data.push(data.text(idx)?);
                    }
                }
                _ => list.skip(tag),
            }
        }
        Ok(image)
    }
}
impl ToSexpr for Image {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(image {}", ind, self.position.xy("at"))?;
        if let Some(layer) = &self.layer {
            write!(out, " (layer {})", Quoted(layer))?;
        }
        if let Some(scale) = self.scale {
            write!(out, " (scale {})", scale)?;
        }
        out.push('\n');
        if let Some(uuid) = &self.uuid {
            writeln!(out, "{}  (uuid {})", ind, uuid)?;
        }
        writeln!(out, "{}  (data", ind)?;
        for chunk in &self.data {
            writeln!(out, "{}    {}", ind, chunk)?;
        }
        writeln!(out, "{}  )", ind)?;
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Project Instance
///
/// `(project "name" (path ...) ...)`, as used in the `instances` of
/// schematic symbols and hierarchical sheets (KiCad 7).
/// Generic over the kind of path it holds, which is fixed by the owning record:
/// [crate::SymbolProjectPath] for symbols, [crate::HierarchicalSheetProjectPath] for sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectInstance<P> {
    pub name: String,
    #[serde(default)]
    pub paths: Vec<P>,
}
impl<P: FromSexpr> FromSexpr for ProjectInstance<P> {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "project")?;
        let mut inst = Self {
            name: list.text(1)?,
            paths: Vec::new(),
        };
        for (tag, item) in list.children() {
            match tag {
                "path" => inst.paths.push(P::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(inst)
    }
}
impl<P: ToSexpr> ToSexpr for ProjectInstance<P> {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(out, "{}(project {}", ind, Quoted(&self.name))?;
        for path in &self.paths {
            path.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn rotates() {
        let center = Position::new(0.0, 0.0);
        let mut p = Position::new(10.0, 0.0);
        p.rotate_around_center(&center, -90.0);
        assert!(close(p.x, 0.0) && close(p.y, 10.0), "{:?}", p);

        let center = Position::new(1.0, 1.0);
        let mut p = Position::new(2.0, 1.0);
        p.rotate_around_center(&center, 90.0);
        assert!(close(p.x, 1.0) && close(p.y, 0.0), "{:?}", p);
    }

    #[test]
    fn positions() -> KiResult<()> {
        let p = Position::from_sexpr(&parse_str("(at 1.27 -2.54 90 unlocked)")?)?;
        assert_eq!(p.angle, Some(90.0));
        assert!(p.unlocked);
        assert_eq!(p.xya("at").to_string(), "(at 1.27 -2.54 90)");
        let p = Position::from_sexpr(&parse_str("(at 0 0 unlocked)")?)?;
        assert_eq!(p.angle, None);
        assert!(p.unlocked);
        assert!(Position::from_sexpr(&parse_str("(at 0)")?).is_err());
        Ok(())
    }

    #[test]
    fn effects() -> KiResult<()> {
        let src = r#"(effects (font (face "Arial") (size 1.27 1.5) (thickness 0.254) bold italic) (justify left bottom mirror) (href "https://kicad.org") hide)"#;
        let effects = Effects::from_sexpr(&parse_str(src)?)?;
        assert_eq!(effects.font.height, 1.27);
        assert_eq!(effects.font.width, 1.5);
        assert!(effects.font.bold && effects.font.italic && effects.hide);
        assert_eq!(effects.justify.horizontally.as_deref(), Some("left"));
        assert_eq!(effects.to_sexpr(0, false)?, src);

        let plain = Effects::sized(1.27, false);
        assert_eq!(plain.to_sexpr(2, true)?, "  (effects (font (size 1.27 1.27)))\n");
        Ok(())
    }

    #[test]
    fn strokes_and_colors() -> KiResult<()> {
        let src = "(stroke (width 0.1524) (type dash) (color 255 0 0 0.5))";
        let stroke = Stroke::from_sexpr(&parse_str(src)?)?;
        assert_eq!(stroke.to_sexpr(0, false)?, src);
        let mut color = ColorRGBA::new(0, 0, 0, 0.0);
        assert_eq!(color.to_sexpr(0, false)?, "(color 0 0 0 0)");
        color.precision = Some(4);
        assert_eq!(color.to_sexpr(0, false)?, "(color 0 0 0 0.0000)");
        assert!(ColorRGBA::from_sexpr(&parse_str("(color 1 2 3)")?).is_err());
        Ok(())
    }

    #[test]
    fn property_escapes() -> KiResult<()> {
        let mut prop = Property::new("Value", r#"10k "precise""#);
        prop.id = Some(1);
        let text = prop.to_sexpr(0, false)?;
        assert_eq!(
            text,
            r#"(property "Value" "10k \"precise\"" (id 1) (at 0 0 0))"#
        );
        let back = Property::from_sexpr(&parse_str(&text)?)?;
        assert_eq!(back, prop);
        Ok(())
    }

    #[test]
    fn paper() -> KiResult<()> {
        let page = PageSettings::from_sexpr(&parse_str(r#"(paper "User" 100 80.5 portrait)"#)?)?;
        assert_eq!(page.width, Some(100.0));
        assert_eq!(page.to_sexpr(2, true)?, "  (paper \"User\" 100 80.5 portrait)\n");
        assert!(PageSettings::from_sexpr(&parse_str(r#"(paper "User" 100)"#)?).is_err());
        let bad = PageSettings {
            paper_size: "User".into(),
            ..Default::default()
        };
        assert!(bad.to_sexpr(0, false).is_err());
        Ok(())
    }

    #[test]
    fn title_block_keeps_comment_order() -> KiResult<()> {
        let src = "(title_block\n  (title \"T\")\n  (comment 4 \"four\")\n  (comment 1 \"one\")\n)";
        let tb = TitleBlock::from_sexpr(&parse_str(src)?)?;
        assert_eq!(tb.comments[0].number, 4);
        assert_eq!(tb.to_sexpr(0, false)?, src);
        Ok(())
    }

    #[test]
    fn render_cache_layout() -> KiResult<()> {
        let mut poly = RenderCachePolygon::default();
        for i in 0..5 {
            poly.pts.push(Position::new(i as f64, 0.0));
        }
        let cache = RenderCache {
            text: "ab".into(),
            angle: 0.0,
            polygons: vec![poly],
        };
        let expected = concat!(
            "(render_cache \"ab\" 0\n",
            "  (polygon\n",
            "    (pts\n",
            "      (xy 0 0) (xy 1 0) (xy 2 0) (xy 3 0)\n",
            "      (xy 4 0)\n",
            "    )\n",
            "  )\n",
            ")",
        );
        assert_eq!(cache.to_sexpr(0, false)?, expected);
        let back = RenderCache::from_sexpr(&parse_str(expected)?)?;
        assert_eq!(back, cache);
        Ok(())
    }
}
