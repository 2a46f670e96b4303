//!
//! # Worksheets
//!
//! The `kicad_wks` root of `.kicad_wks` drawing-sheet files:
//! title-block lines, rectangles, polygons, bitmaps and texts,
//! each placed relative to one of the page corners and optionally repeated.
//!

// Std-Lib
use std::fmt::Write;
use std::path::PathBuf;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::document::kicad_file;
use crate::items::common::{decode_pts, Justify, Position};
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::{enumstr, ErrorHelper};
use crate::write::{Endline, Indent, Quoted};
use crate::KiResult;

enumstr!(
    /// # Page Corners
    /// Anchors for worksheet positions
    Corner {
        LeftTop: "ltcorner",
        LeftBottom: "lbcorner",
        RightBottom: "rbcorner",
        RightTop: "rtcorner",
    }
);

/// # Worksheet Position
/// `(tag X Y [corner])`. Positions without a corner are anchored at the right-bottom corner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WksPosition {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner: Option<Corner>,
}
impl WksPosition {
    pub fn new(x: f64, y: f64, corner: Option<Corner>) -> Self {
        Self { x, y, corner }
    }
    fn write(&self, out: &mut String, tag: &str) -> KiResult<()> {
        write!(out, "({} {} {}", tag, self.x, self.y)?;
        if let Some(c) = &self.corner {
            write!(out, " {}", c)?;
        }
        out.push(')');
        Ok(())
    }
}
impl FromSexpr for WksPosition {
    /// The tag is not checked
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::new(exp)?;
        list.assert(list.len() >= 3, "expected X and Y values")?;
        let corner = match list.len() {
            3 => None,
            _ => Some(list.keyword(3)?),
        };
        Ok(Self::new(list.num(1)?, list.num(2)?, corner))
    }
}

///
/// # Shared Worksheet-Item Settings
///
/// Naming, page selection, repetition and comments,
/// common to every drawing object.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WksCommon {
    #[serde(default)]
    pub name: String,
    /// `page1only` or `notonpage1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incrx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incry: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
impl WksCommon {
    /// Apply child list `item`, returning whether its tag was one of ours
    fn apply(&mut self, tag: &str, item: &Sexp) -> KiResult<bool> {
        match tag {
            "name" => self.name = item.text_at(1)?,
            "option" => self.option = Some(item.text_at(1)?),
            "repeat" => self.repeat = Some(item.int_at(1)?),
            "incrx" => self.incrx = Some(item.num_at(1)?),
            "incry" => self.incry = Some(item.num_at(1)?),
            "comment" => self.comment = Some(item.text_at(1)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
    fn write_name(&self, out: &mut String) -> KiResult<()> {
        write!(out, " (name {})", Quoted(&self.name))?;
        if let Some(o) = &self.option {
            write!(out, " (option {})", o)?;
        }
        Ok(())
    }
    fn write_repeat(&self, out: &mut String) -> KiResult<()> {
        if let Some(r) = self.repeat {
            write!(out, " (repeat {})", r)?;
        }
        if let Some(x) = self.incrx {
            write!(out, " (incrx {})", x)?;
        }
        if let Some(y) = self.incry {
            write!(out, " (incry {})", y)?;
        }
        Ok(())
    }
    fn write_comment(&self, out: &mut String) -> KiResult<()> {
        if let Some(c) = &self.comment {
            write!(out, " (comment {})", Quoted(c))?;
        }
        Ok(())
    }
}

/// # Line or Rectangle
/// Both share the `(start) (end)` form, distinguished by their tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WksSegment {
    #[serde(flatten)]
    pub common: WksCommon,
    pub start: WksPosition,
    pub end: WksPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<f64>,
}
impl WksSegment {
    fn decode(list: &SexpList) -> KiResult<Self> {
        let mut seg = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "start" => seg.start = WksPosition::from_sexpr(item)?,
                "end" => seg.end = WksPosition::from_sexpr(item)?,
                "linewidth" => seg.linewidth = Some(item.num_at(1)?),
                _ => {
                    if !seg.common.apply(tag, item)? {
                        list.skip(tag);
                    }
                }
            }
        }
        Ok(seg)
    }
    fn write(&self, out: &mut String, tag: &str, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}({}", ind, tag)?;
        self.common.write_name(out)?;
        out.push(' ');
        self.start.write(out, "start")?;
        out.push(' ');
        self.end.write(out, "end")?;
        if let Some(w) = self.linewidth {
            write!(out, " (linewidth {})", w)?;
        }
        self.common.write_repeat(out)?;
        self.common.write_comment(out)?;
        write!(out, "\n{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Polygon
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WksPolygon {
    #[serde(flatten)]
    pub common: WksCommon,
    pub position: WksPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<f64>,
    /// Corner points, relative to `position`
    #[serde(default)]
    pub points: Vec<Position>,
}
impl FromSexpr for WksPolygon {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "polygon")?;
        let mut poly = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "pos" => poly.position = WksPosition::from_sexpr(item)?,
                "rotate" => poly.rotate = Some(item.num_at(1)?),
                "linewidth" => poly.linewidth = Some(item.num_at(1)?),
                "pts" => poly.points = decode_pts(item)?,
                _ => {
                    if !poly.common.apply(tag, item)? {
                        list.skip(tag);
                    }
                }
            }
        }
        Ok(poly)
    }
}
impl ToSexpr for WksPolygon {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(polygon", ind)?;
        self.common.write_name(out)?;
        out.push(' ');
        self.position.write(out, "pos")?;
        if let Some(r) = self.rotate {
            write!(out, " (rotate {})", r)?;
        }
        if let Some(w) = self.linewidth {
            write!(out, " (linewidth {})", w)?;
        }
        self.common.write_repeat(out)?;
        self.common.write_comment(out)?;
        write!(out, "\n{}  (pts", ind)?;
        for pt in &self.points {
            write!(out, " {}", pt.xy("xy"))?;
        }
        write!(out, ")\n{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Bitmap
/// Embedded PNG image, stored as hex-byte data lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WksBitmap {
    #[serde(flatten)]
    pub common: WksCommon,
    pub position: WksPosition,
    pub scale: f64,
    #[serde(default)]
    pub pngdata: Vec<String>,
}
impl Default for WksBitmap {
    fn default() -> Self {
        Self {
            common: WksCommon::default(),
            position: WksPosition::default(),
            scale: 1.0,
            pngdata: Vec::new(),
        }
    }
}
impl FromSexpr for WksBitmap {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "bitmap")?;
        let mut bitmap = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "pos" => bitmap.position = WksPosition::from_sexpr(item)?,
                "scale" => bitmap.scale = item.num_at(1)?,
                "pngdata" => {
                    let data = SexpList::new(item)?;
                    for (dtag, line) in data.children() {
                        match dtag {
                            "data" => bitmap.pngdata.push(line.text_at(1)?),
                            _ => data.skip(dtag),
                        }
                    }
                }
                _ => {
                    if !bitmap.common.apply(tag, item)? {
                        list.skip(tag);
                    }
                }
            }
        }
        Ok(bitmap)
    }
}
impl ToSexpr for WksBitmap {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(bitmap", ind)?;
        self.common.write_name(out)?;
        out.push(' ');
        self.position.write(out, "pos")?;
        write!(out, " (scale {})", self.scale)?;
        self.common.write_repeat(out)?;
        self.common.write_comment(out)?;
        writeln!(out, "\n{}  (pngdata", ind)?;
        for line in &self.pngdata {
            writeln!(out, "{}    (data {})", ind, Quoted(line))?;
        }
        write!(out, "{}  )\n{}){}", ind, ind, Endline(newline))?;
        Ok(())
    }
}

/// # Worksheet Font
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WksFont {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<f64>,
    /// Width and height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<(f64, f64)>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}
impl FromSexpr for WksFont {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "font")?;
        let mut font = Self {
            bold: list.has_flag("bold"),
            italic: list.has_flag("italic"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "linewidth" => font.linewidth = Some(item.num_at(1)?),
                "size" => font.size = Some((item.num_at(1)?, item.num_at(2)?)),
                _ => list.skip(tag),
            }
        }
        Ok(font)
    }
}
impl ToSexpr for WksFont {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(out, "{}(font", Indent(indent))?;
        if let Some(w) = self.linewidth {
            write!(out, " (linewidth {})", w)?;
        }
        if let Some((w, h)) = self.size {
            write!(out, " (size {} {})", w, h)?;
        }
        if self.bold {
            out.push_str(" bold");
        }
        if self.italic {
            out.push_str(" italic");
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

/// # Title-Block Text
/// Text may hold `${VARIABLE}` references, expanded by KiCad when drawn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TbText {
    pub text: String,
    #[serde(flatten)]
    pub common: WksCommon,
    pub position: WksPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<WksFont>,
    #[serde(default)]
    pub justify: Justify,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxlen: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxheight: Option<f64>,
    /// Increment of trailing numbers or letters, for repeated texts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incrlabel: Option<i64>,
}
impl FromSexpr for TbText {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "tbtext")?;
        let mut text = Self {
            text: list.text(1)?,
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "pos" => text.position = WksPosition::from_sexpr(item)?,
                "rotate" => text.rotate = Some(item.num_at(1)?),
                "font" => text.font = Some(WksFont::from_sexpr(item)?),
                "justify" => text.justify = Justify::from_sexpr(item)?,
                "maxlen" => text.maxlen = Some(item.num_at(1)?),
                "maxheight" => text.maxheight = Some(item.num_at(1)?),
                "incrlabel" => text.incrlabel = Some(item.int_at(1)?),
                _ => {
                    if !text.common.apply(tag, item)? {
                        list.skip(tag);
                    }
                }
            }
        }
        Ok(text)
    }
}
impl ToSexpr for TbText {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(tbtext {}", ind, Quoted(&self.text))?;
        self.common.write_name(out)?;
        out.push(' ');
        self.position.write(out, "pos")?;
        if let Some(r) = self.rotate {
            write!(out, " (rotate {})", r)?;
        }
        if let Some(font) = &self.font {
            out.push(' ');
            font.write_sexpr(out, 0, false)?;
        }
        if !self.justify.is_empty() {
            out.push(' ');
            self.justify.write_sexpr(out, 0, false)?;
        }
        if let Some(m) = self.maxlen {
            write!(out, " (maxlen {})", m)?;
        }
        if let Some(m) = self.maxheight {
            write!(out, " (maxheight {})", m)?;
        }
        self.common.write_repeat(out)?;
        if let Some(i) = self.incrlabel {
            write!(out, " (incrlabel {})", i)?;
        }
        self.common.write_comment(out)?;
        write!(out, "\n{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

/// # Worksheet Drawing Object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum WksItem {
    Line(WksSegment),
    Rect(WksSegment),
    Polygon(WksPolygon),
    Bitmap(WksBitmap),
    TbText(TbText),
}
impl WksItem {
    /// Decode from any drawing-object list. Returns `None` for other tags.
    pub fn decode(exp: &Sexp) -> KiResult<Option<Self>> {
        let item = match exp.tag() {
            Some("line") => Self::Line(WksSegment::decode(&SexpList::new(exp)?)?),
            Some("rect") => Self::Rect(WksSegment::decode(&SexpList::new(exp)?)?),
            Some("polygon") => Self::Polygon(WksPolygon::from_sexpr(exp)?),
            Some("bitmap") => Self::Bitmap(WksBitmap::from_sexpr(exp)?),
            Some("tbtext") => Self::TbText(TbText::from_sexpr(exp)?),
            _ => return Ok(None),
        };
        Ok(Some(item))
    }
}
impl ToSexpr for WksItem {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        match self {
            Self::Line(i) => i.write(out, "line", indent, newline),
            Self::Rect(i) => i.write(out, "rect", indent, newline),
            Self::Polygon(i) => i.write_sexpr(out, indent, newline),
            Self::Bitmap(i) => i.write_sexpr(out, indent, newline),
            Self::TbText(i) => i.write_sexpr(out, indent, newline),
        }
    }
}

/// # Worksheet Setup
/// Default text and line sizes, and page margins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WksSetup {
    /// Width and height
    pub textsize: (f64, f64),
    pub linewidth: f64,
    pub textlinewidth: f64,
    pub left_margin: f64,
    pub right_margin: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
}
impl Default for WksSetup {
    fn default() -> Self {
        Self {
            textsize: (1.5, 1.5),
            linewidth: 0.15,
            textlinewidth: 0.15,
            left_margin: 10.0,
            right_margin: 10.0,
            top_margin: 10.0,
            bottom_margin: 10.0,
        }
    }
}
impl FromSexpr for WksSetup {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "setup")?;
        let mut setup = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "textsize" => setup.textsize = (item.num_at(1)?, item.num_at(2)?),
                "linewidth" => setup.linewidth = item.num_at(1)?,
                "textlinewidth" => setup.textlinewidth = item.num_at(1)?,
                "left_margin" => setup.left_margin = item.num_at(1)?,
                "right_margin" => setup.right_margin = item.num_at(1)?,
                "top_margin" => setup.top_margin = item.num_at(1)?,
                "bottom_margin" => setup.bottom_margin = item.num_at(1)?,
                _ => list.skip(tag),
            }
        }
        Ok(setup)
    }
}
impl ToSexpr for WksSetup {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(
            out,
            "{}(setup (textsize {} {}) (linewidth {}) (textlinewidth {})",
            ind, self.textsize.0, self.textsize.1, self.linewidth, self.textlinewidth
        )?;
        write!(
            out,
            "{}  (left_margin {}) (right_margin {}) (top_margin {}) (bottom_margin {})){}",
            ind,
            self.left_margin,
            self.right_margin,
            self.top_margin,
            self.bottom_margin,
            Endline(newline)
        )?;
        Ok(())
    }
}

/// # Worksheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkSheet {
    pub version: String,
    pub generator: String,
    #[serde(default)]
    pub setup: WksSetup,
    /// Drawing objects, in file order
    #[serde(default)]
    pub items: Vec<WksItem>,
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}
kicad_file!(WorkSheet);

impl WorkSheet {
    /// Create an empty worksheet with default setup
    pub fn create_new() -> Self {
        Self {
            version: "20210606".into(),
            generator: "kicad21".into(),
            ..Default::default()
        }
    }
}
impl FromSexpr for WorkSheet {
    /// Decode from a `kicad_wks` list, or a KiCad 5 `page_layout`.
    /// Page layouts carry no header, and take that of [WorkSheet::create_new].
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect_any(exp, &["kicad_wks", "page_layout"])?;
        let mut wks = match list.tag {
            "page_layout" => Self::create_new(),
            _ => Self::default(),
        };
        for (tag, item) in list.children() {
            match tag {
                "version" => wks.version = item.text_at(1)?,
                "generator" => wks.generator = item.text_at(1)?,
                "setup" => wks.setup = WksSetup::from_sexpr(item)?,
                _ => match WksItem::decode(item)? {
                    Some(i) => wks.items.push(i),
                    None => list.skip(tag),
                },
            }
        }
        Ok(wks)
    }
}
impl ToSexpr for WorkSheet {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(
            out,
            "{}(kicad_wks (version {}) (generator {})",
            ind, self.version, self.generator
        )?;
        self.setup.write_sexpr(out, indent + 2, true)?;
        for item in &self.items {
            item.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;
    use crate::{KiError, KicadFile};

    #[test]
    fn positions() -> KiResult<()> {
        let pos = WksPosition::from_sexpr(&parse_str("(start 110 34 ltcorner)")?)?;
        assert_eq!(pos.corner, Some(Corner::LeftTop));
        let pos = WksPosition::from_sexpr(&parse_str("(end 2 2)")?)?;
        assert_eq!(pos.corner, None);
        assert!(WksPosition::from_sexpr(&parse_str("(pos 1 1 middle)")?).is_err());
        Ok(())
    }

    #[test]
    fn texts() -> KiResult<()> {
        let src = concat!(
            "  (tbtext \"Sheet: ${SHEETNAME}\" (name \"\") (option page1only) (pos 109 6.9) ",
            "(font (size 2 2) bold) (justify left) (maxlen 80) (repeat 3) (incry 2) (incrlabel 1) ",
            "(comment \"Sheet name\")\n",
            "  )\n"
        );
        let text = TbText::from_sexpr(&parse_str(src)?)?;
        assert_eq!(text.common.option.as_deref(), Some("page1only"));
        assert_eq!(text.font.as_ref().map(|f| f.bold), Some(true));
        assert_eq!(text.to_sexpr(2, true)?, src);
        Ok(())
    }

    #[test]
    fn worksheet() -> KiResult<()> {
        let src = concat!(
            "(kicad_wks (version 20210606) (generator pl_editor)\n",
            "  (setup (textsize 1.5 1.5) (linewidth 0.15) (textlinewidth 0.15)\n",
            "    (left_margin 10) (right_margin 10) (top_margin 10) (bottom_margin 10))\n",
            "  (rect (name \"\") (start 110 34) (end 2 2) (comment \"rect around the title block\")\n",
            "  )\n",
            "  (line (name \"\") (start 50 2 ltcorner) (end 50 0 ltcorner) (repeat 30) (incrx 50)\n",
            "  )\n",
            "  (polygon (name \"logo\") (pos 20 10) (rotate 0)\n",
            "    (pts (xy 0 0) (xy 1 0) (xy 1 1))\n",
            "  )\n",
            "  (bitmap (name \"\") (pos 40 20 lbcorner) (scale 0.5)\n",
            "    (pngdata\n",
            "      (data \"89 50 4E 47 0D 0A 1A 0A\")\n",
            "    )\n",
            "  )\n",
            ")\n"
        );
        let wks = WorkSheet::from_str(src)?;
        assert_eq!(wks.items.len(), 4);
        assert!(matches!(wks.items[1], WksItem::Line(_)));
        assert_eq!(wks.to_string()?, src);

        let empty = WorkSheet::create_new();
        assert_eq!(WorkSheet::from_str(&empty.to_string()?)?, empty);
        Ok(())
    }

    #[test]
    fn page_layouts() -> KiResult<()> {
        let src = concat!(
            "(page_layout\n",
            "  (line (name \"\") (start 50 2 ltcorner) (end 50 0 ltcorner) (repeat 30) (incrx 50)\n",
            "  )\n",
            ")\n"
        );
        let wks = WorkSheet::from_str(src)?;
        assert_eq!(wks.version, "20210606");
        assert_eq!(wks.items.len(), 1);
        // Written back in the current form
        let text = wks.to_string()?;
        assert!(text.starts_with("(kicad_wks (version 20210606) (generator kicad21)\n"));
        assert_eq!(WorkSheet::from_str(&text)?, wks);
        assert!(matches!(
            WorkSheet::from_str("(drawing_sheet (version 1))"),
            Err(KiError::Tag { .. })
        ));
        Ok(())
    }
}
