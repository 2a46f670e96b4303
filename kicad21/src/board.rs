//!
//! # Board Documents
//!
//! The `kicad_pcb` root of `.kicad_pcb` files.
//!

// Std-Lib
use std::fmt::Write;
use std::path::PathBuf;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::document::kicad_file;
use crate::footprint::{Footprint, FpItem};
use crate::items::brditems::*;
use crate::items::common::{Group, Net, PageSettings, TitleBlock};
use crate::items::dimensions::Dimension;
use crate::items::fpitems::FpTextType;
use crate::items::gritems::*;
use crate::items::zones::Zone;
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::write::{Endline, Indent, Quoted};
use crate::{KiError, KiResult};

/// # Board Graphical Item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum GraphicalItem {
    Text(GrText),
    Line(GrLine),
    Rect(GrRect),
    Circle(GrCircle),
    Arc(GrArc),
    Poly(GrPoly),
    Curve(GrCurve),
}
impl GraphicalItem {
    /// Decode from any of the `gr_*` lists. Returns `None` for other tags.
    /// Text boxes are not modeled, and fail with [KiError::Unsupported].
    pub fn decode(exp: &Sexp) -> KiResult<Option<Self>> {
        let item = match exp.tag() {
            Some("gr_text") => Self::Text(GrText::from_sexpr(exp)?),
            Some("gr_text_box") => {
                return Err(KiError::Unsupported("Board text boxes (`gr_text_box`)".into()))
            }
            Some("gr_line") => Self::Line(GrLine::from_sexpr(exp)?),
            Some("gr_rect") => Self::Rect(GrRect::from_sexpr(exp)?),
            Some("gr_circle") => Self::Circle(GrCircle::from_sexpr(exp)?),
            Some("gr_arc") => Self::Arc(GrArc::from_sexpr(exp)?),
            Some("gr_poly") => Self::Poly(GrPoly::from_sexpr(exp)?),
            Some("gr_curve") => Self::Curve(GrCurve::from_sexpr(exp)?),
            _ => return Ok(None),
        };
        Ok(Some(item))
    }
}
impl ToSexpr for GraphicalItem {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        match self {
            Self::Text(i) => i.write_sexpr(out, indent, newline),
            Self::Line(i) => i.write_sexpr(out, indent, newline),
            Self::Rect(i) => i.write_sexpr(out, indent, newline),
            Self::Circle(i) => i.write_sexpr(out, indent, newline),
            Self::Arc(i) => i.write_sexpr(out, indent, newline),
            Self::Poly(i) => i.write_sexpr(out, indent, newline),
            Self::Curve(i) => i.write_sexpr(out, indent, newline),
        }
    }
}

/// # Board Routing Item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum TraceItem {
    Segment(Segment),
    Via(Via),
    Arc(Arc),
}
impl ToSexpr for TraceItem {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        match self {
            Self::Segment(i) => i.write_sexpr(out, indent, newline),
            Self::Via(i) => i.write_sexpr(out, indent, newline),
            Self::Arc(i) => i.write_sexpr(out, indent, newline),
        }
    }
}

///
/// # Board
///
/// Sections are written in a fixed order, each group separated by a blank line:
/// header, general settings, paper and title block, layers, setup,
/// properties, nets, footprints, graphics (including dimensions and targets),
/// routing, zones and groups.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Board {
    pub version: String,
    pub generator: String,
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub paper: PageSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_block: Option<TitleBlock>,
    #[serde(default)]
    pub layers: Vec<LayerToken>,
    #[serde(default)]
    pub setup: SetupData,
    /// Text variables, in file order
    #[serde(default)]
    pub properties: Vec<(String, String)>,
    #[serde(default)]
    pub nets: Vec<Net>,
    #[serde(default)]
    pub footprints: Vec<Footprint>,
    #[serde(default)]
    pub graphical_items: Vec<GraphicalItem>,
    #[serde(default)]
    pub trace_items: Vec<TraceItem>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}
kicad_file!(Board);

impl Board {
    /// Create an empty two-layer board
    pub fn create_new() -> Self {
        let layers = [
            (0, "F.Cu", "signal", None),
            (31, "B.Cu", "signal", None),
            (32, "B.Adhes", "user", Some("B.Adhesive")),
            (33, "F.Adhes", "user", Some("F.Adhesive")),
            (34, "B.Paste", "user", None),
            (35, "F.Paste", "user", None),
            (36, "B.SilkS", "user", Some("B.Silkscreen")),
            (37, "F.SilkS", "user", Some("F.Silkscreen")),
            (38, "B.Mask", "user", None),
            (39, "F.Mask", "user", None),
            (40, "Dwgs.User", "user", Some("User.Drawings")),
            (41, "Cmts.User", "user", Some("User.Comments")),
            (42, "Eco1.User", "user", Some("User.Eco1")),
            (43, "Eco2.User", "user", Some("User.Eco2")),
            (44, "Edge.Cuts", "user", None),
            (45, "Margin", "user", None),
            (46, "B.CrtYd", "user", Some("B.Courtyard")),
            (47, "F.CrtYd", "user", Some("F.Courtyard")),
            (48, "B.Fab", "user", None),
            (49, "F.Fab", "user", None),
        ];
        Self {
            version: "20211014".into(),
            generator: "kicad21".into(),
            layers: layers
                .iter()
                .map(|(ord, name, ty, user)| LayerToken::new(*ord, name, ty, *user))
                .collect(),
            nets: vec![Net::new(0, "")],
            ..Default::default()
        }
    }
    /// Get the value of text variable `key`
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
    /// Find a footprint by its reference designator
    pub fn footprint(&self, reference: &str) -> Option<&Footprint> {
        self.footprints.iter().find(|fp| {
            fp.graphic_items.iter().any(|item| match item {
                FpItem::Text(t) => {
                    t.text_type == FpTextType::Reference && t.text == reference
                }
                _ => false,
            })
        })
    }
}
impl FromSexpr for Board {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "kicad_pcb")?;
        let mut board = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "version" => board.version = item.text_at(1)?,
                "generator" => board.generator = item.text_at(1)?,
                "general" => board.general = GeneralSettings::from_sexpr(item)?,
                "paper" => board.paper = PageSettings::from_sexpr(item)?,
                "title_block" => board.title_block = Some(TitleBlock::from_sexpr(item)?),
                "layers" => {
                    let layers = SexpList::new(item)?;
                    for layer in layers.args() {
                        board.layers.push(LayerToken::from_sexpr(layer)?);
                    }
                }
                "setup" => board.setup = SetupData::from_sexpr(item)?,
                "property" => board
                    .properties
                    .push((item.text_at(1)?, item.text_at(2)?)),
                "net" => board.nets.push(Net::from_sexpr(item)?),
                "footprint" | "module" => board.footprints.push(Footprint::from_sexpr(item)?),
                "dimension" => board.dimensions.push(Dimension::from_sexpr(item)?),
                "target" => board.targets.push(Target::from_sexpr(item)?),
                "segment" => board
                    .trace_items
                    .push(TraceItem::Segment(Segment::from_sexpr(item)?)),
                "via" => board.trace_items.push(TraceItem::Via(Via::from_sexpr(item)?)),
                "arc" => board.trace_items.push(TraceItem::Arc(Arc::from_sexpr(item)?)),
                "zone" => board.zones.push(Zone::from_sexpr(item)?),
                "group" => board.groups.push(Group::from_sexpr(item)?),
                _ => match GraphicalItem::decode(item)? {
                    Some(gi) => board.graphical_items.push(gi),
                    None => list.skip(tag),
                },
            }
        }
        Ok(board)
    }
}
impl ToSexpr for Board {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(kicad_pcb (version {}) (generator {})\n\n",
            ind, self.version, self.generator
        )?;
        self.general.write_sexpr(out, indent + 2, true)?;
        out.push('\n');
        self.paper.write_sexpr(out, indent + 2, true)?;
        if let Some(tb) = &self.title_block {
            tb.write_sexpr(out, indent + 2, true)?;
            out.push('\n');
        }
        writeln!(out, "{}  (layers", ind)?;
        for layer in &self.layers {
            layer.write_sexpr(out, indent + 4, true)?;
        }
        write!(out, "{}  )\n\n", ind)?;
        self.setup.write_sexpr(out, indent + 2, true)?;
        out.push('\n');

        if !self.properties.is_empty() {
            for (k, v) in &self.properties {
                writeln!(out, "{}  (property {} {})", ind, Quoted(k), Quoted(v))?;
            }
            out.push('\n');
        }
        if !self.nets.is_empty() {
            for net in &self.nets {
                net.write_sexpr(out, indent + 2, true)?;
            }
            out.push('\n');
        }
        for fp in &self.footprints {
            fp.write_footprint(out, indent + 2, true, true)?;
            out.push('\n');
        }

        // Graphics, dimensions and targets share one block
        for item in &self.graphical_items {
            item.write_sexpr(out, indent + 2, true)?;
        }
        for dim in &self.dimensions {
            dim.write_sexpr(out, indent + 2, true)?;
        }
        for target in &self.targets {
            target.write_sexpr(out, indent + 2, true)?;
        }
        if !self.graphical_items.is_empty() || !self.dimensions.is_empty() || !self.targets.is_empty()
        {
            out.push('\n');
        }

        if !self.trace_items.is_empty() {
            for item in &self.trace_items {
                item.write_sexpr(out, indent + 2, true)?;
            }
            out.push('\n');
        }
        for zone in &self.zones {
            zone.write_sexpr(out, indent + 2, true)?;
        }
        for group in &self.groups {
            group.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::parse_str;
    use crate::KicadFile;

    #[test]
    fn text_boxes_are_unsupported() -> KiResult<()> {
        let exp = parse_str(r#"(gr_text_box "x" (start 0 0) (end 1 1) (layer "F.SilkS"))"#)?;
        assert!(matches!(
            GraphicalItem::decode(&exp),
            Err(KiError::Unsupported(_))
        ));
        let src = concat!(
            "(kicad_pcb (version 20211014) (generator pcbnew)\n",
            "  (gr_text_box \"x\" (start 0 0) (end 1 1) (layer \"F.SilkS\"))\n",
            ")\n"
        );
        assert!(matches!(Board::from_str(src), Err(KiError::Unsupported(_))));
        // Lists which are not graphics are left to the caller
        assert!(GraphicalItem::decode(&parse_str("(segment (width 1))")?)?.is_none());
        Ok(())
    }
}
