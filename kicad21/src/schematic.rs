//!
//! # Schematic Documents
//!
//! The `kicad_sch` root of `.kicad_sch` files.
//!

// Std-Lib
use std::fmt::Write;
use std::path::PathBuf;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::document::kicad_file;
use crate::items::common::{Image, PageSettings, TitleBlock};
use crate::items::schitems::*;
use crate::sexpr::{decode_all, FromSexpr, Sexp, SexpList, ToSexpr};
use crate::symbol::SchematicLibSymbol;
use crate::write::{Endline, Indent};
use crate::KiResult;

///
/// # Schematic
///
/// Items are grouped by kind, and each group is written as one block.
/// Placed symbols and sheets are each set apart by a blank line.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Schematic {
    pub version: String,
    pub generator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub paper: PageSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_block: Option<TitleBlock>,
    /// Cached copies of every library symbol placed in the schematic
    #[serde(default)]
    pub lib_symbols: Vec<SchematicLibSymbol>,
    #[serde(default)]
    pub junctions: Vec<Junction>,
    #[serde(default)]
    pub no_connects: Vec<NoConnect>,
    #[serde(default)]
    pub bus_entries: Vec<BusEntry>,
    #[serde(default)]
    pub bus_aliases: Vec<BusAlias>,
    /// Wires, buses and poly-lines
    #[serde(default)]
    pub graphical_items: Vec<WiringItem>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub text_boxes: Vec<TextBox>,
    #[serde(default)]
    pub texts: Vec<Text>,
    #[serde(default)]
    pub labels: Vec<LocalLabel>,
    #[serde(default)]
    pub global_labels: Vec<GlobalLabel>,
    #[serde(default)]
    pub hierarchical_labels: Vec<HierarchicalLabel>,
    #[serde(default)]
    pub netclass_flags: Vec<NetclassFlag>,
    #[serde(default)]
    pub schematic_symbols: Vec<SchematicSymbol>,
    #[serde(default)]
    pub sheets: Vec<HierarchicalSheet>,
    #[serde(default)]
    pub sheet_instances: Vec<HierarchicalSheetInstance>,
    #[serde(default)]
    pub symbol_instances: Vec<SymbolInstance>,
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}
kicad_file!(Schematic);

impl Schematic {
    /// Create an empty schematic, holding only its root sheet instance
    pub fn create_new() -> Self {
        Self {
            version: "20211014".into(),
            generator: "kicad21".into(),
            sheet_instances: vec![HierarchicalSheetInstance::default()],
            ..Default::default()
        }
    }
    /// Find the cached library symbol with identifier `lib_id`
    pub fn lib_symbol(&self, lib_id: &str) -> Option<&SchematicLibSymbol> {
        self.lib_symbols.iter().find(|s| s.lib_id() == lib_id)
    }
    /// Find a placed symbol by its `Reference` property
    pub fn symbol(&self, reference: &str) -> Option<&SchematicSymbol> {
        self.schematic_symbols
            .iter()
            .find(|s| s.property("Reference") == Some(reference))
    }
}
impl FromSexpr for Schematic {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "kicad_sch")?;
        let mut sch = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "version" => sch.version = item.text_at(1)?,
                "generator" => sch.generator = item.text_at(1)?,
                "uuid" => sch.uuid = Some(item.text_at(1)?),
                "paper" => sch.paper = PageSettings::from_sexpr(item)?,
                "title_block" => sch.title_block = Some(TitleBlock::from_sexpr(item)?),
                "lib_symbols" => sch.lib_symbols = decode_all(SexpList::new(item)?.args())?,
                "junction" => sch.junctions.push(Junction::from_sexpr(item)?),
                "no_connect" => sch.no_connects.push(NoConnect::from_sexpr(item)?),
                "bus_entry" => sch.bus_entries.push(BusEntry::from_sexpr(item)?),
                "bus_alias" => sch.bus_aliases.push(BusAlias::from_sexpr(item)?),
                "wire" | "bus" => sch
                    .graphical_items
                    .push(WiringItem::Connection(Connection::from_sexpr(item)?)),
                "polyline" => sch
                    .graphical_items
                    .push(WiringItem::PolyLine(PolyLine::from_sexpr(item)?)),
                "arc" => sch.shapes.push(Shape::Arc(Arc::from_sexpr(item)?)),
                "circle" => sch.shapes.push(Shape::Circle(Circle::from_sexpr(item)?)),
                "rectangle" => sch.shapes.push(Shape::Rectangle(Rectangle::from_sexpr(item)?)),
                "image" => sch.images.push(Image::from_sexpr(item)?),
                "text" => sch.texts.push(Text::from_sexpr(item)?),
                "text_box" => sch.text_boxes.push(TextBox::from_sexpr(item)?),
                "label" => sch.labels.push(LocalLabel::from_sexpr(item)?),
                "global_label" => sch.global_labels.push(GlobalLabel::from_sexpr(item)?),
                "hierarchical_label" => sch
                    .hierarchical_labels
                    .push(HierarchicalLabel::from_sexpr(item)?),
                "netclass_flag" => sch.netclass_flags.push(NetclassFlag::from_sexpr(item)?),
                "symbol" => sch.schematic_symbols.push(SchematicSymbol::from_sexpr(item)?),
                "sheet" => sch.sheets.push(HierarchicalSheet::from_sexpr(item)?),
                "sheet_instances" => {
                    sch.sheet_instances = decode_all(SexpList::new(item)?.args())?
                }
                "symbol_instances" => {
                    sch.symbol_instances = decode_all(SexpList::new(item)?.args())?
                }
                _ => list.skip(tag),
            }
        }
        Ok(sch)
    }
}

/// Write a block of same-kind items, preceded by a blank line
fn write_block<T: ToSexpr>(out: &mut String, indent: usize, items: &[T]) -> KiResult<()> {
    if items.is_empty() {
        return Ok(());
    }
    out.push('\n');
    for item in items {
        item.write_sexpr(out, indent, true)?;
    }
    Ok(())
}

impl ToSexpr for Schematic {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        writeln!(
            out,
            "{}(kicad_sch (version {}) (generator {})",
            ind, self.version, self.generator
        )?;
        if let Some(uuid) = &self.uuid {
            write!(out, "\n{}  (uuid {})\n\n", ind, uuid)?;
        }
        self.paper.write_sexpr(out, indent + 2, true)?;
        if let Some(tb) = &self.title_block {
            out.push('\n');
            tb.write_sexpr(out, indent + 2, true)?;
        }
        if self.lib_symbols.is_empty() {
            writeln!(out, "{}  (lib_symbols)", ind)?;
        } else {
            write!(out, "\n{}  (lib_symbols", ind)?;
            for symbol in &self.lib_symbols {
                out.push('\n');
                symbol.write_sexpr(out, indent + 4, true)?;
            }
            writeln!(out, "{}  )", ind)?;
        }

        let inner = indent + 2;
        write_block(out, inner, &self.junctions)?;
        write_block(out, inner, &self.no_connects)?;
        write_block(out, inner, &self.bus_entries)?;
        write_block(out, inner, &self.bus_aliases)?;
        write_block(out, inner, &self.graphical_items)?;
        write_block(out, inner, &self.shapes)?;
        write_block(out, inner, &self.images)?;
        write_block(out, inner, &self.text_boxes)?;
        write_block(out, inner, &self.texts)?;
        write_block(out, inner, &self.labels)?;
        write_block(out, inner, &self.global_labels)?;
        write_block(out, inner, &self.hierarchical_labels)?;
        write_block(out, inner, &self.netclass_flags)?;

        for symbol in &self.schematic_symbols {
            out.push('\n');
            symbol.write_sexpr(out, inner, true)?;
        }
        for sheet in &self.sheets {
            out.push('\n');
            sheet.write_sexpr(out, inner, true)?;
        }

        if !self.sheet_instances.is_empty() {
            write!(out, "\n{}  (sheet_instances\n", ind)?;
            for inst in &self.sheet_instances {
                inst.write_sexpr(out, indent + 4, true)?;
            }
            writeln!(out, "{}  )", ind)?;
        }
        if !self.symbol_instances.is_empty() {
            write!(out, "\n{}  (symbol_instances\n", ind)?;
            for inst in &self.symbol_instances {
                inst.write_sexpr(out, indent + 4, true)?;
            }
            writeln!(out, "{}  )", ind)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KicadFile;

    #[test]
    fn empty_schematic() -> KiResult<()> {
        let sch = Schematic::create_new();
        let text = sch.to_string()?;
        assert_eq!(
            text,
            concat!(
                "(kicad_sch (version 20211014) (generator kicad21)\n",
                "  (paper \"A4\")\n",
                "  (lib_symbols)\n",
                "\n",
                "  (sheet_instances\n",
                "    (path \"/\" (page \"1\"))\n",
                "  )\n",
                ")\n"
            )
        );
        assert_eq!(Schematic::from_str(&text)?, sch);
        Ok(())
    }

    #[test]
    fn wrong_root() -> KiResult<()> {
        assert!(Schematic::from_str("(kicad_pcb (version 1))").is_err());
        Ok(())
    }
}
