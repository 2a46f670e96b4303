use std::path::Path;

use super::*;
use crate::board::TraceItem;
use crate::footprint::FpItem;
use crate::items::fpitems::FpTextType;
use crate::symbol::SchematicLibSymbol;
use crate::utils::SerializationFormat::{Json, Yaml};

/// Helper function: Grab the full path of resource-file `fname`
fn resource(rname: &str) -> String {
    format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), rname)
}

/// Check that `doc` survives an encode-decode cycle unchanged,
/// and that re-encoding produces identical text.
/// The load path is not part of the text, and is left out of the comparison.
fn check_stable<T>(doc: &T) -> KiResult<String>
where
    T: KicadFile + Clone + PartialEq + std::fmt::Debug,
{
    let text = doc.to_string()?;
    let again = T::from_str(&text)?;
    assert_eq!(again.file_path(), None);
    let mut unpathed = doc.clone();
    unpathed.set_file_path(None);
    assert_eq!(unpathed, again);
    assert_eq!(again.to_string()?, text);
    Ok(text)
}

/// Check that the file at `path` re-encodes byte-for-byte
fn check_exact<T: KicadFile>(path: &str) -> KiResult<T> {
    let doc = T::from_file(path)?;
    let src = std::fs::read_to_string(path)?;
    assert_eq!(doc.to_string()?, src);
    Ok(doc)
}

#[test]
fn it_round_trips_schematics() -> KiResult<()> {
    let sch: Schematic = check_exact(&resource("demo.kicad_sch"))?;
    assert_eq!(sch.version, "20211123");
    assert_eq!(sch.lib_symbols.len(), 1);

    // Cached library symbols keep their `library:entry` id, their units keep `entry_unit_style`
    let cached: &SchematicLibSymbol = &sch.lib_symbols[0];
    assert_eq!(cached.library_nickname.as_deref(), Some("Device"));
    assert_eq!(cached.units[1].lib_id(), "R_1_1");
    assert_eq!(cached.units[1].unit_id, Some(1));
    assert!(sch.lib_symbol("Device:R").is_some());

    let r1 = sch.symbol("R1");
    assert_eq!(r1.map(|s| s.pins.len()), Some(2));
    assert_eq!(sch.symbol_instances[0].value, "10k");
    Ok(())
}

#[test]
fn it_round_trips_symbol_libs() -> KiResult<()> {
    let lib: SymbolLib = check_exact(&resource("demo.kicad_sym"))?;
    assert_eq!(lib.symbols.len(), 2);
    let led = lib.symbol("LED");
    assert_eq!(led.map(|s| s.units.len()), Some(2));
    assert_eq!(led.and_then(|s| s.property("Footprint")), Some(""));
    let red = lib.symbol("LED_Red");
    assert_eq!(red.and_then(|s| s.extends.as_deref()), Some("LED"));
    assert_eq!(red.and_then(|s| s.unit_id), None);
    Ok(())
}

#[test]
fn it_round_trips_lib_tables() -> KiResult<()> {
    let table: LibTable = check_exact(&resource("fp-lib-table"))?;
    assert_eq!(table.kind, LibTableKind::Footprint);
    assert_eq!(table.version, Some(7));
    assert_eq!(table.lib("Battery").map(|l| l.active), Some(false));
    Ok(())
}

#[test]
fn it_round_trips_boards() -> KiResult<()> {
    let board: Board = check_exact(&resource("demo.kicad_pcb"))?;
    assert_eq!(board.nets.len(), 3);
    assert_eq!(board.layers[2].user_name.as_deref(), Some("B.Silkscreen"));
    assert_eq!(board.property("REVISION"), Some("A"));
    assert_eq!(
        board.setup.plot_settings.as_ref().and_then(|p| p.get("outputdirectory")),
        Some("gerbers/")
    );
    assert_eq!(board.graphical_items.len(), 2);
    assert_eq!(board.zones.len(), 1);
    assert!(matches!(board.trace_items[1], TraceItem::Via(_)));

    let fp = board.footprint("R1");
    assert_eq!(fp.map(|f| f.pads.len()), Some(2));
    assert_eq!(fp.map(|f| f.lib_id()).as_deref(), Some("Resistor_SMD:R_0603_1608Metric"));

    let text = check_stable(&board)?;
    assert!(text.contains("  (footprint \"Resistor_SMD:R_0603_1608Metric\" (layer \"F.Cu\")\n"));
    Ok(())
}

#[test]
fn it_keeps_sibling_order_and_drops_unknown_tags() -> KiResult<()> {
    let src = concat!(
        "(kicad_pcb (version 20211014) (generator pcbnew)\n",
        "  (future_token 1)\n",
        "  (footprint \"Lib:C\" (layer \"F.Cu\") (at 30 0))\n",
        "  (footprint \"Lib:A\" (layer \"F.Cu\") (at 10 0) (future_child \"x\"))\n",
        "  (footprint \"Lib:B\" (layer \"B.Cu\") (at 20 0))\n",
        "  (net 2 \"B\")\n",
        "  (net 0 \"\")\n",
        "  (net 1 \"A\")\n",
        ")\n"
    );
    let board = Board::from_str(src)?;
    let ids: Vec<String> = board.footprints.iter().map(|f| f.lib_id()).collect();
    assert_eq!(ids, vec!["Lib:C", "Lib:A", "Lib:B"]);
    let nets: Vec<i64> = board.nets.iter().map(|n| n.number).collect();
    assert_eq!(nets, vec![2, 0, 1]);

    // Unknown tags are ignored on decode, and absent on write
    let text = check_stable(&board)?;
    assert!(!text.contains("future_token"));
    assert!(!text.contains("future_child"));
    let c = text.find("\"Lib:C\"");
    let a = text.find("\"Lib:A\"");
    let b = text.find("\"Lib:B\"");
    assert!(c.is_some());
    assert!(c < a && a < b);
    Ok(())
}

#[test]
fn it_round_trips_footprints() -> KiResult<()> {
    let fp = Footprint::from_file(&resource("R_0603.kicad_mod"))?;
    assert_eq!(fp.entry_name, "R_0603_1608Metric");
    assert_eq!(fp.models.len(), 1);
    let reference = fp.graphic_items.iter().find_map(|item| match item {
        FpItem::Text(t) if t.text_type == FpTextType::Reference => Some(t.text.as_str()),
        _ => None,
    });
    assert_eq!(reference, Some("REF**"));

    // The legacy arc is upgraded, and written in its start-mid-end form
    let text = check_stable(&fp)?;
    assert!(text.contains("(fp_arc (start 0.5 0) (mid "));
    assert!(!text.contains("(angle"));
    Ok(())
}

#[test]
fn it_round_trips_design_rules() -> KiResult<()> {
    let dru: DesignRules = check_exact(&resource("rules.kicad_dru"))?;
    assert_eq!(dru.rules[0].severity.as_deref(), Some("error"));
    check_exact::<DesignRules>(&resource("version_only.kicad_dru"))?;
    Ok(())
}

#[test]
fn design_rules_are_not_boards() {
    // A bare `(version N)` form is a single list, just not the expected one
    let path = resource("version_only.kicad_dru");
    assert!(matches!(Board::from_file(&path), Err(KiError::Tag { .. })));
    assert!(matches!(Schematic::from_file(&path), Err(KiError::Tag { .. })));
    // Rules follow the version form, leaving trailing content after the first list
    assert!(Board::from_file(&resource("rules.kicad_dru")).is_err());
}

#[test]
fn it_rejects_malformed_files() {
    assert!(matches!(
        Board::from_file(&resource("unbalanced.kicad_pcb")),
        Err(KiError::Parse { .. })
    ));
    assert!(matches!(
        Board::from_file(&resource("missing.kicad_pcb")),
        Err(KiError::Io { .. })
    ));
    assert!(matches!(Board::from_file(&resource("")), Err(KiError::Io { .. })));
}

#[test]
fn it_creates_new_documents() -> KiResult<()> {
    let board = Board::create_new();
    assert_eq!(board.layers.len(), 20);
    check_stable(&board)?;

    let fp = Footprint::create_new("Lib:Part", "Part", None, "REF**");
    assert_eq!(fp.lib_id(), "Lib:Part");
    check_stable(&fp)?;

    let mut lib = SymbolLib::create_new();
    lib.symbols.push(Symbol::create_new("Part", "U", "Part", "", ""));
    check_stable(&lib)?;

    check_stable(&Schematic::create_new())?;
    check_stable(&WorkSheet::create_new())?;
    check_stable(&DesignRules::create_new())?;
    check_stable(&LibTable::create_new(LibTableKind::Footprint))?;
    Ok(())
}

#[test]
fn it_saves_to_remembered_paths() -> KiResult<()> {
    let mut sch = Schematic::create_new();
    assert!(matches!(sch.to_file(None), Err(KiError::Config(_))));

    let dir = std::env::temp_dir().join("kicad21-tests");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("saved.kicad_sch");
    sch.set_file_path(Some(path.clone()));
    sch.to_file(None)?;

    let loaded = Schematic::from_file(&path)?;
    assert_eq!(loaded.file_path(), Some(path.as_path()));
    assert_eq!(loaded.sheet_instances, sch.sheet_instances);
    Ok(())
}

#[test]
fn it_serializes_to_serde_formats() -> KiResult<()> {
    let table: LibTable = LibTable::from_file(&resource("fp-lib-table"))?;
    let yaml = Yaml.to_string(&table)?;
    let from_yaml: LibTable = Yaml.from_str(&yaml)?;
    // The load path is not part of the serialized data
    assert_eq!(from_yaml.libs, table.libs);
    assert_eq!(from_yaml.file_path, None);

    let sch = Schematic::from_file(&resource("demo.kicad_sch"))?;
    let json = Json.to_string(&sch)?;
    let from_json: Schematic = Json.from_str(&json)?;
    assert_eq!(from_json.to_string()?, sch.to_string()?);
    Ok(())
}

#[test]
fn it_writes_schema() -> KiResult<()> {
    // Schemas are generated for every document type
    let schema = schemars::schema_for!(Schematic);
    let text = serde_json::to_string_pretty(&schema).map_err(|e| KiError::Boxed(Box::new(e)))?;
    assert!(text.contains("HierarchicalSheet"));
    let schema = schemars::schema_for!(Board);
    let text = serde_json::to_string_pretty(&schema).map_err(|e| KiError::Boxed(Box::new(e)))?;
    assert!(text.contains("LayerToken"));
    assert!(Path::new(&resource("demo.kicad_pcb")).is_file());
    Ok(())
}
