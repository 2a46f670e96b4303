//! # kicad2yaml
//!
//! KiCad to Kicad21 YAML Schema Converter
//!
//! Converts any of the KiCad S-expression documents to YAML, JSON or TOML,
//! and back again when the input is one of those formats.
//!

use std::error::Error;
use std::path::Path;

use clap::{Parser, ValueEnum};
use kicad21::{
    Board, DesignRules, Footprint, KicadFile, LibTable, Schematic, Sexp, SymbolLib, WorkSheet,
};
use kicad21utils::{SerdeFile, SerializationFormat};
use log::{debug, info};

/// # Document Kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DocKind {
    Board,
    Footprint,
    Schematic,
    SymbolLib,
    Worksheet,
    Rules,
    LibTable,
}
impl DocKind {
    /// Infer from a KiCad file name's extension, or its full name for library tables
    fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name == "fp-lib-table" || name == "sym-lib-table" {
            return Some(Self::LibTable);
        }
        match path.extension()?.to_str()? {
            "kicad_pcb" => Some(Self::Board),
            "kicad_mod" => Some(Self::Footprint),
            "kicad_sch" => Some(Self::Schematic),
            "kicad_sym" => Some(Self::SymbolLib),
            "kicad_wks" => Some(Self::Worksheet),
            "kicad_dru" => Some(Self::Rules),
            _ => None,
        }
    }
    /// Infer from the tag of a parsed file's root list
    fn from_root(root: &Sexp) -> Option<Self> {
        match root.tag()? {
            "kicad_pcb" => Some(Self::Board),
            "footprint" | "module" => Some(Self::Footprint),
            "kicad_sch" => Some(Self::Schematic),
            "kicad_symbol_lib" => Some(Self::SymbolLib),
            "kicad_wks" | "page_layout" => Some(Self::Worksheet),
            "fp_lib_table" | "sym_lib_table" => Some(Self::LibTable),
            _ => None,
        }
    }
}

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// KiCad to Kicad21 YAML Schema Converter
#[derive(Parser)]
struct ProgramOptions {
    /// Input File, KiCad or serialized
    #[arg(short = 'i', long)]
    input: String,
    /// Output File
    #[arg(short = 'o', long)]
    output: String,
    /// Output format (json, yaml, toml, or kicad to re-write). Defaults to the output extension, then yaml.
    #[arg(short = 'f', long)]
    format: Option<String>,
    /// Document kind. Inferred from the KiCad-side file if not given.
    #[arg(short = 'k', long, value_enum)]
    kind: Option<DocKind>,
    /// Verbose Output Mode
    #[arg(short, long)]
    verbose: bool,
}

/// The main entry point.
/// All logic is offloaded to `_main` for sake of testing.
fn main() -> Result<(), Box<dyn Error>> {
    let options = ProgramOptions::parse();
    let level = match options.verbose {
        true => log::LevelFilter::Debug,
        false => log::LevelFilter::Info,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
    _main(&options)
}

/// All the real logic, with `ProgramOptions` argument for sake of testing
fn _main(options: &ProgramOptions) -> Result<(), Box<dyn Error>> {
    let input = Path::new(&options.input);
    let output = Path::new(&options.output);

    // Serialized input is written back out as KiCad text
    let from_serde = input
        .extension()
        .and_then(|e| e.to_str())
        .and_then(SerializationFormat::from_name);
    if let Some(fmt) = from_serde {
        let kind = match options.kind.or_else(|| DocKind::from_path(output)) {
            Some(k) => k,
            None => return Err(format!("Cannot infer document kind of {:?}", output).into()),
        };
        debug!("Reading {:?} as {:?} {:?}", input, fmt, kind);
        match kind {
            DocKind::Board => restore::<Board>(fmt, input, output)?,
            DocKind::Footprint => restore::<Footprint>(fmt, input, output)?,
            DocKind::Schematic => restore::<Schematic>(fmt, input, output)?,
            DocKind::SymbolLib => restore::<SymbolLib>(fmt, input, output)?,
            DocKind::Worksheet => restore::<WorkSheet>(fmt, input, output)?,
            DocKind::Rules => restore::<DesignRules>(fmt, input, output)?,
            DocKind::LibTable => restore::<LibTable>(fmt, input, output)?,
        }
        info!("wrote {:?}", output);
        return Ok(());
    }

    let kind = match options.kind.or_else(|| DocKind::from_path(input)) {
        Some(k) => k,
        None => {
            // Fall back to the root tag
            let root = kicad21::read::parse_file(input)?;
            match DocKind::from_root(&root) {
                Some(k) => k,
                None => return Err(format!("Unknown document root {}", root.describe()).into()),
            }
        }
    };
    debug!("Reading {:?} as {:?}", input, kind);

    // Re-writing mode: KiCad text in, KiCad text out
    if options.format.as_deref() == Some("kicad") {
        match kind {
            DocKind::Board => rewrite::<Board>(input, output)?,
            DocKind::Footprint => rewrite::<Footprint>(input, output)?,
            DocKind::Schematic => rewrite::<Schematic>(input, output)?,
            DocKind::SymbolLib => rewrite::<SymbolLib>(input, output)?,
            DocKind::Worksheet => rewrite::<WorkSheet>(input, output)?,
            DocKind::Rules => rewrite::<DesignRules>(input, output)?,
            DocKind::LibTable => rewrite::<LibTable>(input, output)?,
        }
        info!("wrote {:?}", output);
        return Ok(());
    }

    let fmt = match &options.format {
        Some(name) => match SerializationFormat::from_name(name) {
            Some(f) => f,
            None => return Err(format!("Unsupported format {:?}", name).into()),
        },
        None => output
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SerializationFormat::from_name)
            .unwrap_or(SerializationFormat::Yaml),
    };
    match kind {
        DocKind::Board => export::<Board>(fmt, input, output)?,
        DocKind::Footprint => export::<Footprint>(fmt, input, output)?,
        DocKind::Schematic => export::<Schematic>(fmt, input, output)?,
        DocKind::SymbolLib => export::<SymbolLib>(fmt, input, output)?,
        DocKind::Worksheet => export::<WorkSheet>(fmt, input, output)?,
        DocKind::Rules => export::<DesignRules>(fmt, input, output)?,
        DocKind::LibTable => export::<LibTable>(fmt, input, output)?,
    }
    info!("wrote {:?}", output);
    Ok(())
}

/// Load KiCad document `input` and save it in format `fmt`
fn export<T: KicadFile + SerdeFile>(
    fmt: SerializationFormat,
    input: &Path,
    output: &Path,
) -> Result<(), Box<dyn Error>> {
    let doc = T::from_file(input)?;
    doc.save_as(fmt, output)?;
    Ok(())
}

/// Load KiCad document `input` and write it straight back out
fn rewrite<T: KicadFile>(input: &Path, output: &Path) -> Result<(), Box<dyn Error>> {
    let doc = T::from_file(input)?;
    doc.to_file(Some(output))?;
    Ok(())
}

/// Load `fmt`-format `input` and write it as a KiCad document
fn restore<T: KicadFile + SerdeFile>(
    fmt: SerializationFormat,
    input: &Path,
    output: &Path,
) -> Result<(), Box<dyn Error>> {
    let doc = T::open_as(input, fmt)?;
    doc.to_file(Some(output))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kicad21utils::SerializationFormat::Yaml;

    fn options(input: &str, output: &str) -> ProgramOptions {
        ProgramOptions {
            input: input.into(),
            output: output.into(),
            format: None,
            kind: None,
            verbose: true,
        }
    }

    #[test]
    fn roundtrip_to_golden_file() -> Result<(), Box<dyn Error>> {
        // The golden file was created by running the program:
        // $ cargo run -- -i resources/fp-lib-table -o resources/fp-lib-table.golden.yaml
        let golden_input_path = resource("fp-lib-table");
        let golden_output_path = resource("fp-lib-table.golden.yaml");
        let output_path = resource("fp-lib-table.yaml");

        // Run the main function, producing file `output_path`
        _main(&options(&golden_input_path, &output_path))?;

        // Read back what it wrote to disk, and compare to the golden version
        let readback: LibTable = Yaml.open(&output_path)?;
        let golden: LibTable = Yaml.open(&golden_output_path)?;
        assert_eq!(readback, golden);

        // And convert back to KiCad text, which matches the original
        let kicad_path = resource("fp-lib-table.out");
        let mut opts = options(&output_path, &kicad_path);
        opts.kind = Some(DocKind::LibTable);
        _main(&opts)?;
        assert_eq!(
            std::fs::read_to_string(&kicad_path)?,
            std::fs::read_to_string(&golden_input_path)?
        );
        Ok(())
    }

    #[test]
    fn infers_kinds() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            DocKind::from_path(Path::new("a/fp-lib-table")),
            Some(DocKind::LibTable)
        );
        assert_eq!(
            DocKind::from_path(Path::new("board.kicad_pcb")),
            Some(DocKind::Board)
        );
        assert_eq!(DocKind::from_path(Path::new("board.txt")), None);

        // Tables without their usual names are recognized by their root
        let output_path = resource("table.json");
        let mut opts = options(&resource("libs.table"), &output_path);
        opts.format = Some("json".into());
        _main(&opts)?;
        let table: LibTable = SerializationFormat::Json.open(&output_path)?;
        assert_eq!(table.libs.len(), 1);

        // As are legacy worksheet page layouts
        let output_path = resource("legacy.json");
        let mut opts = options(&resource("legacy.layout"), &output_path);
        opts.format = Some("json".into());
        _main(&opts)?;
        let wks: WorkSheet = SerializationFormat::Json.open(&output_path)?;
        assert_eq!(wks.items.len(), 1);
        Ok(())
    }

    #[test]
    fn rewrites_kicad_files() -> Result<(), Box<dyn Error>> {
        let output_path = resource("fp-lib-table.rewritten");
        let mut opts = options(&resource("fp-lib-table"), &output_path);
        opts.format = Some("kicad".into());
        _main(&opts)?;
        assert_eq!(
            std::fs::read_to_string(&output_path)?,
            std::fs::read_to_string(resource("fp-lib-table"))?
        );
        Ok(())
    }

    #[test]
    fn rejects_unknown_kinds() {
        let opts = options(&resource("fp-lib-table.golden.yaml"), &resource("unknown.out"));
        assert!(_main(&opts).is_err());
    }

    /// Grab the full path of resource-file `fname`
    fn resource(rname: &str) -> String {
        format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), rname)
    }
}
