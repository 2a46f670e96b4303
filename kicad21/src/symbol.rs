//!
//! # Symbol Libraries
//!
//! Library symbols with their pins and units, the `kicad_symbol_lib` root of
//! `.kicad_sym` files, and the cached library symbols of schematics.
//!

// Std-Lib
use std::fmt::Write;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

// Crates.io Imports
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::document::kicad_file;
use crate::items::common::{Effects, Position, Property};
use crate::items::syitems::SyItem;
use crate::sexpr::{FromSexpr, Sexp, SexpList, ToSexpr};
use crate::utils::enumstr;
use crate::write::{Endline, Indent, Quoted, YesNo};
use crate::KiResult;

enumstr!(
    /// # Pin Electrical Types
    PinElectricalType {
        Input: "input",
        Output: "output",
        Bidirectional: "bidirectional",
        TriState: "tri_state",
        Passive: "passive",
        Free: "free",
        Unspecified: "unspecified",
        PowerIn: "power_in",
        PowerOut: "power_out",
        OpenCollector: "open_collector",
        OpenEmitter: "open_emitter",
        NoConnect: "no_connect",
    }
);
impl Default for PinElectricalType {
    fn default() -> Self {
        Self::Input
    }
}

enumstr!(
    /// # Pin Graphical Styles
    PinGraphicalStyle {
        Line: "line",
        Inverted: "inverted",
        Clock: "clock",
        InvertedClock: "inverted_clock",
        InputLow: "input_low",
        ClockLow: "clock_low",
        OutputLow: "output_low",
        EdgeClockHigh: "edge_clock_high",
        NonLogic: "non_logic",
    }
);
impl Default for PinGraphicalStyle {
    fn default() -> Self {
        Self::Line
    }
}

/// # Alternate Pin Function
/// `(alternate "name" TYPE STYLE)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SymbolAlternativePin {
    pub pin_name: String,
    pub electrical_type: PinElectricalType,
    pub graphical_style: PinGraphicalStyle,
}
impl FromSexpr for SymbolAlternativePin {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "alternate")?;
        Ok(Self {
            pin_name: list.text(1)?,
            electrical_type: list.keyword(2)?,
            graphical_style: list.keyword(3)?,
        })
    }
}
impl ToSexpr for SymbolAlternativePin {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        write!(
            out,
            "{}(alternate {} {} {}){}",
            Indent(indent),
            Quoted(&self.pin_name),
            self.electrical_type,
            self.graphical_style,
            Endline(newline)
        )?;
        Ok(())
    }
}

/// # Symbol Pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SymbolPin {
    pub electrical_type: PinElectricalType,
    pub graphical_style: PinGraphicalStyle,
    pub position: Position,
    pub length: f64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_effects: Option<Effects>,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_effects: Option<Effects>,
    #[serde(default)]
    pub hide: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_pins: Vec<SymbolAlternativePin>,
}
impl Default for SymbolPin {
    fn default() -> Self {
        Self {
            electrical_type: PinElectricalType::Input,
            graphical_style: PinGraphicalStyle::Line,
            position: Position::default(),
            length: 2.54,
            name: "~".into(),
            name_effects: None,
            number: "1".into(),
            number_effects: None,
            hide: false,
            alternate_pins: Vec::new(),
        }
    }
}
impl FromSexpr for SymbolPin {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "pin")?;
        let mut pin = Self {
            electrical_type: list.keyword(1)?,
            graphical_style: list.keyword(2)?,
            hide: list.has_flag("hide"),
            ..Default::default()
        };
        for (tag, item) in list.children() {
            match tag {
                "at" => pin.position = Position::from_sexpr(item)?,
                "length" => pin.length = item.num_at(1)?,
                "name" => {
                    pin.name = item.text_at(1)?;
                    if let Some(e) = SexpList::new(item)?.items.get(2) {
                        pin.name_effects = Some(Effects::from_sexpr(e)?);
                    }
                }
                "number" => {
                    pin.number = item.text_at(1)?;
                    if let Some(e) = SexpList::new(item)?.items.get(2) {
                        pin.number_effects = Some(Effects::from_sexpr(e)?);
                    }
                }
                "alternate" => pin
                    .alternate_pins
                    .push(SymbolAlternativePin::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(pin)
    }
}
impl ToSexpr for SymbolPin {
    /// Pins without name or number effects fit on a single line,
    /// unless they carry alternate functions.
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(
            out,
            "{}(pin {} {} {} (length {})",
            ind,
            self.electrical_type,
            self.graphical_style,
            self.position.xya("at"),
            self.length
        )?;
        if self.hide {
            out.push_str(" hide");
        }
        let mut multiline = false;
        if self.name_effects.is_none() && self.number_effects.is_none() {
            write!(
                out,
                " (name {}) (number {})",
                Quoted(&self.name),
                Quoted(&self.number)
            )?;
        } else {
            let fields = [
                ("name", &self.name, &self.name_effects),
                ("number", &self.number, &self.number_effects),
            ];
            for (tag, text, effects) in fields {
                write!(out, "\n{}  ({} {}", ind, tag, Quoted(text))?;
                if let Some(effects) = effects {
                    out.push(' ');
                    effects.write_sexpr(out, 0, false)?;
                }
                out.push(')');
            }
            out.push('\n');
            multiline = true;
        }
        if !self.alternate_pins.is_empty() {
            if !multiline {
                out.push('\n');
                multiline = true;
            }
            for alt in &self.alternate_pins {
                alt.write_sexpr(out, indent + 2, true)?;
            }
        }
        if multiline {
            write!(out, "{}", ind)?;
        }
        write!(out, "){}", Endline(newline))?;
        Ok(())
    }
}

///
/// # Symbol
///
/// A library symbol, or one of its units.
///
/// Identified by `library:entry` at the top level of schematics,
/// by a bare `entry` in libraries, and by `entry_unit_style` for units.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Symbol {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_nickname: Option<String>,
    pub entry_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_id: Option<i64>,
    /// Parent symbol this one derives from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default)]
    pub hide_pin_numbers: bool,
    /// Whether a `pin_names` list is present
    #[serde(default)]
    pub pin_names: bool,
    #[serde(default)]
    pub pin_names_hide: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_names_offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_bom: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_board: Option<bool>,
    /// Power symbol, e.g. `GND` or `+5V`
    #[serde(default)]
    pub is_power: bool,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub graphic_items: Vec<SyItem>,
    #[serde(default)]
    pub pins: Vec<SymbolPin>,
    #[serde(default)]
    pub units: Vec<Symbol>,
}
impl Symbol {
    /// Create a new symbol `id`, with the four mandatory properties
    pub fn create_new(id: &str, reference: &str, value: &str, footprint: &str, datasheet: &str) -> Self {
        let mut symbol = Self {
            in_bom: Some(true),
            on_board: Some(true),
            ..Default::default()
        };
        symbol.set_lib_id(id);
        let props = [
            ("Reference", reference, false),
            ("Value", value, false),
            ("Footprint", footprint, true),
            ("Datasheet", datasheet, true),
        ];
        for (idx, (key, value, hide)) in props.into_iter().enumerate() {
            let mut prop = Property::new(key, value);
            prop.id = Some(idx as i64);
            prop.effects = Some(Effects::sized(1.27, hide));
            symbol.properties.push(prop);
        }
        symbol
    }
    /// Get our combined identifier
    pub fn lib_id(&self) -> String {
        if let Some(lib) = &self.library_nickname {
            return format!("{}:{}", lib, self.entry_name);
        }
        match (self.unit_id, self.style_id) {
            (Some(u), Some(s)) => format!("{}_{}_{}", self.entry_name, u, s),
            _ => self.entry_name.clone(),
        }
    }
    /// Set our identifier from any of its `library:entry`, `entry_unit_style` or `entry` forms.
    /// The entry name is copied into all units.
    pub fn set_lib_id(&mut self, id: &str) {
        self.set_id_parts(id, true)
    }
    fn set_id_parts(&mut self, id: &str, unit_style: bool) {
        self.library_nickname = None;
        self.unit_id = None;
        self.style_id = None;
        self.entry_name = id.into();
        match id.split_once(':') {
            Some((lib, entry)) if !lib.is_empty() && !entry.is_empty() => {
                self.library_nickname = Some(lib.into());
                self.entry_name = entry.into();
            }
            _ if unit_style => {
                if let Some((entry, unit, style)) = split_unit_style(id) {
                    self.entry_name = entry.into();
                    self.unit_id = Some(unit);
                    self.style_id = Some(style);
                }
            }
            _ => (),
        }
        for unit in self.units.iter_mut() {
            unit.entry_name = self.entry_name.clone();
        }
    }
    /// Get the value of property `key`
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
    /// Decode, applying `unit_style` identifier parsing at our top level
    fn decode(exp: &Sexp, unit_style: bool) -> KiResult<Self> {
        let list = SexpList::expect(exp, "symbol")?;
        let mut symbol = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "extends" => symbol.extends = Some(item.text_at(1)?),
                "pin_numbers" => symbol.hide_pin_numbers = SexpList::new(item)?.has_flag("hide"),
                "pin_names" => {
                    let names = SexpList::new(item)?;
                    symbol.pin_names = true;
                    symbol.pin_names_hide = names.has_flag("hide");
                    for (tag, prop) in names.children() {
                        match tag {
                            "offset" => symbol.pin_names_offset = Some(prop.num_at(1)?),
                            _ => names.skip(tag),
                        }
                    }
                }
                "in_bom" => symbol.in_bom = Some(item.yes_no_at(1)?),
                "on_board" => symbol.on_board = Some(item.yes_no_at(1)?),
                "power" => symbol.is_power = true,
                "symbol" => symbol.units.push(Symbol::from_sexpr(item)?),
                "property" => symbol.properties.push(Property::from_sexpr(item)?),
                "pin" => symbol.pins.push(SymbolPin::from_sexpr(item)?),
                _ => match SyItem::decode(item)? {
                    Some(gi) => symbol.graphic_items.push(gi),
                    None => list.skip(tag),
                },
            }
        }
        // Set the identifier last, so that it cascades into the units
        symbol.set_id_parts(&list.text(1)?, unit_style);
        Ok(symbol)
    }
}

/// Split `entry_unit_style` into its parts, if `id` has that form
fn split_unit_style(id: &str) -> Option<(&str, i64, i64)> {
    let mut parts = id.rsplitn(3, '_');
    let style = parts.next()?;
    let unit = parts.next()?;
    let entry = parts.next()?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if entry.is_empty() || !digits(unit) || !digits(style) {
        return None;
    }
    Some((entry, unit.parse().ok()?, style.parse().ok()?))
}

impl FromSexpr for Symbol {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        Self::decode(exp, true)
    }
}
impl ToSexpr for Symbol {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(symbol {}", ind, Quoted(&self.lib_id()))?;
        if let Some(e) = &self.extends {
            write!(out, " (extends {})", Quoted(e))?;
        }
        if self.is_power {
            out.push_str(" (power)");
        }
        if self.hide_pin_numbers {
            out.push_str(" (pin_numbers hide)");
        }
        if self.pin_names {
            out.push_str(" (pin_names");
            if let Some(o) = self.pin_names_offset {
                write!(out, " (offset {})", o)?;
            }
            if self.pin_names_hide {
                out.push_str(" hide");
            }
            out.push(')');
        }
        if let Some(b) = self.in_bom {
            write!(out, " (in_bom {})", YesNo(b))?;
        }
        if let Some(b) = self.on_board {
            write!(out, " (on_board {})", YesNo(b))?;
        }
        out.push('\n');
        for prop in &self.properties {
            prop.write_sexpr(out, indent + 2, true)?;
        }
        for item in &self.graphic_items {
            item.write_sexpr(out, indent + 2, true)?;
        }
        for pin in &self.pins {
            pin.write_sexpr(out, indent + 2, true)?;
        }
        for unit in &self.units {
            unit.write_sexpr(out, indent + 2, true)?;
        }
        write!(out, "{}){}", ind, Endline(newline))?;
        Ok(())
    }
}

///
/// # Schematic Library Symbol
///
/// The copies of library symbols cached in a schematic's `lib_symbols`.
/// Their top-level identifiers are `library:entry` or a bare entry,
/// never parsed for unit and style numbers. Their units follow the [Symbol] rules.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchematicLibSymbol(pub Symbol);

impl SchematicLibSymbol {
    /// Set our identifier from `library:entry` or bare `entry` form
    pub fn set_lib_id(&mut self, id: &str) {
        self.0.set_id_parts(id, false)
    }
}
impl Deref for SchematicLibSymbol {
    type Target = Symbol;
    fn deref(&self) -> &Symbol {
        &self.0
    }
}
impl DerefMut for SchematicLibSymbol {
    fn deref_mut(&mut self) -> &mut Symbol {
        &mut self.0
    }
}
impl FromSexpr for SchematicLibSymbol {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        Ok(Self(Symbol::decode(exp, false)?))
    }
}
impl ToSexpr for SchematicLibSymbol {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        self.0.write_sexpr(out, indent, newline)
    }
}

/// # Symbol Library
/// Root of `.kicad_sym` files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SymbolLib {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}
kicad_file!(SymbolLib);

impl SymbolLib {
    /// Create a new, empty library
    pub fn create_new() -> Self {
        Self {
            version: "20211014".into(),
            generator: Some("kicad21".into()),
            ..Default::default()
        }
    }
    /// Find a symbol by entry name
    pub fn symbol(&self, entry_name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.entry_name == entry_name)
    }
}
impl FromSexpr for SymbolLib {
    fn from_sexpr(exp: &Sexp) -> KiResult<Self> {
        let list = SexpList::expect(exp, "kicad_symbol_lib")?;
        let mut lib = Self::default();
        for (tag, item) in list.children() {
            match tag {
                "version" => lib.version = item.text_at(1)?,
                "generator" => lib.generator = Some(item.text_at(1)?),
                "symbol" => lib.symbols.push(Symbol::from_sexpr(item)?),
                _ => list.skip(tag),
            }
        }
        Ok(lib)
    }
}
impl ToSexpr for SymbolLib {
    fn write_sexpr(&self, out: &mut String, indent: usize, newline: bool) -> KiResult<()> {
        let ind = Indent(indent);
        write!(out, "{}(kicad_symbol_lib (version {})", ind, self.version)?;
        if let Some(g) = &self.generator {
            write!(out, " (generator {})", g)?;
        }
        out.push('\n');
        for symbol in &self.symbols {
            symbol.write_sexpr(out, indent + 2, true)?;
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
    fn lib_ids() {
        let mut sym = Symbol::default();
        sym.units.push(Symbol::default());
        sym.set_lib_id("LibA:PartX");
        assert_eq!(sym.library_nickname.as_deref(), Some("LibA"));
        assert_eq!(sym.entry_name, "PartX");
        assert_eq!(sym.units[0].entry_name, "PartX");
        assert_eq!(sym.lib_id(), "LibA:PartX");

        sym.set_lib_id("PartX_2_1");
        assert_eq!(sym.library_nickname, None);
        assert_eq!(sym.entry_name, "PartX");
        assert_eq!((sym.unit_id, sym.style_id), (Some(2), Some(1)));
        assert_eq!(sym.lib_id(), "PartX_2_1");

        sym.set_lib_id("Op_Amp_1_0_1");
        assert_eq!(sym.entry_name, "Op_Amp_1");
        assert_eq!((sym.unit_id, sym.style_id), (Some(0), Some(1)));

        sym.set_lib_id("R_Small");
        assert_eq!(sym.entry_name, "R_Small");
        assert_eq!(sym.unit_id, None);

        let mut cached = SchematicLibSymbol::default();
        cached.set_lib_id("PartX_2_1");
        assert_eq!(cached.entry_name, "PartX_2_1");
        assert_eq!(cached.unit_id, None);
    }

    #[test]
    fn pins() -> KiResult<()> {
        let srcs = [
            "(pin passive line (at 0 3.81 270) (length 1.27) hide (name \"~\") (number \"1\"))",
            concat!(
                "(pin input line (at -7.62 2.54 0) (length 2.54)\n",
                "  (name \"IN\" (effects (font (size 1.27 1.27))))\n",
                "  (number \"3\" (effects (font (size 1.27 1.27))))\n",
                "  (alternate \"CLK\" input clock)\n",
                ")"
            ),
            concat!(
                "(pin bidirectional line (at 0 0 0) (length 2.54) (name \"IO\") (number \"2\")\n",
                "  (alternate \"TX\" output line)\n",
                ")"
            ),
        ];
        for src in srcs {
            let pin = SymbolPin::from_sexpr(&parse_str(src)?)?;
            assert_eq!(pin.to_sexpr(0, false)?, src);
        }
        let bad = parse_str("(pin sideways line (at 0 0) (length 1))")?;
        assert!(SymbolPin::from_sexpr(&bad).is_err());
        Ok(())
    }

    #[test]
    fn create_new() -> KiResult<()> {
        let sym = Symbol::create_new("R", "R", "10k", "", "~");
        assert_eq!(sym.property("Value"), Some("10k"));
        let text = sym.to_sexpr(2, true)?;
        assert!(text.starts_with("  (symbol \"R\" (in_bom yes) (on_board yes)\n"));
        assert!(text.contains(
            "    (property \"Footprint\" \"\" (id 2) (at 0 0 0)\n      (effects (font (size 1.27 1.27)) hide)\n    )\n"
        ));
        let back = Symbol::from_sexpr(&parse_str(&text)?)?;
        assert_eq!(back, sym);
        Ok(())
    }
}
