//! # Measure & Quantity Extractor
//!
//! Reads the **net content** and the **pack quantity** out of free marketplace text:
//!
//! * `"Pack x 4 800g"` is four units of 800 grams, 3.2 kg in total.
//! * `"24 bricks x 200ml"` is twenty-four 200 ml units; as a liquid formula it weighs
//!   `4.8 l x 1.085 = 5.208 kg`.
//!
//! Nothing here fails. Text without a usable measure yields a zero total, which
//! callers read as "undetermined".

use std::sync::OnceLock;

use listguard_common::models::Substance;
use listguard_common::text::fold_accent;
use regex::{Captures, Regex};

/// Upper bound of a plausible multi-pack; larger numbers are grammages or codes.
pub const MAX_PACK_QUANTITY: u32 = 100;

/// Kilograms per liter of liquid nutritional formulas.
pub const DEFAULT_LIQUID_DENSITY: f64 = 1.085;

/// Unit tokens, longest spelling first so the alternation never stops short.
const UNIT_TOKENS: &str = "kilogramos|kilogramo|kilos|kilo|kgs|kg|gramos|gramo|grms|grm|grs|gr|gms|gm|g|mililitros|mililitro|mls|ml|cc|litros|litro|ltrs|ltr|lts|lt|l";

/// Words that count units (`"24 bricks"`, `"6 unidades"`).
const COUNT_WORDS: &str = "unidades|unidad|unids|unid|uds|ud|u|bricks|brick|latas|lata|sobres|sobre|frascos|frasco|botellas|botella|tarros|tarro|potes|pote|envases|envase|packs";

/// Words that introduce a life stage; the number after them is never a quantity.
const STAGE_CUES: [&str; 3] = ["etapa", "stage", "fase"];

static MEASURE_RE: OnceLock<Regex> = OnceLock::new();
static UNIT_AFTER_RE: OnceLock<Regex> = OnceLock::new();
static PACK_CUE_RE: OnceLock<Regex> = OnceLock::new();
static COUNT_X_RE: OnceLock<Regex> = OnceLock::new();
static UNITS_PHRASE_RE: OnceLock<Regex> = OnceLock::new();
static X_BEFORE_RE: OnceLock<Regex> = OnceLock::new();
static X_AFTER_RE: OnceLock<Regex> = OnceLock::new();

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("measure patterns are valid")
}

fn measure_re() -> &'static Regex {
    MEASURE_RE.get_or_init(|| compile(&format!(r"(\d+(?:\.\d+)?)\s*({UNIT_TOKENS})\b")))
}

fn unit_after_re() -> &'static Regex {
    UNIT_AFTER_RE.get_or_init(|| compile(&format!(r"^(?:\.\d+)?\s*(?:{UNIT_TOKENS})\b")))
}

fn pack_cue_re() -> &'static Regex {
    PACK_CUE_RE.get_or_init(|| {
        compile(r"\b(?:pack|packs|combo|combos|promo|promocion|kit|caja|bulto)\s*(?:de\s*|x\s*|por\s*)?(\d+)")
    })
}

/// `"bricks x 24"`: the count follows the unit word.
fn count_x_re() -> &'static Regex {
    COUNT_X_RE.get_or_init(|| compile(&format!(r"\b(?:{COUNT_WORDS})\s*x\s*(\d+)")))
}

fn units_phrase_re() -> &'static Regex {
    UNITS_PHRASE_RE.get_or_init(|| compile(&format!(r"\b(\d+)\s*(?:{COUNT_WORDS})\b")))
}

fn x_before_re() -> &'static Regex {
    X_BEFORE_RE.get_or_init(|| compile(r"\bx\s*(\d+)"))
}

fn x_after_re() -> &'static Regex {
    X_AFTER_RE.get_or_init(|| compile(r"\b(\d+)\s*x"))
}

/// Base unit of a detected unit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureUnit {
    Grams,
    Milliliters,
}

/// What the extractor read out of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measures {
    /// Total content of the listing in kilograms; `0.0` when nothing was read.
    pub total_mass_kg: f64,
    /// Units in the listing, `1` when no multi-pack phrasing was found.
    pub quantity: u32,
    /// First measure of the text, in grams or milliliters.
    pub unit_value: f64,
    pub unit_type: Option<MeasureUnit>,
}

impl Measures {
    pub fn is_determined(&self) -> bool {
        self.total_mass_kg > 0.0
    }
}

/// Canonical text for measure parsing.
///
/// Like the text normalizer, but a `.` or `,` between two digits survives as a
/// decimal point, and stripped characters become spaces so `"4x800g"` keeps
/// both numbers apart from the surrounding words.
pub fn measure_text(text: &str) -> String {
    let chars: Vec<char> = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect();

    let mut out: String = String::with_capacity(chars.len());
    for (i, ch) in chars.iter().copied().enumerate() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            continue;
        }
        let between_digits: bool = i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(|next| next.is_ascii_digit());
        if (ch == '.' || ch == ',') && between_digits {
            out.push('.');
        } else {
            out.push(' ');
        }
    }

    out.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Extracts content and quantity using the default liquid density.
pub fn extract_measures(text: &str, substance_hint: Substance) -> Measures {
    extract_measures_with_density(text, substance_hint, DEFAULT_LIQUID_DENSITY)
}

/// Extracts content and quantity; volumes of liquids are weighed with `liquid_density`.
pub fn extract_measures_with_density(
    text: &str,
    substance_hint: Substance,
    liquid_density: f64,
) -> Measures {
    let canonical: String = measure_text(text);
    let quantity: u32 = detect_quantity_in(&canonical);

    match first_measure(&canonical) {
        Some((unit_value, unit)) => Measures {
            total_mass_kg: total_mass_kg(unit_value, unit, quantity, substance_hint, liquid_density),
            quantity,
            unit_value,
            unit_type: Some(unit),
        },
        None => Measures {
            total_mass_kg: 0.0,
            quantity,
            unit_value: 0.0,
            unit_type: None,
        },
    }
}

/// Pack quantity of `text`, `1` when no multi-pack phrasing is found.
pub fn detect_quantity(text: &str) -> u32 {
    detect_quantity_in(&measure_text(text))
}

/// Pack quantity of a title naming a product of life stage `stage`.
///
/// A bare `"4 x"` or `"x 4"` whose number is the stage (`"Profutura 4 x 800g"`)
/// names the product, not the pack.
pub fn detect_quantity_for_stage(text: &str, stage: Option<&str>) -> u32 {
    detect_quantity_with(&measure_text(text), stage)
}

/// First measure of `text` in its base unit (`"1,5 kg"` is 1500 grams).
pub fn parse_measure(text: &str) -> Option<(f64, MeasureUnit)> {
    first_measure(&measure_text(text))
}

/// Kilograms of `quantity` units of `unit_value`.
pub fn total_mass_kg(
    unit_value: f64,
    unit: MeasureUnit,
    quantity: u32,
    substance_hint: Substance,
    liquid_density: f64,
) -> f64 {
    let base_total: f64 = unit_value * f64::from(quantity) / 1000.0;
    match unit {
        MeasureUnit::Grams => base_total,
        MeasureUnit::Milliliters if substance_hint.is_liquid() => base_total * liquid_density,
        MeasureUnit::Milliliters => base_total,
    }
}

fn first_measure(canonical: &str) -> Option<(f64, MeasureUnit)> {
    measure_re().captures_iter(canonical).find_map(|caps| {
        let value: f64 = caps[1].parse().ok()?;
        if value <= 0.0 {
            return None;
        }
        let (scale, unit): (f64, MeasureUnit) = match &caps[2] {
            "kilogramos" | "kilogramo" | "kilos" | "kilo" | "kgs" | "kg" => (1000.0, MeasureUnit::Grams),
            "litros" | "litro" | "ltrs" | "ltr" | "lts" | "lt" | "l" => (1000.0, MeasureUnit::Milliliters),
            "mililitros" | "mililitro" | "mls" | "ml" | "cc" => (1.0, MeasureUnit::Milliliters),
            _ => (1.0, MeasureUnit::Grams),
        };
        Some((value * scale, unit))
    })
}

fn detect_quantity_in(canonical: &str) -> u32 {
    detect_quantity_with(canonical, None)
}

/// Multi-pack cues in priority order: pack phrasing, counted unit words, unit phrasing, bare `x`.
fn detect_quantity_with(canonical: &str, stage: Option<&str>) -> u32 {
    if let Some(qty) = first_accepted(canonical, pack_cue_re().captures_iter(canonical)) {
        return qty;
    }
    // "vital 3 bricks x 24" counts 24 bricks, not 3
    if let Some(qty) = first_accepted(canonical, count_x_re().captures_iter(canonical)) {
        return qty;
    }
    if let Some(qty) = first_accepted(canonical, units_phrase_re().captures_iter(canonical)) {
        return qty;
    }

    let is_stage = |caps: &Captures<'_>| -> bool {
        stage.is_some_and(|token| caps.get(1).is_some_and(|number| number.as_str() == token))
    };

    // "x 24" reads as a count; "3 x" is often the stage or a size in front of it
    for caps in x_before_re().captures_iter(canonical) {
        if is_stage(&caps) {
            continue;
        }
        if let Some(qty) = accept(canonical, &caps) {
            return qty;
        }
    }
    for caps in x_after_re().captures_iter(canonical) {
        let Some(whole) = caps.get(0) else { continue };
        // "3 xl" or "2 xtra": the x starts a word
        if canonical[whole.end()..].starts_with(|c: char| c.is_ascii_lowercase()) {
            continue;
        }
        if follows_stage_cue(canonical, whole.start()) || is_stage(&caps) {
            continue;
        }
        if let Some(qty) = accept(canonical, &caps) {
            return qty;
        }
    }

    1
}

fn first_accepted<'t>(canonical: &str, mut matches: impl Iterator<Item = Captures<'t>>) -> Option<u32> {
    matches.find_map(|caps| accept(canonical, &caps))
}

/// A captured number is a quantity when it is in range and not itself a measure.
fn accept(canonical: &str, caps: &Captures<'_>) -> Option<u32> {
    let number = caps.get(1)?;
    if unit_after_re().is_match(&canonical[number.end()..]) {
        return None;
    }
    let qty: u32 = number.as_str().parse().ok()?;
    (1..=MAX_PACK_QUANTITY).contains(&qty).then_some(qty)
}

fn follows_stage_cue(canonical: &str, start: usize) -> bool {
    canonical[..start]
        .split_whitespace()
        .next_back()
        .is_some_and(|word| STAGE_CUES.contains(&word))
}
