//! # Volumetric Validator
//!
//! Cross-checks the content a listing declares against what the catalog says the
//! matched entry should contain:
//!
//! 1. **Quantity**: the structured units-per-pack attribute, or the title's pack
//!    phrasing when the attribute is missing or says `1` and the title says more.
//! 2. **Content**: the structured net-content attribute, read either as the content
//!    of one unit or of the whole pack (whichever lands closer to the catalog), or
//!    else the first measure of the title.
//! 3. **Verdict**: inside the tolerance band is a match, on or outside is a
//!    mismatch, and nothing readable is *undetermined*.

use listguard_common::config::VolumetricPolicy;
use listguard_common::models::{CatalogEntry, Listing, Substance};

use crate::catalog::stage_token;
use crate::measures::{self, MAX_PACK_QUANTITY, MeasureUnit};

/// Absorbs floating point error so a value on the tolerance boundary is a mismatch.
const BOUNDARY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeStatus {
    Match,
    Mismatch,
    /// No content could be read from the listing.
    Undetermined,
    /// The catalog entry declares no net content.
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumetricCheck {
    pub status: VolumeStatus,
    pub detected_total_kg: f64,
    /// Units the listing claims to contain.
    pub detected_quantity: u32,
    /// Catalog entries the listing amounts to.
    pub catalog_units: u32,
    /// `fc_net x catalog_units`, `0.0` without a declared net content.
    pub expected_total_kg: f64,
}

impl VolumetricCheck {
    /// Passing or inapplicable. An undetermined volume does not pass.
    pub fn matches(&self) -> bool {
        matches!(self.status, VolumeStatus::Match | VolumeStatus::NotApplicable)
    }

    pub fn is_mismatch(&self) -> bool {
        self.status == VolumeStatus::Mismatch
    }

    pub fn is_undetermined(&self) -> bool {
        self.status == VolumeStatus::Undetermined
    }
}

/// How many catalog entries a listing of `detected_quantity` units represents.
///
/// A multi-pack entry of 24 units sold as "24 bricks" is one entry, as is any
/// partial pack of it.
pub fn catalog_units(detected_quantity: u32, units_per_pack: u32) -> u32 {
    if units_per_pack > 1 {
        (detected_quantity / units_per_pack).max(1)
    } else {
        detected_quantity.max(1)
    }
}

/// Validates the declared content of `listing` against `entry`.
pub fn validate(listing: &Listing, entry: &CatalogEntry, policy: &VolumetricPolicy) -> VolumetricCheck {
    let hint: Substance = entry.substance.or(listing
        .attributes
        .substance
        .as_deref()
        .map_or(Substance::Unknown, |s| Substance::from(s.to_string())));

    let quantity: u32 = detect_quantity(listing, entry);
    let units: u32 = catalog_units(quantity, entry.units_per_pack);
    let expected: f64 = entry.declared_net().map_or(0.0, |net| net * f64::from(units));

    let detected: f64 = detect_total_kg(listing, quantity, expected, hint, policy.liquid_density);

    let status: VolumeStatus = if expected <= 0.0 {
        VolumeStatus::NotApplicable
    } else if detected <= 0.0 {
        VolumeStatus::Undetermined
    } else if (detected - expected).abs() < policy.tolerance * expected - BOUNDARY_EPSILON {
        VolumeStatus::Match
    } else {
        VolumeStatus::Mismatch
    };

    VolumetricCheck {
        status,
        detected_total_kg: detected,
        detected_quantity: quantity,
        catalog_units: units,
        expected_total_kg: expected,
    }
}

/// Structured quantity first; a missing or `1` quantity defers to a larger title quantity.
fn detect_quantity(listing: &Listing, entry: &CatalogEntry) -> u32 {
    let structured: Option<u32> = listing.attributes.units_per_pack.as_deref().and_then(parse_count);
    match structured {
        Some(qty) if qty > 1 => qty,
        _ => {
            let stage: Option<String> = entry.stage.as_deref().and_then(stage_token);
            measures::detect_quantity_for_stage(&listing.title, stage.as_deref()).max(1)
        }
    }
}

/// First plain number of an attribute value (`"24"`, `"24 unidades"`), if plausible.
fn parse_count(value: &str) -> Option<u32> {
    let canonical: String = measures::measure_text(value);
    let qty: u32 = canonical
        .split_whitespace()
        .find(|token| token.chars().all(|c| c.is_ascii_digit()))?
        .parse()
        .ok()?;
    (1..=MAX_PACK_QUANTITY).contains(&qty).then_some(qty)
}

fn detect_total_kg(listing: &Listing, quantity: u32, expected: f64, hint: Substance, density: f64) -> f64 {
    let from_attribute: Option<(f64, MeasureUnit)> =
        listing.attributes.net_content.as_deref().and_then(measures::parse_measure);

    if let Some((value, unit)) = from_attribute {
        let per_unit: f64 = measures::total_mass_kg(value, unit, quantity, hint, density);
        let whole_pack: f64 = measures::total_mass_kg(value, unit, 1, hint, density);
        if expected > 0.0 && (whole_pack - expected).abs() < (per_unit - expected).abs() {
            return whole_pack;
        }
        return per_unit;
    }

    match measures::parse_measure(&listing.title) {
        Some((value, unit)) => measures::total_mass_kg(value, unit, quantity, hint, density),
        None => 0.0,
    }
}
