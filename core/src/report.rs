//! # Audit Report Assembler
//!
//! Composes the match and the rule outcome into the [`AuditReport`] handed back to
//! the caller. No decisions are taken here.

use listguard_common::config::Policy;
use listguard_common::models::{
    AuditField, AuditReport, CatalogEntry, ConfidenceTier, DetectedSummary, FieldCheck, FieldStatus, Listing,
    RiskTier, Substance, ViolationDetail, ViolationKind,
};

use crate::matcher::MatchResult;
use crate::measures::{self, Measures};
use crate::rules::RuleOutcome;
use crate::volumetric::{VolumeStatus, VolumetricCheck};

const NONE: &str = "-";

/// Builds the report of a listing from its match and rule outcome.
pub fn assemble(listing: &Listing, matched: &MatchResult<'_>, outcome: RuleOutcome, policy: &Policy) -> AuditReport {
    let Some(entry) = matched.entry else {
        return unmatched(listing, matched, policy);
    };

    let detected: DetectedSummary = match matched.volumetric {
        Some(check) => DetectedSummary::new(brand_name(matched), check.detected_total_kg, check.detected_quantity),
        None => DetectedSummary::new(brand_name(matched), 0.0, 1),
    };
    let fields: Vec<FieldCheck> = field_checks(listing, entry, matched, &outcome);

    AuditReport {
        catalog_id: Some(entry.id.clone()),
        confidence: matched.tier,
        match_level: matched.tier.level(),
        match_score: matched.score,
        fraud_score: outcome.score,
        risk_tier: RiskTier::from_score(outcome.score),
        violation_details: outcome.details,
        price_ok: outcome.price_ok,
        brand_ok: outcome.brand_ok,
        publishable_ok: outcome.publishable_ok,
        detected,
        fields,
    }
}

/// The zero-score report of a listing that represents no catalog product.
fn unmatched(listing: &Listing, matched: &MatchResult<'_>, policy: &Policy) -> AuditReport {
    let hint: Substance = listing
        .attributes
        .substance
        .as_deref()
        .map_or(Substance::Unknown, |s| Substance::from(s.to_string()));
    let measures: Measures =
        measures::extract_measures_with_density(&listing.title, hint, policy.volumetric.liquid_density);

    AuditReport {
        catalog_id: None,
        confidence: ConfidenceTier::Unmatched,
        match_level: ConfidenceTier::Unmatched.level(),
        match_score: matched.score,
        fraud_score: 0,
        risk_tier: RiskTier::Low,
        violation_details: Default::default(),
        price_ok: true,
        brand_ok: true,
        publishable_ok: true,
        detected: DetectedSummary::new(brand_name(matched), measures.total_mass_kg, measures.quantity),
        fields: Vec::new(),
    }
}

fn brand_name(matched: &MatchResult<'_>) -> Option<String> {
    matched.brand.as_ref().map(|brand| brand.name.clone())
}

fn field_checks(listing: &Listing, entry: &CatalogEntry, matched: &MatchResult<'_>, outcome: &RuleOutcome) -> Vec<FieldCheck> {
    let impact = |field: AuditField| -> u8 { outcome.impacts.get(&field).copied().unwrap_or(0) };
    let mut fields: Vec<FieldCheck> = Vec::with_capacity(8);

    let listing_ean: Option<String> = listguard_common::models::normalize_ean(listing.ean.as_deref());
    let catalog_ean: Option<String> = entry.normalized_ean();
    let ean_status: FieldStatus = if matched.tier == ConfidenceTier::ExactIdentifier {
        FieldStatus::Approved
    } else if catalog_ean.is_none() && listing_ean.is_some() {
        FieldStatus::NotApplicable
    } else {
        FieldStatus::Warning
    };
    fields.push(FieldCheck {
        field: AuditField::Ean,
        listing: listing_ean.unwrap_or_else(|| NONE.to_string()),
        catalog: catalog_ean.unwrap_or_else(|| NONE.to_string()),
        status: ean_status,
        score_impact: impact(AuditField::Ean),
    });

    let brand_status: FieldStatus = match &matched.brand {
        None => FieldStatus::Warning,
        Some(_) if outcome.details.contains(ViolationKind::BrandMismatch) => FieldStatus::Rejected,
        Some(_) => FieldStatus::Approved,
    };
    fields.push(FieldCheck {
        field: AuditField::Brand,
        listing: brand_name(matched).unwrap_or_else(|| NONE.to_string()),
        catalog: entry.brand.clone(),
        status: brand_status,
        score_impact: impact(AuditField::Brand),
    });

    let price_status: FieldStatus = if outcome.details.contains(ViolationKind::LowPrice) {
        FieldStatus::Rejected
    } else if outcome.details.contains(ViolationKind::PriceUndetermined) {
        FieldStatus::Warning
    } else if entry.minimum_price().is_none() {
        FieldStatus::NotApplicable
    } else {
        FieldStatus::Approved
    };
    fields.push(FieldCheck {
        field: AuditField::Price,
        listing: outcome.unit_price.map_or_else(|| NONE.to_string(), |price| format!("{price:.2}")),
        catalog: entry.minimum_price().map_or_else(|| NONE.to_string(), |price| format!("{price:.2}")),
        status: price_status,
        score_impact: impact(AuditField::Price),
    });

    fields.push(discount_check(entry, outcome));

    if let Some(check) = matched.volumetric {
        fields.push(volume_check(&check, impact(AuditField::Volume)));
        fields.push(quantity_check(&check, entry));
    }

    fields.push(FieldCheck {
        field: AuditField::Publishable,
        listing: String::from("listed"),
        catalog: String::from(if entry.publishable { "publishable" } else { "restricted" }),
        status: if entry.publishable {
            FieldStatus::Approved
        } else {
            FieldStatus::Rejected
        },
        score_impact: impact(AuditField::Publishable),
    });

    if !entry.blacklist_keywords.is_empty() {
        fields.push(keywords_check(entry, outcome, impact(AuditField::Keywords)));
    }

    fields
}

/// Discounts only matter on entries whose price may not be lowered.
fn discount_check(entry: &CatalogEntry, outcome: &RuleOutcome) -> FieldCheck {
    let discounted: bool = outcome.details.contains(ViolationKind::LowPrice);
    let status: FieldStatus = if outcome.details.contains(ViolationKind::UnauthorizedDiscount) {
        FieldStatus::Rejected
    } else if entry.discount_allowed {
        FieldStatus::NotApplicable
    } else {
        FieldStatus::Approved
    };
    FieldCheck {
        field: AuditField::Discount,
        listing: String::from(if discounted { "discounted" } else { "full price" }),
        catalog: String::from(if entry.discount_allowed { "allowed" } else { "not allowed" }),
        status,
        score_impact: 0,
    }
}

fn keywords_check(entry: &CatalogEntry, outcome: &RuleOutcome, score_impact: u8) -> FieldCheck {
    let found: Option<&Vec<String>> = match outcome.details.get(ViolationKind::ForbiddenKeywords) {
        Some(ViolationDetail::ForbiddenKeywords { found_keywords }) => Some(found_keywords),
        _ => None,
    };
    FieldCheck {
        field: AuditField::Keywords,
        listing: found.map_or_else(|| NONE.to_string(), |words| words.join(", ")),
        catalog: entry.blacklist_keywords.join(", "),
        status: if found.is_some() {
            FieldStatus::Rejected
        } else {
            FieldStatus::Approved
        },
        score_impact,
    }
}

fn volume_check(check: &VolumetricCheck, score_impact: u8) -> FieldCheck {
    let status: FieldStatus = match check.status {
        VolumeStatus::Match => FieldStatus::Approved,
        VolumeStatus::Mismatch => FieldStatus::Rejected,
        VolumeStatus::Undetermined => FieldStatus::Warning,
        VolumeStatus::NotApplicable => FieldStatus::NotApplicable,
    };
    FieldCheck {
        field: AuditField::Volume,
        listing: kilograms(check.detected_total_kg),
        catalog: kilograms(check.expected_total_kg),
        status,
        score_impact,
    }
}

fn quantity_check(check: &VolumetricCheck, entry: &CatalogEntry) -> FieldCheck {
    let status: FieldStatus = if check.detected_quantity % entry.units_per_pack == 0 {
        FieldStatus::Approved
    } else {
        FieldStatus::Warning
    };
    FieldCheck {
        field: AuditField::Quantity,
        listing: check.detected_quantity.to_string(),
        catalog: entry.units_per_pack.to_string(),
        status,
        score_impact: 0,
    }
}

fn kilograms(value: f64) -> String {
    if value > 0.0 {
        format!("{value:.3} kg")
    } else {
        NONE.to_string()
    }
}
