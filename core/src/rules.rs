//! # Compliance Rule Evaluator
//!
//! Applies the rules to a matched listing, in order:
//!
//! | Rule | Fires when | Effect |
//! |---|---|---|
//! | **R1** EAN presence | no EAN and not matched by EAN | minor penalty |
//! | **R2** Brand integrity | brand similarity under threshold | penalty, expected vs found |
//! | **R3** Price | unit price under the minimum | score to the cap |
//! | **R4** Volumetric | content contradicts the catalog | severe penalty |
//! | **R5** Restricted SKU | entry not publishable | severe penalty |
//! | **R5b** Forbidden keywords | title carries a phrase blacklisted for the entry | keyword penalty |
//! | **R6** Trust override | official store near the minimum | score back to zero |
//!
//! The score is capped at 100 after every rule. Heuristic uncertainty (unreadable
//! content, no price) is recorded as a detail with no penalty.

use std::collections::BTreeMap;

use listguard_common::config::{CompliancePolicy, Policy};
use listguard_common::models::{
    AuditField, CatalogEntry, ConfidenceTier, Listing, ViolationDetail, ViolationDetails, normalize_ean,
};
use listguard_common::text::{self, contains_phrase};

use crate::matcher::MatchResult;
use crate::similarity::ratio;

const MAX_SCORE: u8 = 100;

/// Result of the rule set on one matched listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub score: u8,
    pub details: ViolationDetails,
    pub price_ok: bool,
    pub brand_ok: bool,
    pub publishable_ok: bool,
    /// Points each audited field added to the score.
    pub impacts: BTreeMap<AuditField, u8>,
    /// Listing price per catalog unit, when a price was declared.
    pub unit_price: Option<f64>,
}

impl RuleOutcome {
    fn clean() -> Self {
        Self {
            score: 0,
            details: ViolationDetails::new(),
            price_ok: true,
            brand_ok: true,
            publishable_ok: true,
            impacts: BTreeMap::new(),
            unit_price: None,
        }
    }

    fn penalize(&mut self, field: AuditField, points: u8) {
        let before: u8 = self.score;
        self.score = self.score.saturating_add(points).min(MAX_SCORE);
        *self.impacts.entry(field).or_insert(0) += self.score - before;
    }
}

/// Evaluates every rule for `listing` against its match. Unmatched listings come out clean.
pub fn evaluate(listing: &Listing, matched: &MatchResult<'_>, policy: &Policy) -> RuleOutcome {
    let mut outcome: RuleOutcome = RuleOutcome::clean();
    let Some(entry) = matched.entry else {
        return outcome;
    };
    let c: &CompliancePolicy = &policy.compliance;

    // R1
    if matched.tier != ConfidenceTier::ExactIdentifier && normalize_ean(listing.ean.as_deref()).is_none() {
        outcome.details.insert(ViolationDetail::MissingEan);
        outcome.penalize(AuditField::Ean, c.missing_ean_penalty);
    }

    // R2
    if let Some(brand) = matched.brand.as_ref().filter(|brand| !brand.house) {
        let expected: String = text::normalize(&entry.brand);
        let similarity: f64 = brand_similarity(&brand.normalized, &expected);
        if similarity < c.brand_similarity_threshold {
            outcome.brand_ok = false;
            outcome.details.insert(ViolationDetail::BrandMismatch {
                expected: entry.brand.clone(),
                found: brand.name.clone(),
                similarity,
            });
            outcome.penalize(AuditField::Brand, c.brand_mismatch_penalty);
        }
    }

    // R3
    let detected_qty: u32 = matched.volumetric.map_or(1, |check| check.detected_quantity);
    let units: u32 = matched.volumetric.map_or(1, |check| check.catalog_units).max(1);
    let unit_price: Option<f64> = (listing.price > 0.0).then(|| listing.price / f64::from(units));
    outcome.unit_price = unit_price;
    check_price(&mut outcome, entry, listing.price, unit_price, detected_qty, units);

    // R4
    if let Some(check) = matched.volumetric {
        if check.is_mismatch() {
            outcome.details.insert(ViolationDetail::VolumetricMismatch {
                expected_kg: check.expected_total_kg,
                detected_kg: check.detected_total_kg,
                expected_qty: check.catalog_units * entry.units_per_pack,
                detected_qty,
            });
            outcome.penalize(AuditField::Volume, c.severe_penalty);
        } else if check.is_undetermined() {
            outcome.details.insert(ViolationDetail::VolumeUndetermined { detected_qty });
        }
    }

    // R5
    if !entry.publishable {
        outcome.publishable_ok = false;
        outcome.details.insert(ViolationDetail::RestrictedSkuViolation {
            catalog_id: entry.id.clone(),
        });
        outcome.penalize(AuditField::Publishable, c.severe_penalty);
    }

    // R5b
    let found_keywords: Vec<String> = forbidden_keywords(&listing.title, entry);
    if !found_keywords.is_empty() {
        outcome.details.insert(ViolationDetail::ForbiddenKeywords { found_keywords });
        outcome.penalize(AuditField::Keywords, c.forbidden_keyword_penalty);
    }

    // R6
    if listing.attributes.official_store {
        apply_trust_override(&mut outcome, entry, unit_price, c);
    }

    outcome
}

/// Whole-word containment counts as a full match; otherwise edit similarity.
fn brand_similarity(found: &str, expected: &str) -> f64 {
    if contains_phrase(found, expected) || contains_phrase(expected, found) {
        100.0
    } else {
        ratio(found, expected)
    }
}

/// Blacklisted phrases of `entry` found as whole words in `title`, as the catalog spells them.
pub fn forbidden_keywords(title: &str, entry: &CatalogEntry) -> Vec<String> {
    if entry.blacklist_keywords.is_empty() {
        return Vec::new();
    }
    let title: String = text::normalize(title);
    entry
        .blacklist_keywords
        .iter()
        .filter(|keyword| {
            let keyword: String = text::normalize(keyword);
            !keyword.is_empty() && contains_phrase(&title, &keyword)
        })
        .cloned()
        .collect()
}

fn check_price(
    outcome: &mut RuleOutcome,
    entry: &CatalogEntry,
    listing_price: f64,
    unit_price: Option<f64>,
    detected_qty: u32,
    units: u32,
) {
    let Some(unit_price) = unit_price else {
        outcome.price_ok = false;
        outcome.details.insert(ViolationDetail::PriceUndetermined { listing_price });
        return;
    };
    let Some(minimum) = entry.minimum_price() else {
        return;
    };
    if unit_price >= minimum {
        return;
    }

    outcome.price_ok = false;
    outcome.details.insert(ViolationDetail::LowPrice {
        min_allowed: minimum,
        actual_unit_price: unit_price,
        diff: minimum - unit_price,
        listing_price,
        detected_qty,
        catalog_units: units,
    });
    if !entry.discount_allowed {
        outcome.details.insert(ViolationDetail::UnauthorizedDiscount);
    }
    outcome.penalize(AuditField::Price, MAX_SCORE);
}

fn apply_trust_override(
    outcome: &mut RuleOutcome,
    entry: &CatalogEntry,
    unit_price: Option<f64>,
    c: &CompliancePolicy,
) {
    let price_floor: f64 = entry.minimum_price().map_or(0.0, |min| min * c.official_store_price_floor);
    let unit_price: f64 = unit_price.unwrap_or(0.0);
    if entry.minimum_price().is_some() && unit_price < price_floor {
        return;
    }

    outcome.details.insert(ViolationDetail::TrustedOfficialStore {
        overridden_score: outcome.score,
        unit_price,
        price_floor,
    });
    outcome.score = 0;
    outcome.impacts.clear();
}
