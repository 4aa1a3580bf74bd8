//! # Policy Configuration
//!
//! Every numeric threshold, weight and penalty used by the audit engine lives here.
//! They drifted across revisions of the rule set, so they are **data**, not code:
//! a deployment overrides any subset through a JSON policy file and the rest falls
//! back to [`Default`].

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Runtime options of the command line front end.
pub struct Config {
    /// Output verbosity: `0` prints everything, `1` only the summary, `2` nothing but errors.
    pub quiet: u8,
}

/// The complete tunable policy of the audit engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub matching: MatchPolicy,
    pub volumetric: VolumetricPolicy,
    pub compliance: CompliancePolicy,
    pub enforcement: EnforcementCodes,
}

/// Weights, debits and tier thresholds of the candidate matcher. All scores are on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    pub title_weight: f64,
    pub attribute_weight: f64,
    /// Debit when the declared brand is present but does not clearly match.
    pub brand_debit: f64,
    /// Debit when the declared content contradicts the catalog.
    pub volumetric_debit: f64,
    /// Debit when no content could be read at all.
    pub volumetric_undetermined_debit: f64,
    /// Debit when the catalog life stage is missing from the listing.
    pub stage_debit: f64,
    /// Title similarity under which a candidate is discarded...
    pub low_similarity_floor: f64,
    /// ...unless its combined score independently reaches this bar.
    pub independent_high_bar: f64,
    /// Title similarity required when no brand could be resolved for the listing.
    pub unbranded_similarity_floor: f64,
    pub strong_match_score: f64,
    pub weak_match_score: f64,
    /// Brand similarity at or above which two brands are the same.
    pub brand_match_similarity: f64,
    /// Brand similarity under which two non-overlapping brands are different.
    pub brand_reject_similarity: f64,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            title_weight: 0.4,
            attribute_weight: 0.6,
            brand_debit: 40.0,
            volumetric_debit: 60.0,
            volumetric_undetermined_debit: 15.0,
            stage_debit: 30.0,
            low_similarity_floor: 30.0,
            independent_high_bar: 85.0,
            unbranded_similarity_floor: 50.0,
            strong_match_score: 80.0,
            weak_match_score: 55.0,
            brand_match_similarity: 90.0,
            brand_reject_similarity: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumetricPolicy {
    /// Accepted relative deviation between detected and expected content.
    pub tolerance: f64,
    /// Kilograms per liter applied to volumes declared for liquid formulas.
    pub liquid_density: f64,
}

impl Default for VolumetricPolicy {
    fn default() -> Self {
        Self {
            tolerance: 0.15,
            liquid_density: 1.085,
        }
    }
}

/// Rule penalties, added to a fraud score capped at 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompliancePolicy {
    pub missing_ean_penalty: u8,
    pub brand_mismatch_penalty: u8,
    pub brand_similarity_threshold: f64,
    /// Penalty of volumetric and restricted-SKU violations.
    pub severe_penalty: u8,
    /// Penalty when the title carries a phrase blacklisted for the matched entry.
    pub forbidden_keyword_penalty: u8,
    /// Fraction of the minimum price an official store must respect to be trusted.
    pub official_store_price_floor: f64,
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self {
            missing_ean_penalty: 10,
            brand_mismatch_penalty: 20,
            brand_similarity_threshold: 90.0,
            severe_penalty: 60,
            forbidden_keyword_penalty: 30,
            official_store_price_floor: 0.8,
        }
    }
}

/// A reason as understood by the marketplace's enforcement channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonCode {
    pub code: String,
    pub text: String,
}

impl ReasonCode {
    fn new(code: &str, text: &str) -> Self {
        Self {
            code: code.to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnforcementCodes {
    pub low_price: ReasonCode,
    pub misleading_content: ReasonCode,
    pub restricted_sale: ReasonCode,
}

impl Default for EnforcementCodes {
    fn default() -> Self {
        Self {
            low_price: ReasonCode::new("703", "Precio significativamente inferior al sugerido"),
            misleading_content: ReasonCode::new("704", "Información engañosa sobre cantidad/volumen"),
            restricted_sale: ReasonCode::new("705", "Producto de venta restringida"),
        }
    }
}

impl Policy {
    /// Checks that every constant is inside its meaningful range.
    pub fn validate(&self) -> Result<(), EngineError> {
        let m: &MatchPolicy = &self.matching;

        if (m.title_weight + m.attribute_weight - 1.0).abs() > 1e-6 {
            return Err(invalid("title_weight + attribute_weight must equal 1"));
        }
        if m.title_weight < 0.0 || m.attribute_weight < 0.0 {
            return Err(invalid("matching weights must not be negative"));
        }

        let scores: [(&str, f64); 11] = [
            ("brand_debit", m.brand_debit),
            ("volumetric_debit", m.volumetric_debit),
            ("volumetric_undetermined_debit", m.volumetric_undetermined_debit),
            ("stage_debit", m.stage_debit),
            ("low_similarity_floor", m.low_similarity_floor),
            ("independent_high_bar", m.independent_high_bar),
            ("unbranded_similarity_floor", m.unbranded_similarity_floor),
            ("strong_match_score", m.strong_match_score),
            ("weak_match_score", m.weak_match_score),
            ("brand_match_similarity", m.brand_match_similarity),
            ("brand_reject_similarity", m.brand_reject_similarity),
        ];
        for (name, value) in scores {
            if !(0.0..=100.0).contains(&value) {
                return Err(invalid(&format!("{name} must be within 0..=100, got {value}")));
            }
        }

        if m.weak_match_score > m.strong_match_score {
            return Err(invalid("weak_match_score must not exceed strong_match_score"));
        }
        if m.brand_reject_similarity > m.brand_match_similarity {
            return Err(invalid("brand_reject_similarity must not exceed brand_match_similarity"));
        }

        let v: &VolumetricPolicy = &self.volumetric;
        if !(v.tolerance > 0.0 && v.tolerance < 1.0) {
            return Err(invalid("volumetric tolerance must be within (0, 1)"));
        }
        if v.liquid_density <= 0.0 {
            return Err(invalid("liquid_density must be positive"));
        }

        let c: &CompliancePolicy = &self.compliance;
        if !(0.0..=100.0).contains(&c.brand_similarity_threshold) {
            return Err(invalid("brand_similarity_threshold must be within 0..=100"));
        }
        if !(0.0..=1.0).contains(&c.official_store_price_floor) {
            return Err(invalid("official_store_price_floor must be within 0..=1"));
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> EngineError {
    EngineError::InvalidPolicy(msg.to_string())
}
