use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// How the matcher arrived at its candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// The listing EAN equals the catalog EAN.
    ExactIdentifier,
    StrongFuzzy,
    Suspicious,
    Unmatched,
}

impl ConfidenceTier {
    /// Numeric code persisted alongside audits: 0 unmatched, 1 EAN, 2 fuzzy, 3 suspicious.
    pub fn level(self) -> u8 {
        match self {
            ConfidenceTier::Unmatched => 0,
            ConfidenceTier::ExactIdentifier => 1,
            ConfidenceTier::StrongFuzzy => 2,
            ConfidenceTier::Suspicious => 3,
        }
    }

    pub fn is_matched(self) -> bool {
        !matches!(self, ConfidenceTier::Unmatched)
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label: &str = match self {
            ConfidenceTier::ExactIdentifier => "EAN",
            ConfidenceTier::StrongFuzzy => "Fuzzy",
            ConfidenceTier::Suspicious => "Suspicious",
            ConfidenceTier::Unmatched => "Unidentified",
        };
        f.write_str(label)
    }
}

/// Triage bucket of a fraud score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RiskTier {
    #[serde(rename = "Bajo")]
    Low,
    #[serde(rename = "Medio")]
    Medium,
    #[serde(rename = "Alto")]
    High,
}

impl RiskTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            60.. => RiskTier::High,
            30.. => RiskTier::Medium,
            _ => RiskTier::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Bajo",
            RiskTier::Medium => "Medio",
            RiskTier::High => "Alto",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Name of a compliance finding; the key of [`ViolationDetails`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingEan,
    BrandMismatch,
    LowPrice,
    PriceUndetermined,
    UnauthorizedDiscount,
    VolumetricMismatch,
    VolumeUndetermined,
    RestrictedSkuViolation,
    ForbiddenKeywords,
    TrustedOfficialStore,
}

impl ViolationKind {
    /// The snake_case name used in serialized reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::MissingEan => "missing_ean",
            ViolationKind::BrandMismatch => "brand_mismatch",
            ViolationKind::LowPrice => "low_price",
            ViolationKind::PriceUndetermined => "price_undetermined",
            ViolationKind::UnauthorizedDiscount => "unauthorized_discount",
            ViolationKind::VolumetricMismatch => "volumetric_mismatch",
            ViolationKind::VolumeUndetermined => "volume_undetermined",
            ViolationKind::RestrictedSkuViolation => "restricted_sku_violation",
            ViolationKind::ForbiddenKeywords => "forbidden_keywords",
            ViolationKind::TrustedOfficialStore => "trusted_official_store",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explanation payload recorded when a rule fires.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ViolationDetail {
    MissingEan,
    BrandMismatch {
        expected: String,
        found: String,
        similarity: f64,
    },
    LowPrice {
        min_allowed: f64,
        actual_unit_price: f64,
        diff: f64,
        listing_price: f64,
        /// Units the listing claims to contain.
        detected_qty: u32,
        /// Catalog entries the price was divided by.
        catalog_units: u32,
    },
    PriceUndetermined {
        listing_price: f64,
    },
    UnauthorizedDiscount,
    VolumetricMismatch {
        expected_kg: f64,
        detected_kg: f64,
        expected_qty: u32,
        detected_qty: u32,
    },
    VolumeUndetermined {
        detected_qty: u32,
    },
    RestrictedSkuViolation {
        catalog_id: String,
    },
    ForbiddenKeywords {
        found_keywords: Vec<String>,
    },
    TrustedOfficialStore {
        overridden_score: u8,
        unit_price: f64,
        price_floor: f64,
    },
}

impl ViolationDetail {
    pub fn kind(&self) -> ViolationKind {
        match self {
            ViolationDetail::MissingEan => ViolationKind::MissingEan,
            ViolationDetail::BrandMismatch { .. } => ViolationKind::BrandMismatch,
            ViolationDetail::LowPrice { .. } => ViolationKind::LowPrice,
            ViolationDetail::PriceUndetermined { .. } => ViolationKind::PriceUndetermined,
            ViolationDetail::UnauthorizedDiscount => ViolationKind::UnauthorizedDiscount,
            ViolationDetail::VolumetricMismatch { .. } => ViolationKind::VolumetricMismatch,
            ViolationDetail::VolumeUndetermined { .. } => ViolationKind::VolumeUndetermined,
            ViolationDetail::RestrictedSkuViolation { .. } => ViolationKind::RestrictedSkuViolation,
            ViolationDetail::ForbiddenKeywords { .. } => ViolationKind::ForbiddenKeywords,
            ViolationDetail::TrustedOfficialStore { .. } => ViolationKind::TrustedOfficialStore,
        }
    }
}

/// Ordered map of rule name to explanation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViolationDetails(BTreeMap<ViolationKind, ViolationDetail>);

impl ViolationDetails {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `detail`, replacing an earlier finding of the same kind.
    pub fn insert(&mut self, detail: ViolationDetail) {
        self.0.insert(detail.kind(), detail);
    }

    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn get(&self, kind: ViolationKind) -> Option<&ViolationDetail> {
        self.0.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ViolationKind> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViolationDetail> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Audited field of the field-level breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditField {
    Ean,
    Brand,
    Price,
    Discount,
    Volume,
    Quantity,
    Publishable,
    Keywords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Approved,
    Rejected,
    Warning,
    #[serde(rename = "n/a")]
    NotApplicable,
}

/// Listing value against catalog value for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCheck {
    pub field: AuditField,
    pub listing: String,
    pub catalog: String,
    pub status: FieldStatus,
    pub score_impact: u8,
}

/// What the engine read out of the listing, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedSummary {
    pub brand: Option<String>,
    pub total_mass_kg: f64,
    pub quantity: u32,
    /// `"1.60 kg"`, or `"undetermined"` when nothing could be read.
    pub volume: String,
}

impl DetectedSummary {
    pub fn new(brand: Option<String>, total_mass_kg: f64, quantity: u32) -> Self {
        let volume: String = if total_mass_kg > 0.0 {
            format!("{total_mass_kg:.2} kg")
        } else {
            String::from("undetermined")
        };
        Self {
            brand,
            total_mass_kg,
            quantity,
            volume,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "brand: {} | volume: {} | qty: {}",
            self.brand.as_deref().unwrap_or("not detected"),
            self.volume,
            self.quantity
        )
    }
}

/// The audit of one listing. The sole output of the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub catalog_id: Option<String>,
    pub confidence: ConfidenceTier,
    pub match_level: u8,
    pub match_score: f64,
    pub fraud_score: u8,
    pub risk_tier: RiskTier,
    pub violation_details: ViolationDetails,
    pub price_ok: bool,
    pub brand_ok: bool,
    pub publishable_ok: bool,
    pub detected: DetectedSummary,
    pub fields: Vec<FieldCheck>,
}

impl AuditReport {
    pub fn is_matched(&self) -> bool {
        self.confidence.is_matched()
    }

    pub fn field(&self, field: AuditField) -> Option<&FieldCheck> {
        self.fields.iter().find(|check| check.field == field)
    }
}
