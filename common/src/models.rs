//! Typed records exchanged between the engine and its collaborators.

pub mod catalog;
pub mod listing;
pub mod report;

pub use catalog::{CatalogEntry, Substance, normalize_ean};
pub use listing::{Listing, ListingAttributes};
pub use report::{
    AuditField, AuditReport, ConfidenceTier, DetectedSummary, FieldCheck, FieldStatus, RiskTier,
    ViolationDetail, ViolationDetails, ViolationKind,
};
