//! # Listguard Core
//!
//! The listing identification and compliance audit pipeline, leaves first:
//!
//! * **[`measures`]**: net content and pack quantity out of free text.
//! * **[`similarity`]**: 0-100 string similarity.
//! * **[`brand`]**: declared or implied brand of a listing.
//! * **[`volumetric`]**: declared content against the catalog expectation.
//! * **[`matcher`]**: which catalog entry a listing represents.
//! * **[`rules`]**: the compliance rules and the fraud score.
//! * **[`report`]**: the final audit report.
//! * **[`enforcement`]**: violation reason codes for the marketplace.
//!
//! [`AuditEngine`] ties them together over one immutable [`Catalog`] snapshot.

pub mod brand;
pub mod catalog;
pub mod enforcement;
pub mod engine;
pub mod matcher;
pub mod measures;
pub mod report;
pub mod rules;
pub mod similarity;
pub mod volumetric;

pub use catalog::Catalog;
pub use engine::{AuditEngine, NoiseReason};
pub use matcher::MatchResult;
