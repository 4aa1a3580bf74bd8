//! # Listguard Common
//!
//! Shared vocabulary of the listing audit workspace: the typed records, the text
//! normalizer, the injected word lists and the tunable policy.
//!
//! * **[`models`]**: catalog entries, listings and audit reports.
//! * **[`text`]**: canonical form of free text.
//! * **[`vocabulary`]**: brand, exclusion and house-brand word lists.
//! * **[`config`]**: policy thresholds and runtime options.
//! * **[`error`]**: contract violations.

pub mod config;
pub mod error;
pub mod models;
pub mod text;
pub mod vocabulary;
