//! Reads the JSON inputs of the command line into engine types.

use std::fs;
use std::path::Path;

use anyhow::Context;
use listguard_common::config::Policy;
use listguard_common::models::{CatalogEntry, Listing};
use listguard_common::vocabulary::Vocabulary;
use listguard_core::AuditEngine;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::commands::Inputs;

/// A listing as harvested, with the marketplace identifier next to its fields.
#[derive(Debug, Deserialize)]
pub struct ListingRecord {
    #[serde(default, alias = "listing_id")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub listing: Listing,
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let raw: String = fs::read_to_string(path).with_context(|| format!("cannot read {what} file {}", path.display()))?;
    let value: T =
        serde_json::from_str(&raw).with_context(|| format!("malformed {what} file {}", path.display()))?;
    debug!("loaded {what} from {}", path.display());
    Ok(value)
}

pub fn load_catalog(path: &Path) -> anyhow::Result<Vec<CatalogEntry>> {
    read_json(path, "catalog")
}

pub fn load_vocabulary(path: &Path) -> anyhow::Result<Vocabulary> {
    read_json(path, "vocabulary")
}

pub fn load_policy(path: Option<&Path>) -> anyhow::Result<Policy> {
    match path {
        Some(path) => read_json(path, "policy"),
        None => Ok(Policy::default()),
    }
}

/// Listings with their identifiers; unnamed listings are called by their position.
pub fn load_listings(path: &Path) -> anyhow::Result<(Vec<String>, Vec<Listing>)> {
    let records: Vec<ListingRecord> = read_json(path, "listings")?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| (record.id.unwrap_or_else(|| format!("#{idx}")), record.listing))
        .unzip())
}

pub fn build_engine(inputs: &Inputs) -> anyhow::Result<AuditEngine> {
    let entries: Vec<CatalogEntry> = load_catalog(&inputs.catalog)?;
    let vocabulary: Vocabulary = load_vocabulary(&inputs.vocabulary)?;
    let policy: Policy = load_policy(inputs.policy.as_deref())?;
    AuditEngine::new(entries, vocabulary, policy).context("cannot build the audit engine")
}
