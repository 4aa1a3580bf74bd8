use std::sync::OnceLock;

use listguard_common::config::Policy;
use listguard_common::models::{CatalogEntry, Listing, ListingAttributes};
use listguard_common::vocabulary::Vocabulary;
use listguard_core::AuditEngine;

const CATALOG: &str = include_str!("../../data/catalog.sample.json");
const VOCABULARY: &str = include_str!("../../data/vocabulary.json");
const POLICY: &str = include_str!("../../data/policy.json");
pub const LISTINGS: &str = include_str!("../../data/listings.sample.json");

static ENGINE: OnceLock<AuditEngine> = OnceLock::new();

pub fn catalog() -> Vec<CatalogEntry> {
    serde_json::from_str(CATALOG).expect("sample catalog is valid JSON")
}

pub fn vocabulary() -> Vocabulary {
    serde_json::from_str(VOCABULARY).expect("bundled vocabulary is valid JSON")
}

pub fn policy() -> Policy {
    serde_json::from_str(POLICY).expect("bundled policy is valid JSON")
}

pub fn sample_listings() -> Vec<Listing> {
    serde_json::from_str(LISTINGS).expect("sample listings are valid JSON")
}

/// The shared engine over the sample catalog.
pub fn engine() -> &'static AuditEngine {
    ENGINE.get_or_init(|| engine_with(policy()))
}

pub fn engine_with(policy: Policy) -> AuditEngine {
    AuditEngine::new(catalog(), vocabulary(), policy).expect("sample catalog builds an engine")
}

pub fn listing(title: &str, price: f64) -> Listing {
    Listing::new(title, price)
}

pub fn branded(title: &str, price: f64, brand: &str) -> Listing {
    Listing::new(title, price).with_attributes(ListingAttributes {
        brand: Some(brand.to_string()),
        ..ListingAttributes::default()
    })
}

pub fn official(title: &str, price: f64) -> Listing {
    Listing::new(title, price).with_attributes(ListingAttributes {
        official_store: true,
        seller_name: Some("Nutricia Tienda Oficial".to_string()),
        ..ListingAttributes::default()
    })
}
