#![cfg(test)]
use listguard_common::models::{AuditReport, ConfidenceTier, Listing, RiskTier, ViolationDetail, ViolationKind};

use crate::fixtures::{branded, engine, listing};

fn audit(candidate: Listing) -> AuditReport {
    engine().audit(&candidate).unwrap()
}

#[test]
fn catalog_ean_wins_over_an_uninformative_title() {
    let report: AuditReport = audit(listing("Leche en polvo", 20000.0).with_ean("7791905001638"));

    assert_eq!(report.confidence, ConfidenceTier::ExactIdentifier);
    assert_eq!(report.catalog_id.as_deref(), Some("np4"));
    assert_eq!(report.match_level, 1);
    assert_eq!(report.match_score, 100.0);
}

#[test]
fn formatted_ean_still_identifies_the_entry() {
    let report: AuditReport = audit(listing("Nutrilon", 46000.0).with_ean("779-1905-00160-7"));
    assert_eq!(report.confidence, ConfidenceTier::ExactIdentifier);
    assert_eq!(report.catalog_id.as_deref(), Some("np1"));
}

#[test]
fn title_with_stage_and_content_is_a_strong_match() {
    let report: AuditReport = audit(listing("Nutrilon Profutura 1 800 Gr", 46000.0));

    assert_eq!(report.confidence, ConfidenceTier::StrongFuzzy);
    assert_eq!(report.catalog_id.as_deref(), Some("np1"));
    assert!(report.match_score > 95.0 && report.match_score < 96.0, "score {}", report.match_score);
}

#[test]
fn stage_selects_between_siblings() {
    let report: AuditReport = audit(listing("Nutrilon Profutura Etapa 3 X 800g", 39000.0));
    assert_eq!(report.catalog_id.as_deref(), Some("np3"));
    assert_eq!(report.detected.quantity, 1);
    assert_eq!(report.fraud_score, 10);
}

#[test]
fn stage_number_before_x_is_not_a_pack() {
    let report: AuditReport = audit(listing("Nutrilon Profutura 3 X 800 Gr", 39000.0));

    assert_eq!(report.confidence, ConfidenceTier::StrongFuzzy);
    assert_eq!(report.catalog_id.as_deref(), Some("np3"));
    assert_eq!(report.detected.quantity, 1);
    assert_eq!(report.fraud_score, 10);
    assert!(report.price_ok);
}

#[test]
fn unit_word_count_is_the_pack_quantity() {
    let report: AuditReport = audit(listing("Vital 3 Bricks x 24 x 200 ml Pack", 53000.0));

    assert_eq!(report.confidence, ConfidenceTier::StrongFuzzy);
    assert_eq!(report.catalog_id.as_deref(), Some("v3-24"));
    assert_eq!(report.detected.quantity, 24);
    assert_eq!(report.fraud_score, 10);
}

#[test]
fn declared_house_brand_matches_any_catalog_brand() {
    let report: AuditReport = audit(branded("Nutrilon Profutura 4 800g", 36000.0, "Nutricia"));
    assert_eq!(report.catalog_id.as_deref(), Some("np4"));
    assert!(report.brand_ok);
    assert_eq!(report.fraud_score, 10);
}

#[test]
fn conflicting_declared_brand_is_not_identified() {
    let report: AuditReport = audit(branded("Fortini 400 g", 9500.0, "Fortimel"));
    assert_eq!(report.confidence, ConfidenceTier::Unmatched);
    assert_eq!(report.catalog_id, None);
    assert_eq!(report.fraud_score, 0);
}

#[test]
fn misspelled_declared_brand_is_suspicious() {
    let report: AuditReport = audit(branded("Fortini 400 g", 9500.0, "Fortinni"));

    assert_eq!(report.confidence, ConfidenceTier::Suspicious);
    assert_eq!(report.catalog_id.as_deref(), Some("fortini-400"));
    assert!((report.match_score - 76.0).abs() < 1e-6);
    assert_eq!(report.fraud_score, 30);
    assert_eq!(report.risk_tier, RiskTier::Medium);
    match report.violation_details.get(ViolationKind::BrandMismatch) {
        Some(ViolationDetail::BrandMismatch { similarity, .. }) => assert!((similarity - 87.5).abs() < 1e-6),
        other => panic!("expected a brand mismatch, got {other:?}"),
    }
}

#[test]
fn unrelated_listings_score_zero() {
    for title in [
        "Vitalcan Balanced Perro Adulto 20kg",
        "Libro Nutrilon Guia",
        "Leche De Bebe Etapa 1 X 800g",
        "Jebao Dmp40 Bomba Recirculacion",
    ] {
        let report: AuditReport = audit(listing(title, 40000.0));
        assert_eq!(report.confidence, ConfidenceTier::Unmatched, "{title}");
        assert_eq!(report.fraud_score, 0, "{title}");
        assert_eq!(report.risk_tier, RiskTier::Low, "{title}");
        assert!(report.violation_details.is_empty(), "{title}");
    }
}
