#![cfg(test)]
use listguard_common::config::Policy;
use listguard_common::models::{
    AuditField, AuditReport, FieldCheck, FieldStatus, RiskTier, ViolationDetail, ViolationKind,
};

use crate::fixtures::{branded, engine, engine_with, listing, official};

#[test]
fn fuzzy_match_without_ean_costs_ten_points() {
    let report: AuditReport = engine().audit(&listing("Nutrilon Profutura 1 800 Gr", 46000.0)).unwrap();

    assert_eq!(report.fraud_score, 10);
    assert_eq!(report.risk_tier, RiskTier::Low);
    assert_eq!(report.violation_details.kinds().collect::<Vec<_>>(), vec![ViolationKind::MissingEan]);

    let ean: &FieldCheck = report.field(AuditField::Ean).unwrap();
    assert_eq!(ean.status, FieldStatus::Warning);
    assert_eq!(ean.score_impact, 10);
}

#[test]
fn any_published_ean_avoids_the_missing_ean_rule() {
    let report: AuditReport = engine()
        .audit(&listing("Fortisip Vainilla 200 ml", 4000.0).with_ean("0000"))
        .unwrap();
    assert!(!report.violation_details.contains(ViolationKind::MissingEan));
    assert!(report.violation_details.contains(ViolationKind::LowPrice));
}

#[test]
fn exact_match_at_a_fair_price_is_clean() {
    let report: AuditReport = engine()
        .audit(&listing("Nutrilon Profutura 1 x 800g", 46000.0).with_ean("7791905001607"))
        .unwrap();

    assert_eq!(report.fraud_score, 0);
    assert!(report.violation_details.is_empty());
    assert!(report.price_ok && report.brand_ok && report.publishable_ok);
}

#[test]
fn stage_in_an_exact_match_title_does_not_split_the_price() {
    let report: AuditReport = engine()
        .audit(&listing("Nutrilon Profutura 4 x 800g", 36000.0).with_ean("7791905001638"))
        .unwrap();

    assert_eq!(report.catalog_id.as_deref(), Some("np4"));
    assert_eq!(report.detected.quantity, 1);
    assert_eq!(report.fraud_score, 0);
    assert!(report.price_ok);
    assert!(report.violation_details.is_empty());
    assert_eq!(engine().enforcement_reason(&report), None);
}

#[test]
fn price_under_the_minimum_is_severe() {
    let report: AuditReport = engine()
        .audit(&listing("Leche en polvo", 20000.0).with_ean("7791905001638"))
        .unwrap();

    assert_eq!(report.fraud_score, 100);
    assert_eq!(report.risk_tier, RiskTier::High);
    assert!(!report.price_ok);
    assert_eq!(
        report.violation_details.get(ViolationKind::LowPrice),
        Some(&ViolationDetail::LowPrice {
            min_allowed: 35000.0,
            actual_unit_price: 20000.0,
            diff: 15000.0,
            listing_price: 20000.0,
            detected_qty: 1,
            catalog_units: 1,
        })
    );

    let price: &FieldCheck = report.field(AuditField::Price).unwrap();
    assert_eq!(price.status, FieldStatus::Rejected);
    assert_eq!(price.listing, "20000.00");
    assert_eq!(price.catalog, "35000.00");
}

#[test]
fn pack_price_is_compared_per_unit() {
    let report: AuditReport = engine()
        .audit(&listing("Pack x 4 Fortisip Vainilla 200 ml", 15000.0))
        .unwrap();

    match report.violation_details.get(ViolationKind::LowPrice) {
        Some(ViolationDetail::LowPrice {
            actual_unit_price,
            diff,
            detected_qty,
            ..
        }) => {
            assert_eq!(*actual_unit_price, 3750.0);
            assert_eq!(*diff, 1250.0);
            assert_eq!(*detected_qty, 4);
        }
        other => panic!("expected a low price, got {other:?}"),
    }
    assert_eq!(report.fraud_score, 100);
}

#[test]
fn underpriced_multi_pack_entry_reports_claimed_and_catalog_units() {
    let report: AuditReport = engine()
        .audit(&branded("Leche Vital 3 24 Bricks X 200 Ml", 40000.0, "Vital"))
        .unwrap();

    assert_eq!(report.catalog_id.as_deref(), Some("v3-24"));
    match report.violation_details.get(ViolationKind::LowPrice) {
        Some(ViolationDetail::LowPrice {
            actual_unit_price,
            detected_qty,
            catalog_units,
            ..
        }) => {
            assert_eq!(*actual_unit_price, 40000.0);
            assert_eq!(*detected_qty, 24);
            assert_eq!(*catalog_units, 1);
        }
        other => panic!("expected a low price, got {other:?}"),
    }
}

#[test]
fn discount_on_a_no_discount_entry_is_flagged() {
    let report: AuditReport = engine()
        .audit(&branded("Fortini Multifibra 400g Vainilla", 8000.0, "NUTRICIA"))
        .unwrap();

    assert_eq!(report.catalog_id.as_deref(), Some("fortini-400"));
    assert!(report.violation_details.contains(ViolationKind::LowPrice));
    assert!(report.violation_details.contains(ViolationKind::UnauthorizedDiscount));
    assert_eq!(report.fraud_score, 100);

    let discount: &FieldCheck = report.field(AuditField::Discount).unwrap();
    assert_eq!(discount.status, FieldStatus::Rejected);
    assert_eq!(discount.catalog, "not allowed");
}

#[test]
fn discount_on_an_open_entry_is_not_applicable() {
    let report: AuditReport = engine().audit(&listing("Nutrilon Profutura 4 800g", 30000.0)).unwrap();
    assert!(report.violation_details.contains(ViolationKind::LowPrice));
    assert!(!report.violation_details.contains(ViolationKind::UnauthorizedDiscount));
    assert_eq!(report.field(AuditField::Discount).unwrap().status, FieldStatus::NotApplicable);
}

#[test]
fn blacklisted_word_for_the_entry_is_flagged() {
    let report: AuditReport = engine()
        .audit(&listing("Nutrilon Profutura 4 800g Vencida", 36000.0))
        .unwrap();

    assert_eq!(report.catalog_id.as_deref(), Some("np4"));
    assert_eq!(
        report.violation_details.get(ViolationKind::ForbiddenKeywords),
        Some(&ViolationDetail::ForbiddenKeywords {
            found_keywords: vec!["vencida".to_string()],
        })
    );
    assert_eq!(report.fraud_score, 40);
    assert_eq!(report.risk_tier, RiskTier::Medium);

    let keywords: &FieldCheck = report.field(AuditField::Keywords).unwrap();
    assert_eq!(keywords.status, FieldStatus::Rejected);
    assert_eq!(keywords.listing, "vencida");
    assert_eq!(keywords.score_impact, 30);
}

#[test]
fn blacklist_of_another_entry_does_not_apply() {
    let report: AuditReport = engine()
        .audit(&listing("Nutrilon Profutura 4 800g Regalo", 36000.0))
        .unwrap();

    assert_eq!(report.catalog_id.as_deref(), Some("np4"));
    assert!(!report.violation_details.contains(ViolationKind::ForbiddenKeywords));
    assert_eq!(report.field(AuditField::Keywords).unwrap().status, FieldStatus::Approved);
    assert_eq!(report.fraud_score, 10);
}

#[test]
fn zero_price_is_undetermined_not_cheap() {
    let report: AuditReport = engine().audit(&listing("Nutrilon Profutura 3", 0.0)).unwrap();

    assert!(report.violation_details.contains(ViolationKind::PriceUndetermined));
    assert!(!report.violation_details.contains(ViolationKind::LowPrice));
    assert!(!report.price_ok);
    assert_eq!(report.field(AuditField::Price).unwrap().status, FieldStatus::Warning);
}

#[test]
fn restricted_entry_is_a_violation_wherever_listed() {
    let report: AuditReport = engine().audit(&listing("Neocate LCP 400 g", 61000.0)).unwrap();

    assert_eq!(report.fraud_score, 70);
    assert_eq!(report.risk_tier, RiskTier::High);
    assert!(!report.publishable_ok);
    assert_eq!(
        report.violation_details.get(ViolationKind::RestrictedSkuViolation),
        Some(&ViolationDetail::RestrictedSkuViolation {
            catalog_id: "neocate-400".to_string()
        })
    );
    assert_eq!(report.field(AuditField::Publishable).unwrap().status, FieldStatus::Rejected);
}

#[test]
fn official_store_above_the_floor_is_trusted() {
    let report: AuditReport = engine().audit(&official("Nutrilon Profutura 4 800g", 29750.0)).unwrap();

    assert_eq!(report.fraud_score, 0);
    assert_eq!(report.risk_tier, RiskTier::Low);
    assert_eq!(
        report.violation_details.get(ViolationKind::TrustedOfficialStore),
        Some(&ViolationDetail::TrustedOfficialStore {
            overridden_score: 100,
            unit_price: 29750.0,
            price_floor: 28000.0,
        })
    );
    assert!(report.fields.iter().all(|check| check.score_impact == 0));
}

#[test]
fn official_store_under_the_floor_is_not_trusted() {
    let report: AuditReport = engine().audit(&official("Nutrilon Profutura 4 800g", 20000.0)).unwrap();
    assert_eq!(report.fraud_score, 100);
    assert!(!report.violation_details.contains(ViolationKind::TrustedOfficialStore));
}

#[test]
fn penalties_follow_the_policy() {
    let mut policy: Policy = Policy::default();
    policy.compliance.missing_ean_penalty = 25;
    let strict = engine_with(policy);

    let report: AuditReport = strict.audit(&listing("Nutrilon Profutura 1 800 Gr", 46000.0)).unwrap();
    assert_eq!(report.fraud_score, 25);
    assert_eq!(report.risk_tier, RiskTier::Low);
}
