#![cfg(test)]
use listguard_common::models::{
    AuditField, AuditReport, ConfidenceTier, FieldCheck, FieldStatus, ListingAttributes, ViolationDetail, ViolationKind,
};

use crate::fixtures::{branded, engine, listing};

#[test]
fn half_a_multi_pack_is_a_volumetric_violation() {
    let report: AuditReport = engine()
        .audit(&branded("Leche Vital 3 12 Bricks X 200 Ml", 30000.0, "Vital"))
        .unwrap();

    assert_eq!(report.confidence, ConfidenceTier::Suspicious);
    assert_eq!(report.catalog_id.as_deref(), Some("v3-24"));
    assert_eq!(report.fraud_score, 100);

    match report.violation_details.get(ViolationKind::VolumetricMismatch) {
        Some(ViolationDetail::VolumetricMismatch {
            expected_kg,
            detected_kg,
            expected_qty,
            detected_qty,
        }) => {
            assert!((expected_kg - 5.208).abs() < 1e-9);
            assert!((detected_kg - 2.604).abs() < 1e-9);
            assert_eq!(*expected_qty, 24);
            assert_eq!(*detected_qty, 12);
        }
        other => panic!("expected a volumetric mismatch, got {other:?}"),
    }

    let volume: &FieldCheck = report.field(AuditField::Volume).unwrap();
    assert_eq!(volume.status, FieldStatus::Rejected);
    assert_eq!(volume.listing, "2.604 kg");
    assert_eq!(volume.catalog, "5.208 kg");
    assert_eq!(report.field(AuditField::Quantity).unwrap().status, FieldStatus::Warning);
}

#[test]
fn full_multi_pack_passes() {
    let report: AuditReport = engine()
        .audit(&branded("Leche Vital 3 24 Bricks X 200 Ml", 60000.0, "Vital"))
        .unwrap();

    assert_eq!(report.catalog_id.as_deref(), Some("v3-24"));
    assert_eq!(report.detected.quantity, 24);
    assert!(!report.violation_details.contains(ViolationKind::VolumetricMismatch));
    assert_eq!(report.field(AuditField::Volume).unwrap().status, FieldStatus::Approved);
    assert_eq!(report.fraud_score, 10);
}

#[test]
fn combo_of_single_units_scales_the_expectation() {
    let report: AuditReport = engine()
        .audit(&listing("Combo X2 Nutrilon Profutura 3 800g", 70000.0))
        .unwrap();

    assert_eq!(report.catalog_id.as_deref(), Some("np3"));
    assert_eq!(report.detected.quantity, 2);
    assert!((report.detected.total_mass_kg - 1.6).abs() < 1e-9);
    assert_eq!(report.field(AuditField::Volume).unwrap().catalog, "1.600 kg");
}

#[test]
fn structured_attributes_are_read_before_the_title() {
    let report: AuditReport = engine()
        .audit(&listing("Nutrilon Profutura 2", 43000.0).with_attributes(ListingAttributes {
            net_content: Some("800 g".to_string()),
            units_per_pack: Some("1".to_string()),
            ..ListingAttributes::default()
        }))
        .unwrap();

    assert_eq!(report.catalog_id.as_deref(), Some("np2"));
    assert_eq!(report.field(AuditField::Volume).unwrap().status, FieldStatus::Approved);
    assert_eq!(report.fraud_score, 10);
}

#[test]
fn unreadable_content_is_reported_but_not_penalized() {
    let report: AuditReport = engine().audit(&listing("Nutrilon Profutura 3", 0.0)).unwrap();

    assert_eq!(report.catalog_id.as_deref(), Some("np3"));
    assert!((report.match_score - 91.0).abs() < 1e-6);
    assert!(report.violation_details.contains(ViolationKind::VolumeUndetermined));
    assert_eq!(report.detected.volume, "undetermined");
    assert_eq!(report.field(AuditField::Volume).unwrap().status, FieldStatus::Warning);
    assert_eq!(report.fraud_score, 10);
}

#[test]
fn liquid_volume_converts_with_density() {
    let report: AuditReport = engine().audit(&listing("Fortisip Vainilla 200 ml", 5200.0)).unwrap();

    assert_eq!(report.catalog_id.as_deref(), Some("fortisip-200"));
    assert!((report.detected.total_mass_kg - 0.217).abs() < 1e-9);
    assert_eq!(report.field(AuditField::Volume).unwrap().status, FieldStatus::Approved);
}
