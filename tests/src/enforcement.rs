#![cfg(test)]
use listguard_common::config::ReasonCode;
use listguard_common::models::AuditReport;
use listguard_core::enforcement::complaint_comment;

use crate::fixtures::{branded, engine, listing, official};

fn reason_code(report: &AuditReport) -> Option<&str> {
    engine().enforcement_reason(report).map(|reason| reason.code.as_str())
}

#[test]
fn cheap_pack_is_reported_with_its_unit_price() {
    let report: AuditReport = engine()
        .audit(&listing("Pack x 4 Fortisip Vainilla 200 ml", 15000.0))
        .unwrap();
    let reason: &ReasonCode = engine().enforcement_reason(&report).unwrap();
    assert_eq!(reason.code, "703");

    let comment: String = complaint_comment(&report, reason);
    assert!(comment.contains("Precio unidad $3750.00 vs Mínimo $5000.00."));
    assert!(comment.contains("Pack detectado de 4 unidades."));
    assert!(comment.ends_with("Producto de referencia: fortisip-200."));
}

#[test]
fn low_price_outranks_misleading_content() {
    let report: AuditReport = engine()
        .audit(&branded("Leche Vital 3 12 Bricks X 200 Ml", 30000.0, "Vital"))
        .unwrap();
    assert_eq!(reason_code(&report), Some("703"));

    let reason: &ReasonCode = engine().enforcement_reason(&report).unwrap();
    assert!(complaint_comment(&report, reason).contains("Contenido declarado 2.60 kg vs esperado 5.21 kg."));
}

#[test]
fn short_content_at_a_fair_price_is_misleading() {
    let report: AuditReport = engine().audit(&listing("Fortini 200 g", 9500.0)).unwrap();
    assert_eq!(report.fraud_score, 70);
    assert_eq!(reason_code(&report), Some("704"));
}

#[test]
fn restricted_entry_is_reported_as_restricted_sale() {
    let report: AuditReport = engine().audit(&listing("Neocate LCP 400 g", 61000.0)).unwrap();
    assert_eq!(reason_code(&report), Some("705"));
}

#[test]
fn minor_or_trusted_findings_are_not_reported() {
    let minor: AuditReport = engine().audit(&listing("Nutrilon Profutura 1 800 Gr", 46000.0)).unwrap();
    assert_eq!(reason_code(&minor), None);

    let trusted: AuditReport = engine().audit(&official("Nutrilon Profutura 4 800g", 29750.0)).unwrap();
    assert_eq!(reason_code(&trusted), None);
}
