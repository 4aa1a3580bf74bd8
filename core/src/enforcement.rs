//! Mapping from audit findings to the marketplace's violation reasons.
//!
//! The only core-owned interface toward enforcement: it picks a reason code and
//! renders the complaint text, the submission itself belongs to the caller.

use listguard_common::config::{EnforcementCodes, ReasonCode};
use listguard_common::models::{AuditReport, ViolationDetail, ViolationDetails, ViolationKind};

/// Reason for a set of findings: low price first, then misleading content, then restricted sale.
pub fn reason_for<'c>(details: &ViolationDetails, codes: &'c EnforcementCodes) -> Option<&'c ReasonCode> {
    if details.contains(ViolationKind::LowPrice) {
        Some(&codes.low_price)
    } else if details.contains(ViolationKind::VolumetricMismatch) {
        Some(&codes.misleading_content)
    } else if details.contains(ViolationKind::RestrictedSkuViolation) {
        Some(&codes.restricted_sale)
    } else {
        None
    }
}

/// Reason to report `report` with, if it should be reported at all.
///
/// Reports whose final score is zero (trusted official stores included) are never reported.
pub fn report_reason<'c>(report: &AuditReport, codes: &'c EnforcementCodes) -> Option<&'c ReasonCode> {
    if report.fraud_score == 0 {
        return None;
    }
    reason_for(&report.violation_details, codes)
}

/// Human-readable comment sent along with a violation report.
pub fn complaint_comment(report: &AuditReport, reason: &ReasonCode) -> String {
    let mut comment: String = format!("Infracción detectada: {}.", reason.text);

    if let Some(ViolationDetail::LowPrice {
        min_allowed,
        actual_unit_price,
        detected_qty,
        ..
    }) = report.violation_details.get(ViolationKind::LowPrice)
    {
        comment.push_str(&format!(
            " Precio unidad ${actual_unit_price:.2} vs Mínimo ${min_allowed:.2}."
        ));
        if *detected_qty > 1 {
            comment.push_str(&format!(" Pack detectado de {detected_qty} unidades."));
        }
    }

    if let Some(ViolationDetail::VolumetricMismatch {
        expected_kg,
        detected_kg,
        ..
    }) = report.violation_details.get(ViolationKind::VolumetricMismatch)
    {
        comment.push_str(&format!(
            " Contenido declarado {detected_kg:.2} kg vs esperado {expected_kg:.2} kg."
        ));
    }

    if let Some(catalog_id) = &report.catalog_id {
        comment.push_str(&format!(" Producto de referencia: {catalog_id}."));
    }

    comment
}

#[cfg(test)]
mod tests {
    use super::*;
    use listguard_common::models::{ConfidenceTier, DetectedSummary, RiskTier};

    fn report(score: u8, details: ViolationDetails) -> AuditReport {
        AuditReport {
            catalog_id: Some("np4".to_string()),
            confidence: ConfidenceTier::StrongFuzzy,
            match_level: 2,
            match_score: 92.0,
            fraud_score: score,
            risk_tier: RiskTier::from_score(score),
            violation_details: details,
            price_ok: false,
            brand_ok: true,
            publishable_ok: true,
            detected: DetectedSummary::new(None, 3.2, 4),
            fields: Vec::new(),
        }
    }

    fn low_price() -> ViolationDetail {
        ViolationDetail::LowPrice {
            min_allowed: 5000.0,
            actual_unit_price: 3750.0,
            diff: 1250.0,
            listing_price: 15000.0,
            detected_qty: 4,
            catalog_units: 4,
        }
    }

    #[test]
    fn price_reason_takes_priority() {
        let codes: EnforcementCodes = EnforcementCodes::default();
        let mut details: ViolationDetails = ViolationDetails::new();
        details.insert(ViolationDetail::RestrictedSkuViolation {
            catalog_id: "np4".to_string(),
        });
        assert_eq!(reason_for(&details, &codes).map(|r| r.code.as_str()), Some("705"));

        details.insert(ViolationDetail::VolumetricMismatch {
            expected_kg: 0.8,
            detected_kg: 0.4,
            expected_qty: 1,
            detected_qty: 1,
        });
        assert_eq!(reason_for(&details, &codes).map(|r| r.code.as_str()), Some("704"));

        details.insert(low_price());
        assert_eq!(reason_for(&details, &codes).map(|r| r.code.as_str()), Some("703"));
    }

    #[test]
    fn minor_findings_have_no_reason() {
        let mut details: ViolationDetails = ViolationDetails::new();
        details.insert(ViolationDetail::MissingEan);
        details.insert(ViolationDetail::VolumeUndetermined { detected_qty: 1 });
        assert_eq!(reason_for(&details, &EnforcementCodes::default()), None);
    }

    #[test]
    fn zero_score_reports_are_never_reported() {
        let mut details: ViolationDetails = ViolationDetails::new();
        details.insert(low_price());
        let codes: EnforcementCodes = EnforcementCodes::default();
        assert_eq!(report_reason(&report(0, details.clone()), &codes), None);
        assert!(report_reason(&report(100, details), &codes).is_some());
    }

    #[test]
    fn comment_quotes_unit_price_and_pack() {
        let mut details: ViolationDetails = ViolationDetails::new();
        details.insert(low_price());
        let codes: EnforcementCodes = EnforcementCodes::default();
        let comment: String = complaint_comment(&report(100, details), &codes.low_price);

        assert!(comment.starts_with("Infracción detectada: Precio significativamente inferior al sugerido."));
        assert!(comment.contains("Precio unidad $3750.00 vs Mínimo $5000.00."));
        assert!(comment.contains("Pack detectado de 4 unidades."));
        assert!(comment.ends_with("Producto de referencia: np4."));
    }
}
