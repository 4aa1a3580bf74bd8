#![cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use listguard_common::error::EngineError;
use listguard_common::models::{AuditReport, ConfidenceTier, Listing};
use listguard_core::NoiseReason;

use crate::fixtures::{engine, listing, sample_listings};

#[test]
fn sample_batch_keeps_input_order() -> anyhow::Result<()> {
    let listings: Vec<Listing> = sample_listings();
    let finished: AtomicUsize = AtomicUsize::new(0);
    let on_audited = |count: usize| {
        finished.fetch_max(count, Ordering::Relaxed);
    };

    let results: Vec<Result<AuditReport, EngineError>> = engine().audit_batch(&listings, Some(&on_audited));

    assert_eq!(results.len(), listings.len());
    assert_eq!(finished.load(Ordering::Relaxed), listings.len());

    let ids: Vec<Option<String>> = results
        .iter()
        .map(|result| result.as_ref().ok().and_then(|report| report.catalog_id.clone()))
        .collect();
    let expected: Vec<Option<&str>> = vec![
        Some("np1"),
        Some("np4"),
        Some("fortisip-200"),
        Some("v3-24"),
        Some("neocate-400"),
        Some("np4"),
        Some("fortini-400"),
        Some("np2"),
        None,
        None,
        None,
    ];
    assert_eq!(ids.iter().map(Option::as_deref).collect::<Vec<_>>(), expected);

    let last: &Result<AuditReport, EngineError> = results.last().ok_or_else(|| anyhow::anyhow!("empty batch"))?;
    assert_eq!(last, &Err(EngineError::MissingTitle));
    Ok(())
}

#[test]
fn batch_agrees_with_single_audits() {
    let listings: Vec<Listing> = sample_listings();
    let batch: Vec<Result<AuditReport, EngineError>> = engine().audit_batch(&listings, None);

    for (listing, result) in listings.iter().zip(&batch) {
        assert_eq!(&engine().audit(listing), result, "{}", listing.title);
    }
}

#[test]
fn batch_triage_of_the_sample() {
    let results: Vec<Result<AuditReport, EngineError>> = engine().audit_batch(&sample_listings(), None);
    let reports: Vec<&AuditReport> = results.iter().filter_map(|result| result.as_ref().ok()).collect();

    let unmatched: usize = reports
        .iter()
        .filter(|report| report.confidence == ConfidenceTier::Unmatched)
        .count();
    let reportable: usize = reports
        .iter()
        .filter(|report| engine().enforcement_reason(report).is_some())
        .count();

    assert_eq!(reports.len(), 10);
    assert_eq!(unmatched, 2);
    assert_eq!(reportable, 5);
}

#[test]
fn screening_separates_noise_from_catalog_listings() {
    let engine = engine();

    assert!(matches!(
        engine.screen(&listing("Vitalcan Balanced Perro Adulto 20kg", 40000.0)),
        Some(NoiseReason::ExcludedTerm(_))
    ));
    assert_eq!(
        engine.screen(&listing("Jebao Dmp40 Bomba Recirculacion", 120000.0)),
        Some(NoiseReason::ExcludedTerm("jebao".to_string()))
    );
    assert_eq!(
        engine.screen(&listing("Bomba Recirculacion 2000 Lh", 120000.0)),
        Some(NoiseReason::NoCatalogBrand)
    );
    assert_eq!(engine.screen(&listing("Nutrilon Profutura 1 800 Gr", 46000.0)), None);
    assert_eq!(
        engine.screen(&listing("Leche en polvo", 20000.0).with_ean("7791905001638")),
        None
    );
}
