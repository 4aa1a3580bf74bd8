//! # Audit Engine
//!
//! The facade over the pipeline. An engine owns one immutable catalog snapshot, the
//! vocabulary and the policy; it is `Send + Sync` and every audit only reads it, so
//! one instance serves any number of threads. Refreshing the catalog means building
//! a new engine.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use listguard_common::config::{Policy, ReasonCode};
use listguard_common::error::EngineError;
use listguard_common::models::{AuditReport, CatalogEntry, Listing};
use listguard_common::vocabulary::Vocabulary;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::enforcement;
use crate::matcher::{self, ListingSignals, MatchResult, filters};
use crate::report;
use crate::rules::{self, RuleOutcome};

/// Why a listing is unrelated to the monitored catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoiseReason {
    /// The title names an unrelated product category.
    ExcludedTerm(String),
    /// No catalog brand appears in the title or the declared brand.
    NoCatalogBrand,
}

impl fmt::Display for NoiseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseReason::ExcludedTerm(term) => write!(f, "excluded term '{term}'"),
            NoiseReason::NoCatalogBrand => f.write_str("no catalog brand"),
        }
    }
}

pub struct AuditEngine {
    catalog: Catalog,
    vocabulary: Vocabulary,
    policy: Policy,
}

impl AuditEngine {
    /// Builds an engine over `entries`.
    ///
    /// Every catalog brand joins the brand vocabulary.
    ///
    /// # Errors
    ///
    /// Fails when the policy is out of range or the catalog is empty or inconsistent.
    pub fn new(entries: Vec<CatalogEntry>, vocabulary: Vocabulary, policy: Policy) -> Result<Self, EngineError> {
        policy.validate()?;
        let catalog: Catalog = Catalog::new(entries)?;
        let vocabulary: Vocabulary = vocabulary.with_brands(catalog.brands());

        info!(
            entries = catalog.len(),
            brands = vocabulary.brand_count(),
            exclusions = vocabulary.exclusion_count(),
            "audit engine ready with vocabulary {}",
            vocabulary.version()
        );

        Ok(Self {
            catalog,
            vocabulary,
            policy,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Decides which catalog entry `listing` represents, without evaluating rules.
    pub fn identify(&self, listing: &Listing) -> MatchResult<'_> {
        let signals: ListingSignals<'_> = ListingSignals::new(listing, &self.vocabulary);
        matcher::match_listing(&signals, &self.catalog, &self.policy)
    }

    /// Audits one listing.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingTitle`] when the title is blank. Anything else the
    /// listing lacks is reported inside the audit.
    pub fn audit(&self, listing: &Listing) -> Result<AuditReport, EngineError> {
        if listing.title.trim().is_empty() {
            return Err(EngineError::MissingTitle);
        }

        let matched: MatchResult<'_> = self.identify(listing);
        let outcome: RuleOutcome = rules::evaluate(listing, &matched, &self.policy);
        let report: AuditReport = report::assemble(listing, &matched, outcome, &self.policy);

        debug!(
            catalog_id = report.catalog_id.as_deref().unwrap_or("-"),
            tier = %report.confidence,
            score = report.fraud_score,
            "audited '{}'",
            listing.title
        );
        Ok(report)
    }

    /// Audits `listings` in parallel, in input order.
    ///
    /// `on_audited` receives the running count of finished audits.
    pub fn audit_batch(
        &self,
        listings: &[Listing],
        on_audited: Option<&(dyn Fn(usize) + Sync)>,
    ) -> Vec<Result<AuditReport, EngineError>> {
        let done: AtomicUsize = AtomicUsize::new(0);

        listings
            .par_iter()
            .map(|listing| {
                let result: Result<AuditReport, EngineError> = self.audit(listing);
                let count: usize = done.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = on_audited {
                    cb(count);
                }
                result
            })
            .collect()
    }

    /// Tells whether `listing` is noise unrelated to the catalog.
    ///
    /// A listing whose EAN is in the catalog is never noise.
    pub fn screen(&self, listing: &Listing) -> Option<NoiseReason> {
        let signals: ListingSignals<'_> = ListingSignals::new(listing, &self.vocabulary);

        if signals.ean.as_deref().and_then(|ean| self.catalog.by_ean(ean)).is_some() {
            return None;
        }
        if let Some(term) = signals.excluded_term {
            return Some(NoiseReason::ExcludedTerm(term));
        }

        let branded: bool = self
            .catalog
            .iter()
            .any(|indexed| filters::brand_present(&signals, &indexed.normalized_brand));
        if branded { None } else { Some(NoiseReason::NoCatalogBrand) }
    }

    /// Enforcement reason for `report`, none for reports that should not be filed.
    pub fn enforcement_reason(&self, report: &AuditReport) -> Option<&ReasonCode> {
        enforcement::report_reason(report, &self.policy.enforcement)
    }
}
