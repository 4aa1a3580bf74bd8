//! # Candidate Matcher
//!
//! Decides which catalog entry, if any, a listing represents.
//!
//! 1. An EAN equal to a catalog EAN is **definitive**: that entry wins at the
//!    exact-identifier tier and no filter applies.
//! 2. Every other entry goes through the hard-rejection [`filters`].
//! 3. Survivors are scored `title_weight x title_similarity + attribute_weight x
//!    attribute_score`, where the attribute score starts at 100 and is debited for
//!    an unclear brand, a contradicting or unreadable content and a missing life stage.
//! 4. Near-unrelated titles are floored to zero, the best score wins and its value
//!    picks the confidence tier.
//!
//! Falling under the weak tier is not a violation, only "not a monitored product".

use listguard_common::config::{MatchPolicy, Policy};
use listguard_common::models::{CatalogEntry, ConfidenceTier, Listing, normalize_ean};
use listguard_common::text::{self, contains_phrase};
use listguard_common::vocabulary::Vocabulary;
use tracing::trace;

use crate::brand::{self, BrandRelation, ResolvedBrand};
use crate::catalog::{Catalog, IndexedEntry};
use crate::similarity::token_set_ratio;
use crate::volumetric::{self, VolumetricCheck};

pub mod filters;

/// Everything the matcher derives from a listing once, before visiting the catalog.
#[derive(Debug, Clone)]
pub struct ListingSignals<'l> {
    pub listing: &'l Listing,
    pub normalized_title: String,
    pub brand: Option<ResolvedBrand>,
    pub ean: Option<String>,
    /// Exclusion term found in the title.
    pub excluded_term: Option<String>,
}

impl<'l> ListingSignals<'l> {
    pub fn new(listing: &'l Listing, vocabulary: &Vocabulary) -> Self {
        let normalized_title: String = text::normalize(&listing.title);
        let excluded_term: Option<String> = vocabulary.excluded_term(&normalized_title).map(str::to_string);
        Self {
            listing,
            brand: brand::resolve_brand(listing, vocabulary),
            ean: normalize_ean(listing.ean.as_deref()),
            excluded_term,
            normalized_title,
        }
    }
}

/// Outcome of matching one listing.
#[derive(Debug, Clone)]
pub struct MatchResult<'c> {
    pub entry: Option<&'c CatalogEntry>,
    pub tier: ConfidenceTier,
    /// Combined score of the best candidate, in `[0, 100]`.
    pub score: f64,
    pub title_similarity: f64,
    pub brand: Option<ResolvedBrand>,
    /// Volumetric check of the matched entry, reused by the compliance rules.
    pub volumetric: Option<VolumetricCheck>,
}

impl MatchResult<'_> {
    pub fn is_matched(&self) -> bool {
        self.entry.is_some()
    }

    fn unmatched(score: f64, brand: Option<ResolvedBrand>) -> Self {
        Self {
            entry: None,
            tier: ConfidenceTier::Unmatched,
            score,
            title_similarity: 0.0,
            brand,
            volumetric: None,
        }
    }
}

struct Candidate<'c> {
    indexed: &'c IndexedEntry,
    score: f64,
    title_similarity: f64,
    volumetric: VolumetricCheck,
}

/// Matches `listing` against every entry of `catalog`.
pub fn match_listing<'c>(
    signals: &ListingSignals<'_>,
    catalog: &'c Catalog,
    policy: &Policy,
) -> MatchResult<'c> {
    let listing: &Listing = signals.listing;

    if let Some(indexed) = signals.ean.as_deref().and_then(|ean| catalog.by_ean(ean)) {
        trace!(catalog_id = %indexed.entry.id, "exact EAN match");
        return MatchResult {
            entry: Some(&indexed.entry),
            tier: ConfidenceTier::ExactIdentifier,
            score: 100.0,
            title_similarity: token_set_ratio(&signals.normalized_title, &indexed.normalized_name),
            brand: signals.brand.clone(),
            volumetric: Some(volumetric::validate(listing, &indexed.entry, &policy.volumetric)),
        };
    }

    let mut best: Option<Candidate<'c>> = None;

    for indexed in catalog.iter() {
        if let Some(rejection) = filters::check(signals, indexed, &policy.matching) {
            trace!(catalog_id = %indexed.entry.id, "rejected: {rejection}");
            continue;
        }

        let candidate: Candidate<'c> = score_candidate(signals, indexed, policy);
        trace!(
            catalog_id = %indexed.entry.id,
            score = candidate.score,
            title_similarity = candidate.title_similarity,
            "scored candidate"
        );

        if best.as_ref().is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    let Some(best) = best else {
        return MatchResult::unmatched(0.0, signals.brand.clone());
    };

    let m: &MatchPolicy = &policy.matching;
    let tier: ConfidenceTier = if best.score >= m.strong_match_score {
        ConfidenceTier::StrongFuzzy
    } else if best.score >= m.weak_match_score {
        ConfidenceTier::Suspicious
    } else {
        return MatchResult::unmatched(best.score, signals.brand.clone());
    };

    MatchResult {
        entry: Some(&best.indexed.entry),
        tier,
        score: best.score,
        title_similarity: best.title_similarity,
        brand: signals.brand.clone(),
        volumetric: Some(best.volumetric),
    }
}

fn score_candidate<'c>(signals: &ListingSignals<'_>, indexed: &'c IndexedEntry, policy: &Policy) -> Candidate<'c> {
    let m: &MatchPolicy = &policy.matching;
    let title_similarity: f64 = token_set_ratio(&signals.normalized_title, &indexed.normalized_name);
    let check: VolumetricCheck = volumetric::validate(signals.listing, &indexed.entry, &policy.volumetric);

    let mut attribute_score: f64 = 100.0;

    if let Some(brand) = &signals.brand {
        if brand.relation_to(&indexed.normalized_brand, m) != BrandRelation::Same {
            attribute_score -= m.brand_debit;
        }
    }
    if check.is_mismatch() {
        attribute_score -= m.volumetric_debit;
    } else if check.is_undetermined() {
        attribute_score -= m.volumetric_undetermined_debit;
    }
    if let Some(stage) = &indexed.stage_token {
        if !stage_present(signals, stage) {
            attribute_score -= m.stage_debit;
        }
    }
    let attribute_score: f64 = attribute_score.max(0.0);

    let mut combined: f64 = (m.title_weight * title_similarity + m.attribute_weight * attribute_score).clamp(0.0, 100.0);

    if title_similarity < m.low_similarity_floor && combined < m.independent_high_bar {
        combined = 0.0;
    }
    if signals.brand.is_none() && title_similarity < m.unbranded_similarity_floor {
        combined = 0.0;
    }

    Candidate {
        indexed,
        score: combined,
        title_similarity,
        volumetric: check,
    }
}

fn stage_present(signals: &ListingSignals<'_>, stage: &str) -> bool {
    contains_phrase(&signals.normalized_title, stage)
        || signals
            .listing
            .attributes
            .stage
            .as_deref()
            .is_some_and(|declared| contains_phrase(&text::normalize(declared), stage))
}
