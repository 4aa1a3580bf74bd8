//! Hard-rejection filters, applied per catalog entry before any scoring.

use std::fmt;

use listguard_common::config::MatchPolicy;

use crate::brand::BrandRelation;
use crate::catalog::IndexedEntry;
use crate::matcher::ListingSignals;

/// Why a catalog entry was discarded for a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The title belongs to an unrelated product category.
    ExcludedTerm(String),
    /// The listing's brand is clearly another brand.
    BrandConflict { found: String },
    /// The entry's brand appears nowhere in the listing.
    BrandAbsent,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::ExcludedTerm(term) => write!(f, "excluded term '{term}'"),
            Rejection::BrandConflict { found } => write!(f, "conflicting brand '{found}'"),
            Rejection::BrandAbsent => f.write_str("catalog brand absent from listing"),
        }
    }
}

/// Returns the first filter that discards `candidate`, if any.
pub fn check(signals: &ListingSignals<'_>, candidate: &IndexedEntry, policy: &MatchPolicy) -> Option<Rejection> {
    if let Some(term) = &signals.excluded_term {
        return Some(Rejection::ExcludedTerm(term.clone()));
    }

    if let Some(brand) = &signals.brand {
        if brand.relation_to(&candidate.normalized_brand, policy) == BrandRelation::Different {
            return Some(Rejection::BrandConflict {
                found: brand.name.clone(),
            });
        }
    }

    if !brand_present(signals, &candidate.normalized_brand) {
        return Some(Rejection::BrandAbsent);
    }

    None
}

/// The catalog brand appears in the title or inside the resolved listing brand.
pub(crate) fn brand_present(signals: &ListingSignals<'_>, catalog_brand: &str) -> bool {
    if catalog_brand.is_empty() {
        return false;
    }
    signals.normalized_title.contains(catalog_brand)
        || signals
            .brand
            .as_ref()
            .is_some_and(|brand| brand.normalized.contains(catalog_brand))
}
