//! # Brand Resolver
//!
//! Decides which brand a listing claims to be. A declared brand attribute wins;
//! otherwise the title is scanned against the brand vocabulary. Declaring only the
//! manufacturer's umbrella name (a **house brand**) says nothing about the product
//! line, so the title is scanned first and the house brand is the last resort.
//!
//! Finding no brand is a legitimate answer, not an error.

use listguard_common::config::MatchPolicy;
use listguard_common::models::Listing;
use listguard_common::text::{self, contains_phrase};
use listguard_common::vocabulary::Vocabulary;

use crate::similarity::ratio;

/// Where a resolved brand came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandSource {
    /// The listing's structured brand attribute.
    Declared,
    /// A vocabulary brand found in the title.
    Title,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBrand {
    /// The brand as displayed: the declared value, or the vocabulary term.
    pub name: String,
    pub normalized: String,
    pub source: BrandSource,
    /// The brand is the manufacturer's umbrella name.
    pub house: bool,
}

/// How two brands relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandRelation {
    Same,
    /// Neither clearly the same nor clearly different.
    Related,
    Different,
}

/// Resolves the brand of `listing` from its attributes and its title.
pub fn resolve_brand(listing: &Listing, vocabulary: &Vocabulary) -> Option<ResolvedBrand> {
    let declared: Option<ResolvedBrand> = listing.declared_brand().and_then(|name| {
        let normalized: String = text::normalize(name);
        if normalized.is_empty() {
            return None;
        }
        Some(ResolvedBrand {
            name: name.to_string(),
            house: vocabulary.is_house_brand(&normalized),
            normalized,
            source: BrandSource::Declared,
        })
    });

    if declared.as_ref().is_some_and(|brand| !brand.house) {
        return declared;
    }

    brand_in_title(&text::normalize(&listing.title), vocabulary).or(declared)
}

/// Finds a vocabulary brand inside `normalized_title`.
///
/// Matches are substrings; the earliest occurrence wins and ties go to the longest brand.
pub fn brand_in_title(normalized_title: &str, vocabulary: &Vocabulary) -> Option<ResolvedBrand> {
    let mut best: Option<(usize, &str)> = None;

    for brand in vocabulary.brands() {
        let Some(position) = normalized_title.find(brand) else {
            continue;
        };
        let better: bool = match best {
            None => true,
            Some((best_pos, best_brand)) => {
                position < best_pos || (position == best_pos && brand.len() > best_brand.len())
            }
        };
        if better {
            best = Some((position, brand));
        }
    }

    best.map(|(_, brand)| ResolvedBrand {
        name: brand.to_string(),
        normalized: brand.to_string(),
        source: BrandSource::Title,
        house: vocabulary.is_house_brand(brand),
    })
}

/// Relates two normalized brands.
///
/// Whole-word containment or a similarity at the match bar makes them the same;
/// a similarity under the reject bar without containment makes them different.
pub fn relate(a: &str, b: &str, policy: &MatchPolicy) -> BrandRelation {
    if a.is_empty() || b.is_empty() {
        return BrandRelation::Different;
    }
    if contains_phrase(a, b) || contains_phrase(b, a) {
        return BrandRelation::Same;
    }

    let similarity: f64 = ratio(a, b);
    if similarity >= policy.brand_match_similarity {
        BrandRelation::Same
    } else if similarity < policy.brand_reject_similarity {
        BrandRelation::Different
    } else {
        BrandRelation::Related
    }
}

impl ResolvedBrand {
    /// Relation of this brand to a catalog brand. A house brand covers every catalog brand.
    pub fn relation_to(&self, catalog_brand: &str, policy: &MatchPolicy) -> BrandRelation {
        if self.house {
            return BrandRelation::Same;
        }
        relate(&self.normalized, catalog_brand, policy)
    }
}
