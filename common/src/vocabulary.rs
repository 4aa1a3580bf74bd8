//! # Vocabulary
//!
//! Hand-maintained word lists that steer identification:
//!
//! * **brands**: known authorized-catalog brand names, used to infer a brand from a title.
//! * **exclusions**: terms of unrelated product categories (pet food, cosmetics,
//!   electronics, books, car parts...) that share tokens with catalog names.
//! * **house_brands**: umbrella names (the manufacturer) that cover every catalog brand.
//!
//! The lists evolve independently from the matching algorithm, so they are loaded
//! as versioned data and injected into the engine. Every term is normalized once on
//! construction; lookups compare normalized text only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::text::{self, contains_phrase};

/// On-disk shape of a vocabulary file. Terms may carry any casing or accents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct VocabularyFile {
    version: String,
    brands: Vec<String>,
    exclusions: Vec<String>,
    house_brands: Vec<String>,
}

/// A normalized, read-only set of lookup terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VocabularyFile")]
pub struct Vocabulary {
    version: String,
    brands: BTreeSet<String>,
    exclusions: BTreeSet<String>,
    house_brands: BTreeSet<String>,
}

impl From<VocabularyFile> for Vocabulary {
    fn from(file: VocabularyFile) -> Self {
        Self::new(file.version, file.brands, file.exclusions).with_house_brands(file.house_brands)
    }
}

impl Vocabulary {
    pub fn new<B, E>(version: impl Into<String>, brands: B, exclusions: E) -> Self
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            version: version.into(),
            brands: normalized_set(brands),
            exclusions: normalized_set(exclusions),
            house_brands: BTreeSet::new(),
        }
    }

    pub fn with_house_brands<H>(mut self, house_brands: H) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
    {
        self.house_brands.extend(normalized_set(house_brands));
        self
    }

    /// Adds brand names to the brand vocabulary (e.g. every brand of the catalog).
    pub fn with_brands<B>(mut self, brands: B) -> Self
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
    {
        self.brands.extend(normalized_set(brands));
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn brands(&self) -> impl Iterator<Item = &str> {
        self.brands.iter().map(String::as_str)
    }

    pub fn brand_count(&self) -> usize {
        self.brands.len()
    }

    pub fn exclusion_count(&self) -> usize {
        self.exclusions.len()
    }

    /// Returns the first exclusion term found as a whole-word phrase in `normalized_title`.
    pub fn excluded_term(&self, normalized_title: &str) -> Option<&str> {
        self.exclusions
            .iter()
            .find(|term| contains_phrase(normalized_title, term))
            .map(String::as_str)
    }

    /// Returns `true` when `normalized_brand` names the manufacturer rather than a product brand.
    pub fn is_house_brand(&self, normalized_brand: &str) -> bool {
        self.house_brands.contains(normalized_brand)
    }
}

fn normalized_set<I>(terms: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    terms
        .into_iter()
        .map(|term| text::normalize(term.as_ref()))
        .filter(|term| !term.is_empty())
        .collect()
}
