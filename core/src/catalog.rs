//! The immutable, pre-normalized snapshot of the master catalog.
//!
//! Built once per engine. Every text the matcher compares is normalized here so an
//! audit only normalizes the listing side.

use std::collections::HashMap;

use listguard_common::error::EngineError;
use listguard_common::models::CatalogEntry;
use listguard_common::text;

/// A catalog entry with its comparison keys.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub entry: CatalogEntry,
    pub normalized_name: String,
    pub normalized_brand: String,
    /// Life-stage token expected in listing text (`"Etapa 4"` expects `"4"`).
    pub stage_token: Option<String>,
}

impl IndexedEntry {
    fn new(entry: CatalogEntry) -> Self {
        let normalized_name: String = text::normalize(&entry.name);
        let normalized_brand: String = text::normalize(&entry.brand);
        let stage_token: Option<String> = entry.stage.as_deref().and_then(stage_token);
        Self {
            entry,
            normalized_name,
            normalized_brand,
            stage_token,
        }
    }
}

/// Digits of a declared stage, or the whole normalized stage when it has none.
pub fn stage_token(stage: &str) -> Option<String> {
    let normalized: String = text::normalize(stage);
    if normalized.is_empty() {
        return None;
    }
    let numeric: Option<&str> = normalized
        .split_whitespace()
        .find(|token| token.chars().all(|c| c.is_ascii_digit()));
    Some(numeric.map_or_else(|| normalized.clone(), str::to_string))
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<IndexedEntry>,
    by_ean: HashMap<String, usize>,
}

impl Catalog {
    /// Validates and indexes `entries`.
    ///
    /// # Errors
    ///
    /// Fails on an empty catalog, an entry with zero units per pack, and a repeated
    /// identifier or EAN.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, EngineError> {
        if entries.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }

        let mut ids: HashMap<String, usize> = HashMap::with_capacity(entries.len());
        let mut by_ean: HashMap<String, usize> = HashMap::new();
        let mut indexed: Vec<IndexedEntry> = Vec::with_capacity(entries.len());

        for (idx, entry) in entries.into_iter().enumerate() {
            if entry.units_per_pack == 0 {
                return Err(EngineError::InvalidUnitsPerPack { id: entry.id });
            }
            if ids.insert(entry.id.clone(), idx).is_some() {
                return Err(EngineError::DuplicateId { id: entry.id });
            }
            if let Some(ean) = entry.normalized_ean() {
                if let Some(first) = by_ean.get(&ean) {
                    return Err(EngineError::DuplicateEan {
                        ean,
                        first: indexed[*first].entry.id.clone(),
                        second: entry.id,
                    });
                }
                by_ean.insert(ean, idx);
            }
            indexed.push(IndexedEntry::new(entry));
        }

        Ok(Self {
            entries: indexed,
            by_ean,
        })
    }

    /// The entry carrying `ean`, compared digits only.
    pub fn by_ean(&self, ean: &str) -> Option<&IndexedEntry> {
        let digits: String = listguard_common::models::normalize_ean(Some(ean))?;
        self.by_ean.get(&digits).map(|idx| &self.entries[*idx])
    }

    pub fn get(&self, id: &str) -> Option<&IndexedEntry> {
        self.entries.iter().find(|indexed| indexed.entry.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display names of every catalog brand.
    pub fn brands(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|indexed| indexed.entry.brand.as_str())
    }
}
