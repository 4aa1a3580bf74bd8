use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::text;

/// Physical presentation of a product; decides how declared volumes convert to mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Substance {
    Powder,
    Liquid,
    #[default]
    Unknown,
}

impl Substance {
    pub fn is_liquid(self) -> bool {
        matches!(self, Substance::Liquid)
    }

    /// Keeps `self` unless it is unknown, in which case `fallback` is used.
    pub fn or(self, fallback: Substance) -> Substance {
        match self {
            Substance::Unknown => fallback,
            known => known,
        }
    }
}

impl FromStr for Substance {
    type Err = std::convert::Infallible;

    /// Parses the catalog and marketplace spellings (`"Polvo"`, `"Líquido"`, `"liquid"`...).
    ///
    /// Anything unrecognized becomes [`Substance::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = text::normalize(s);
        let substance: Substance = if normalized.starts_with("liquid") {
            Substance::Liquid
        } else if normalized.starts_with("polvo")
            || normalized.starts_with("powder")
            || normalized.starts_with("solid")
        {
            Substance::Powder
        } else {
            Substance::Unknown
        };
        Ok(substance)
    }
}

impl From<String> for Substance {
    fn from(value: String) -> Self {
        match value.parse::<Substance>() {
            Ok(substance) => substance,
            Err(never) => match never {},
        }
    }
}

impl From<Substance> for String {
    fn from(value: Substance) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Substance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label: &str = match self {
            Substance::Powder => "powder",
            Substance::Liquid => "liquid",
            Substance::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// One authorized product of the master catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub brand: String,
    #[serde(alias = "product_name")]
    pub name: String,
    /// Net content of one authorized unit, in kilograms-equivalent.
    #[serde(default)]
    pub fc_net: Option<f64>,
    #[serde(default)]
    pub substance: Substance,
    #[serde(default = "one")]
    pub units_per_pack: u32,
    /// Minimum authorized price of one unit of this entry.
    #[serde(default)]
    pub list_price: Option<f64>,
    #[serde(default = "yes", alias = "is_publishable")]
    pub publishable: bool,
    #[serde(default = "yes")]
    pub discount_allowed: bool,
    #[serde(default)]
    pub ean: Option<String>,
    /// Declared life stage (e.g. `"Etapa 3"`).
    #[serde(default)]
    pub stage: Option<String>,
    /// Phrases that must not appear in a listing of this entry (`"vencida"`, `"regalo"`).
    #[serde(default, alias = "keywords_blacklist")]
    pub blacklist_keywords: Vec<String>,
}

fn one() -> u32 {
    1
}

fn yes() -> bool {
    true
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, brand: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            name: name.into(),
            fc_net: None,
            substance: Substance::Unknown,
            units_per_pack: 1,
            list_price: None,
            publishable: true,
            discount_allowed: true,
            ean: None,
            stage: None,
            blacklist_keywords: Vec::new(),
        }
    }

    /// Net content when it is declared and positive.
    pub fn declared_net(&self) -> Option<f64> {
        self.fc_net.filter(|net| *net > 0.0)
    }

    /// Minimum price when it is declared and positive.
    pub fn minimum_price(&self) -> Option<f64> {
        self.list_price.filter(|price| *price > 0.0)
    }

    /// The EAN reduced to its digits, if any remain.
    pub fn normalized_ean(&self) -> Option<String> {
        normalize_ean(self.ean.as_deref())
    }
}

/// Keeps only the digits of an EAN; blank codes become `None`.
pub fn normalize_ean(ean: Option<&str>) -> Option<String> {
    let digits: String = ean?.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() { None } else { Some(digits) }
}
