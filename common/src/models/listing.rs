use serde::{Deserialize, Deserializer, Serialize};

/// A raw marketplace listing. Untrusted and read-only for the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Declared price in marketplace currency; absent or `null` prices read as `0`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, alias = "ean_published")]
    pub ean: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: ListingAttributes,
}

/// Optional structured attributes, harvested from the listing page.
///
/// Key names drifted across harvester revisions; the Spanish and legacy spellings
/// are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingAttributes {
    #[serde(alias = "marca", alias = "brand_detected")]
    pub brand: Option<String>,
    #[serde(
        alias = "weight",
        alias = "peso_neto",
        alias = "contenido_neto",
        alias = "volumen"
    )]
    pub net_content: Option<String>,
    #[serde(
        alias = "unidades_por_pack",
        alias = "unidades_por_envase",
        deserialize_with = "text_or_number"
    )]
    pub units_per_pack: Option<String>,
    #[serde(alias = "etapa")]
    pub stage: Option<String>,
    #[serde(alias = "sustancia")]
    pub substance: Option<String>,
    #[serde(alias = "categoria")]
    pub category: Option<String>,
    #[serde(alias = "seller")]
    pub seller_name: Option<String>,
    pub seller_reputation: Option<String>,
    #[serde(alias = "is_official_store", deserialize_with = "null_as_default")]
    pub official_store: bool,
}

impl Listing {
    pub fn new(title: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            price,
            ..Self::default()
        }
    }

    pub fn with_ean(mut self, ean: impl Into<String>) -> Self {
        self.ean = Some(ean.into());
        self
    }

    pub fn with_attributes(mut self, attributes: ListingAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// The declared brand, ignoring blank values.
    pub fn declared_brand(&self) -> Option<&str> {
        self.attributes
            .brand
            .as_deref()
            .map(str::trim)
            .filter(|brand| !brand.is_empty())
    }
}

/// Harvesters write `null` for fields they could not read.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<TextOrNumber> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Integer(n) => n.to_string(),
        TextOrNumber::Float(n) => n.to_string(),
    }))
}
