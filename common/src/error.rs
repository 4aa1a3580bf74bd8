use thiserror::Error;

/// Contract violations that make an audit impossible.
///
/// Heuristic uncertainty (unreadable volumes, missing brands, zero prices) is never
/// reported through this type; it travels inside the audit report instead.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EngineError {
    /// The engine was built without a single catalog entry.
    #[error("catalog is empty, nothing to audit against")]
    EmptyCatalog,
    /// A catalog entry declares zero units per pack.
    #[error("catalog entry '{id}' declares zero units per pack")]
    InvalidUnitsPerPack { id: String },
    /// Two catalog entries share the same identifier.
    #[error("catalog identifier '{id}' is declared more than once")]
    DuplicateId { id: String },
    /// Two catalog entries claim the same EAN.
    #[error("EAN {ean} is declared by both '{first}' and '{second}'")]
    DuplicateEan {
        ean: String,
        first: String,
        second: String,
    },
    /// The listing handed to the engine has a blank title.
    #[error("listing has no title")]
    MissingTitle,
    /// A policy constant is outside its meaningful range.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
}
