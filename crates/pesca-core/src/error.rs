//! Core error types.

use thiserror::Error;

/// Catalog errors.
#[derive(Debug, Error)]
pub enum Error {
    /// An embedded data file is missing from the build.
    #[error("catalog asset not found: {0}")]
    MissingAsset(String),

    /// An embedded data file could not be decoded.
    #[error("invalid catalog data in {file}: {source}")]
    InvalidAsset {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two records share the same identifier.
    #[error("duplicate {kind} identifier: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// Unknown document category.
    #[error("invalid document category: {0}")]
    InvalidCategory(String),

    /// Unknown conservation status.
    #[error("invalid conservation status: {0}")]
    InvalidStatus(String),

    /// Unknown closed-season kind or status.
    #[error("invalid closed season filter: {0}")]
    InvalidSeasonFilter(String),

    /// Malformed month/day value.
    #[error("invalid month/day: {0}")]
    InvalidMonthDay(String),

    /// Month outside 1..=12 or year out of range.
    #[error("invalid calendar month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
