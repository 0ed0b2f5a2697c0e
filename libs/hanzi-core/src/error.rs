//! Error types for hanzi-core.

use thiserror::Error;

/// Result type alias using CatalogueError.
pub type Result<T> = std::result::Result<T, CatalogueError>;

/// Errors that can occur while loading a card catalogue.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("malformed catalogue JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalogue root must be a JSON object keyed by card")]
    NotAnObject,

    #[error("invalid card {key}: {source}")]
    InvalidCard {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
