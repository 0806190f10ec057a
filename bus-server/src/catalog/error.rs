//! Catalog error types.

use crate::domain::ServiceNo;

/// Errors that can occur when reading from a bus catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Failed to read a snapshot file
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The service is not known to the catalog
    #[error("unknown bus service {0}")]
    UnknownService(ServiceNo),

    /// Catalog data is inconsistent (duplicates, dangling references)
    #[error("invalid catalog data: {0}")]
    InvalidData(String),
}
