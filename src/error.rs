//! Error types for the vicinity crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, VicinityError>;

/// All failure modes of the search pipeline.
///
/// Data-level problems (a single malformed feature) are isolated by the
/// preprocessor and never abort a batch; infrastructure-level problems
/// (artifact I/O, invalid query parameters) abort the current invocation.
#[derive(Debug, Error)]
pub enum VicinityError {
    /// A geojson feature without usable point coordinates.
    #[error("malformed feature: {0}")]
    MalformedFeature(String),

    /// The cache artifact is absent, unreadable, or corrupt. Recoverable:
    /// the caller rebuilds the index from source data.
    #[error("cache miss at {}: {reason}", .path.display())]
    CacheMiss { path: PathBuf, reason: String },

    /// The cache artifact could not be written. Surfaced, never retried.
    #[error("failed to persist index at {}: {reason}", .path.display())]
    Persistence { path: PathBuf, reason: String },

    /// Query parameters outside the valid geographic domain.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Source data could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source data is not valid geojson.
    #[error("invalid geojson: {0}")]
    Geojson(#[from] geojson::Error),
}
