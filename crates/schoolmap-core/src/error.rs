// crates/schoolmap-core/src/error.rs
use thiserror::Error;

/// Errors surfaced by the core crate.
///
/// Nothing in the interactive path (filtering, map sync) propagates these to
/// the end user; they are logged and the operation degrades to a no-op.
/// They do surface from loaders and from the CLI.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The cache document parsed as JSON but is not an array of records.
    #[error("invalid cache snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
