//! Persistence error types.

use thiserror::Error;

/// Errors surfaced while saving or loading device documents.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem failure while reading or writing a document.
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),

    /// A document did not parse as the expected JSON shape.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// A parsed document describes an inconsistent network or geometry.
    #[error(transparent)]
    Core(#[from] nanonet_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
