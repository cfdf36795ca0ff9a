//! Error taxonomy for the importer
//!
//! `FeedError` is fatal for a whole import run. `FetchError` covers the
//! three per-image failure modes, all of which are skipped by the
//! orchestrator. `StoreError` surfaces from the content store.

use thiserror::Error;

/// Errors raised while reading or parsing a feed document (fatal)
#[derive(Debug, Error)]
pub enum FeedError {
    /// Could not read the input file
    #[error("Failed to read feed: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not well-formed or lacks the channel/item structure
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors raised by the content store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(String),

    /// Filesystem failure while persisting media
    #[error("I/O error: {0}")]
    Io(String),

    /// Store lock poisoned
    #[error("Storage lock poisoned")]
    Lock,
}

/// Per-image failure modes, skipped by the orchestrator
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network error or non-success HTTP status
    #[error("Download failed: {0}")]
    Download(String),

    /// File type could not be inferred or is disallowed
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    /// Store rejected the attachment
    #[error("Attach failed: {0}")]
    Attach(#[from] StoreError),
}

/// Fatal errors at the orchestrator edge
#[derive(Debug, Error)]
pub enum ImportError {
    /// Feed could not be read or parsed; nothing was written
    #[error(transparent)]
    Feed(#[from] FeedError),
}
