//! Core types for the XML content importer
//!
//! This crate defines the shared data structures used across the importer,
//! including content records, media assets, the error taxonomy, and the
//! collaborator traits (content store, image source) that the orchestrator
//! is constructed with.

pub mod content;
pub mod error;
pub mod media;
pub mod store;

pub use content::{
    ContentFields, ContentKind, ContentRecord, ContentStatus, FeedItem, ImportReport, RecordId,
};
pub use error::{FeedError, FetchError, ImportError, StoreError};
pub use media::{AssetId, MediaAsset, TempDownload};
pub use store::{ContentStore, ImageSource};
