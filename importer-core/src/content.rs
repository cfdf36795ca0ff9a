//! Content record data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persisted content record (opaque to callers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publication status of a content record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    /// Visible to readers
    Published,
    /// Saved but not visible
    Draft,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Published => "published",
            ContentStatus::Draft => "draft",
        }
    }
}

/// Kind of content record; title lookup is scoped to one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Page,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Page => "page",
        }
    }
}

/// Mutable fields written by an upsert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFields {
    /// Record title (also the upsert lookup key)
    pub title: String,
    /// Body markup
    pub body: String,
    /// Publication status
    pub status: ContentStatus,
    /// Author attributed to the record
    pub author: String,
    /// Content kind
    pub kind: ContentKind,
}

/// A persisted content record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: RecordId,
    pub title: String,
    pub body: String,
    pub status: ContentStatus,
    pub author: String,
    pub kind: ContentKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One unit of a parsed feed, mapping to one content record.
///
/// Transient: produced by the parser, consumed by the orchestrator within
/// a single import pass. Missing feed elements map to empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// Plain-text title
    pub title: String,
    /// Body text, may contain image markup
    pub body: String,
}

/// Outcome summary returned by a completed import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// Items whose record was created or updated
    pub items_processed: usize,
    /// Media assets successfully downloaded and attached
    pub assets_attached: usize,
    /// Per-item and per-image failures that were skipped
    #[serde(default)]
    pub errors: Vec<String>,
}
