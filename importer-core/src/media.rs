//! Media asset data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use crate::content::RecordId;

/// Identifier of an attached media asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub i64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A media asset attached to a content record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: AssetId,
    /// Record this asset belongs to
    pub record_id: RecordId,
    /// URL the asset was downloaded from
    pub source_url: String,
    /// Path of the persisted file in the media directory
    pub file_path: PathBuf,
    /// MIME type inferred from the filename
    pub mime_type: String,
}

/// A downloaded image spooled to a temporary file, not yet attached.
///
/// The temp file is owned by this struct; dropping it before attachment
/// removes the file, so every failure path cleans up automatically.
#[derive(Debug)]
pub struct TempDownload {
    /// Spooled response body
    pub file: NamedTempFile,
    /// URL the bytes came from
    pub source_url: String,
    /// Filename derived from the URL path, used for type inference
    pub file_name: String,
}
