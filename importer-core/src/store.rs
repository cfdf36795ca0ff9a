//! Collaborator traits the orchestrator is constructed with.
//!
//! The importer holds these behind `Arc<dyn ..>` so storage and network
//! are injected explicitly; there is no ambient global state.

use async_trait::async_trait;

use crate::content::{ContentFields, ContentKind, RecordId};
use crate::error::{FetchError, StoreError};
use crate::media::{AssetId, TempDownload};

/// External content/media store.
///
/// The store owns record persistence and the media directory. It is
/// assumed to serialize its own writes; the importer issues one call at
/// a time.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Find the first record whose title exactly equals `title`, scoped
    /// to one content kind. Best-effort lookup: duplicate titles collapse
    /// to the earliest record.
    async fn find_record_by_title(
        &self,
        title: &str,
        kind: ContentKind,
    ) -> Result<Option<RecordId>, StoreError>;

    /// Create a new record and return its identifier
    async fn create_record(&self, fields: &ContentFields) -> Result<RecordId, StoreError>;

    /// Overwrite the mutable fields of an existing record
    async fn update_record(&self, id: RecordId, fields: &ContentFields) -> Result<(), StoreError>;

    /// Persist a downloaded file as a media asset of `record_id`.
    ///
    /// Takes ownership of the temp download; on failure the temp file is
    /// dropped (and thereby removed) without leaving an asset behind.
    async fn attach_media(
        &self,
        record_id: RecordId,
        download: TempDownload,
        mime_type: &str,
    ) -> Result<AssetId, StoreError>;

    /// Designate `asset_id` as the featured asset of `record_id`
    async fn set_featured(&self, record_id: RecordId, asset_id: AssetId) -> Result<(), StoreError>;
}

/// Network collaborator that retrieves an image URL to a temp file
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch `url` and spool the body to a temporary file.
    ///
    /// Non-success statuses and transport errors map to
    /// [`FetchError::Download`] with no side effects.
    async fn fetch(&self, url: &str) -> Result<TempDownload, FetchError>;
}
