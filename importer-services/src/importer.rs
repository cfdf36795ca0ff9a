//! Import orchestrator
//!
//! Drives the whole sequence for one uploaded feed: parse, upsert each
//! item, extract image URLs from its body, fetch and attach each, and
//! set the first successfully fetched image as the record's featured
//! asset. A parse failure aborts the run before anything is written;
//! no per-item or per-image failure aborts the batch.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use importer_core::{
    AssetId, ContentFields, ContentKind, ContentStatus, ContentStore, FeedItem, FetchError,
    ImageSource, ImportError, ImportReport, RecordId, StoreError,
};
use importer_feed::{extract_image_urls, parser};
use importer_media::infer_mime_type;

/// Configuration for the importer
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    /// Author attributed to created records
    pub author: String,
    /// Kind of record each feed item maps to
    pub kind: ContentKind,
    /// Status assigned on create and update
    pub status: ContentStatus,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            author: "importer".to_string(),
            kind: ContentKind::Post,
            status: ContentStatus::Published,
        }
    }
}

/// Import orchestrator, constructed with injected collaborators
pub struct Importer {
    store: Arc<dyn ContentStore>,
    images: Arc<dyn ImageSource>,
    config: ImporterConfig,
}

impl Importer {
    /// Create a new importer
    pub fn new(
        store: Arc<dyn ContentStore>,
        images: Arc<dyn ImageSource>,
        config: ImporterConfig,
    ) -> Self {
        Self {
            store,
            images,
            config,
        }
    }

    /// Run a full import of the feed file at `path`.
    ///
    /// Returns the report on completion; the only fatal error is a feed
    /// that cannot be read or parsed, in which case nothing was written.
    pub async fn import(&self, path: &Path) -> Result<ImportReport, ImportError> {
        let items = parser::parse_feed(path)?;
        info!("Importing {} items from {}", items.len(), path.display());

        let mut report = ImportReport::default();

        for item in items {
            let record_id = match self.upsert_item(&item).await {
                Ok(id) => id,
                Err(e) => {
                    warn!("Skipping item '{}': {}", item.title, e);
                    report.errors.push(format!("item '{}': {}", item.title, e));
                    continue;
                }
            };
            report.items_processed += 1;

            self.import_images(&item, record_id, &mut report).await;
        }

        info!(
            "Import finished: {} items processed, {} assets attached, {} errors",
            report.items_processed,
            report.assets_attached,
            report.errors.len()
        );
        Ok(report)
    }

    /// Create or update the record for one feed item, keyed by exact
    /// title match.
    async fn upsert_item(&self, item: &FeedItem) -> Result<RecordId, StoreError> {
        let fields = ContentFields {
            title: item.title.clone(),
            body: item.body.clone(),
            status: self.config.status,
            author: self.config.author.clone(),
            kind: self.config.kind,
        };

        match self
            .store
            .find_record_by_title(&item.title, self.config.kind)
            .await?
        {
            Some(id) => {
                self.store.update_record(id, &fields).await?;
                debug!("Updated record {} for '{}'", id, item.title);
                Ok(id)
            }
            None => {
                let id = self.store.create_record(&fields).await?;
                debug!("Created record {} for '{}'", id, item.title);
                Ok(id)
            }
        }
    }

    /// Fetch and attach every image referenced by the item's body; the
    /// first success becomes the featured asset.
    async fn import_images(&self, item: &FeedItem, record_id: RecordId, report: &mut ImportReport) {
        let mut featured_set = false;

        for url in extract_image_urls(&item.body) {
            match self.sideload_image(record_id, &url).await {
                Ok(asset_id) => {
                    report.assets_attached += 1;
                    if !featured_set {
                        if let Err(e) = self.store.set_featured(record_id, asset_id).await {
                            warn!("Failed to set featured asset for record {}: {}", record_id, e);
                            report
                                .errors
                                .push(format!("featured for record {}: {}", record_id, e));
                        }
                        // First successful fetch claims the featured
                        // slot whether or not the write stuck.
                        featured_set = true;
                    }
                }
                Err(e) => {
                    warn!("Skipping image {} for record {}: {}", url, record_id, e);
                    report.errors.push(format!("image {}: {}", url, e));
                }
            }
        }
    }

    /// Download one image, infer its type, and attach it to the record.
    async fn sideload_image(&self, record_id: RecordId, url: &str) -> Result<AssetId, FetchError> {
        let download = self.images.fetch(url).await?;

        let mime_type = infer_mime_type(&download.file_name)
            .ok_or_else(|| FetchError::UnsupportedType(download.file_name.clone()))?;

        let asset_id = self.store.attach_media(record_id, download, mime_type).await?;
        Ok(asset_id)
    }
}
