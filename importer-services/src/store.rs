//! SQLite-backed content store
//!
//! Records and media asset rows live in SQLite; attached files are
//! persisted into a media directory. One connection behind a mutex,
//! one write at a time.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use importer_core::{
    AssetId, ContentFields, ContentKind, ContentRecord, ContentStatus, ContentStore, MediaAsset,
    RecordId, StoreError, TempDownload,
};

/// Content and media storage backed by SQLite plus a media directory
pub struct SqliteContentStore {
    conn: Mutex<Connection>,
    media_dir: PathBuf,
}

impl SqliteContentStore {
    /// Open (or create) the database and media directory.
    pub fn new<P: AsRef<Path>>(db_path: P, media_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("Failed to create database directory: {}", e)))?;
        }

        let conn = Connection::open(db_path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::with_connection(conn, media_dir)
    }

    /// Create an in-memory store (useful for testing)
    pub fn new_in_memory(media_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::with_connection(conn, media_dir)
    }

    fn with_connection(conn: Connection, media_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let media_dir = media_dir.into();
        std::fs::create_dir_all(&media_dir)
            .map_err(|e| StoreError::Io(format!("Failed to create media directory: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
            media_dir,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                status TEXT NOT NULL,
                author TEXT NOT NULL,
                kind TEXT NOT NULL,
                featured_asset_id INTEGER,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_records_title
            ON records(kind, title);

            CREATE TABLE IF NOT EXISTS media_assets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                record_id INTEGER NOT NULL REFERENCES records(id),
                source_url TEXT NOT NULL,
                file_path TEXT NOT NULL,
                mime_type TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_media_record
            ON media_assets(record_id);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Load a record by id
    pub fn get_record(&self, id: RecordId) -> Result<Option<ContentRecord>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;

        conn.query_row(
            r#"
            SELECT id, title, body, status, author, kind, created_at, updated_at
            FROM records WHERE id = ?1
            "#,
            params![id.0],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, i64>(6)?,
                    row.get::<_, i64>(7)?,
                ))
            },
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))?
        .map(|(id, title, body, status, author, kind, created_at, updated_at)| {
            Ok(ContentRecord {
                id: RecordId(id),
                title,
                body,
                status: parse_status(&status)?,
                author,
                kind: parse_kind(&kind)?,
                created_at: timestamp_to_datetime(created_at),
                updated_at: timestamp_to_datetime(updated_at),
            })
        })
        .transpose()
    }

    /// Featured asset of a record, if one has been set
    pub fn featured_asset(&self, record_id: RecordId) -> Result<Option<AssetId>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;

        let asset: Option<Option<i64>> = conn
            .query_row(
                "SELECT featured_asset_id FROM records WHERE id = ?1",
                params![record_id.0],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(asset.flatten().map(AssetId))
    }

    /// All media assets attached to a record, in attachment order
    pub fn media_for_record(&self, record_id: RecordId) -> Result<Vec<MediaAsset>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;

        let mut stmt = conn
            .prepare(
                r#"
                SELECT id, record_id, source_url, file_path, mime_type
                FROM media_assets WHERE record_id = ?1 ORDER BY id
                "#,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let assets = stmt
            .query_map(params![record_id.0], |row| {
                Ok(MediaAsset {
                    id: AssetId(row.get(0)?),
                    record_id: RecordId(row.get(1)?),
                    source_url: row.get(2)?,
                    file_path: PathBuf::from(row.get::<_, String>(3)?),
                    mime_type: row.get(4)?,
                })
            })
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(assets)
    }

    /// Pick a destination path in the media dir that does not collide
    /// with an existing file.
    fn unique_destination(&self, file_name: &str) -> PathBuf {
        // Defend against path components smuggled in the name.
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("asset");

        let candidate = self.media_dir.join(name);
        if !candidate.exists() {
            return candidate;
        }

        let (stem, ext) = match name.rsplit_once('.') {
            Some((s, e)) => (s, Some(e)),
            None => (name, None),
        };

        let mut n = 1;
        loop {
            let next = match ext {
                Some(ext) => format!("{}-{}.{}", stem, n, ext),
                None => format!("{}-{}", stem, n),
            };
            let candidate = self.media_dir.join(next);
            if !candidate.exists() {
                return candidate;
            }
            n += 1;
        }
    }
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn find_record_by_title(
        &self,
        title: &str,
        kind: ContentKind,
    ) -> Result<Option<RecordId>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;

        let id: Option<i64> = conn
            .query_row(
                "SELECT id FROM records WHERE kind = ?1 AND title = ?2 ORDER BY id LIMIT 1",
                params![kind.as_str(), title],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(id.map(RecordId))
    }

    async fn create_record(&self, fields: &ContentFields) -> Result<RecordId, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;

        let now = Utc::now().timestamp();
        conn.execute(
            r#"
            INSERT INTO records (title, body, status, author, kind, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
            params![
                fields.title,
                fields.body,
                fields.status.as_str(),
                fields.author,
                fields.kind.as_str(),
                now,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let id = RecordId(conn.last_insert_rowid());
        debug!("Created record {} ('{}')", id, fields.title);
        Ok(id)
    }

    async fn update_record(&self, id: RecordId, fields: &ContentFields) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;

        conn.execute(
            r#"
            UPDATE records
            SET title = ?1, body = ?2, status = ?3, author = ?4, updated_at = ?5
            WHERE id = ?6
            "#,
            params![
                fields.title,
                fields.body,
                fields.status.as_str(),
                fields.author,
                Utc::now().timestamp(),
                id.0,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        debug!("Updated record {} ('{}')", id, fields.title);
        Ok(())
    }

    async fn attach_media(
        &self,
        record_id: RecordId,
        download: TempDownload,
        mime_type: &str,
    ) -> Result<AssetId, StoreError> {
        let dest = self.unique_destination(&download.file_name);

        std::fs::copy(download.file.path(), &dest)
            .map_err(|e| StoreError::Io(format!("Failed to persist media file: {}", e)))?;

        let insert = {
            let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
            conn.execute(
                r#"
                INSERT INTO media_assets (record_id, source_url, file_path, mime_type, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    record_id.0,
                    download.source_url,
                    dest.to_string_lossy(),
                    mime_type,
                    Utc::now().timestamp(),
                ],
            )
            .map(|_| AssetId(conn.last_insert_rowid()))
        };

        match insert {
            Ok(asset_id) => {
                debug!(
                    "Attached {} to record {} as asset {}",
                    download.source_url, record_id, asset_id
                );
                // `download` drops here, removing the temp file.
                Ok(asset_id)
            }
            Err(e) => {
                // No row was written; remove the persisted copy too.
                let _ = std::fs::remove_file(&dest);
                Err(StoreError::Database(e.to_string()))
            }
        }
    }

    async fn set_featured(&self, record_id: RecordId, asset_id: AssetId) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;

        conn.execute(
            "UPDATE records SET featured_asset_id = ?1 WHERE id = ?2",
            params![asset_id.0, record_id.0],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        debug!("Set asset {} as featured for record {}", asset_id, record_id);
        Ok(())
    }
}

fn parse_status(s: &str) -> Result<ContentStatus, StoreError> {
    match s {
        "published" => Ok(ContentStatus::Published),
        "draft" => Ok(ContentStatus::Draft),
        other => Err(StoreError::Database(format!("Unknown status: {}", other))),
    }
}

fn parse_kind(s: &str) -> Result<ContentKind, StoreError> {
    match s {
        "post" => Ok(ContentKind::Post),
        "page" => Ok(ContentKind::Page),
        other => Err(StoreError::Database(format!("Unknown kind: {}", other))),
    }
}

fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn test_store() -> (SqliteContentStore, tempfile::TempDir) {
        let media_dir = tempfile::tempdir().unwrap();
        let store = SqliteContentStore::new_in_memory(media_dir.path()).unwrap();
        (store, media_dir)
    }

    fn fields(title: &str, body: &str) -> ContentFields {
        ContentFields {
            title: title.to_string(),
            body: body.to_string(),
            status: ContentStatus::Published,
            author: "tester".to_string(),
            kind: ContentKind::Post,
        }
    }

    fn download(name: &str, bytes: &[u8]) -> TempDownload {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        TempDownload {
            file,
            source_url: format!("http://x/{}", name),
            file_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_find_by_exact_title() {
        let (store, _media) = test_store();

        let id = store.create_record(&fields("Launch Day", "body")).await.unwrap();

        let found = store
            .find_record_by_title("Launch Day", ContentKind::Post)
            .await
            .unwrap();
        assert_eq!(found, Some(id));

        // Exact match only; no trimming or case folding.
        assert!(store
            .find_record_by_title("launch day", ContentKind::Post)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_record_by_title("Launch Day ", ContentKind::Post)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn lookup_is_scoped_to_kind() {
        let (store, _media) = test_store();

        let mut page = fields("About", "body");
        page.kind = ContentKind::Page;
        store.create_record(&page).await.unwrap();

        assert!(store
            .find_record_by_title("About", ContentKind::Post)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_record_by_title("About", ContentKind::Page)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn update_overwrites_mutable_fields() {
        let (store, _media) = test_store();

        let id = store.create_record(&fields("Post", "old body")).await.unwrap();
        store.update_record(id, &fields("Post", "new body")).await.unwrap();

        let record = store.get_record(id).unwrap().unwrap();
        assert_eq!(record.body, "new body");
        assert_eq!(record.status, ContentStatus::Published);
    }

    #[tokio::test]
    async fn duplicate_titles_resolve_to_earliest_record() {
        let (store, _media) = test_store();

        let first = store.create_record(&fields("Same", "a")).await.unwrap();
        let _second = store.create_record(&fields("Same", "b")).await.unwrap();

        let found = store
            .find_record_by_title("Same", ContentKind::Post)
            .await
            .unwrap();
        assert_eq!(found, Some(first));
    }

    #[tokio::test]
    async fn attach_media_persists_file_and_row() {
        let (store, media_dir) = test_store();

        let id = store.create_record(&fields("Post", "body")).await.unwrap();
        let asset_id = store
            .attach_media(id, download("a.jpg", b"jpegbytes"), "image/jpeg")
            .await
            .unwrap();

        let assets = store.media_for_record(id).unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, asset_id);
        assert_eq!(assets[0].mime_type, "image/jpeg");
        assert_eq!(assets[0].source_url, "http://x/a.jpg");
        assert!(assets[0].file_path.starts_with(media_dir.path()));
        assert_eq!(std::fs::read(&assets[0].file_path).unwrap(), b"jpegbytes");
    }

    #[tokio::test]
    async fn attach_media_removes_the_temp_file() {
        let (store, _media) = test_store();

        let id = store.create_record(&fields("Post", "body")).await.unwrap();
        let dl = download("a.jpg", b"bytes");
        let temp_path = dl.file.path().to_path_buf();

        store.attach_media(id, dl, "image/jpeg").await.unwrap();
        assert!(!temp_path.exists());
    }

    #[tokio::test]
    async fn colliding_filenames_get_unique_destinations() {
        let (store, _media) = test_store();

        let id = store.create_record(&fields("Post", "body")).await.unwrap();
        store
            .attach_media(id, download("a.jpg", b"one"), "image/jpeg")
            .await
            .unwrap();
        store
            .attach_media(id, download("a.jpg", b"two"), "image/jpeg")
            .await
            .unwrap();

        let assets = store.media_for_record(id).unwrap();
        assert_eq!(assets.len(), 2);
        assert_ne!(assets[0].file_path, assets[1].file_path);
        assert_eq!(std::fs::read(&assets[1].file_path).unwrap(), b"two");
    }

    #[tokio::test]
    async fn set_featured_is_readable_back() {
        let (store, _media) = test_store();

        let id = store.create_record(&fields("Post", "body")).await.unwrap();
        assert_eq!(store.featured_asset(id).unwrap(), None);

        let asset_id = store
            .attach_media(id, download("a.jpg", b"bytes"), "image/jpeg")
            .await
            .unwrap();
        store.set_featured(id, asset_id).await.unwrap();

        assert_eq!(store.featured_asset(id).unwrap(), Some(asset_id));
    }
}
