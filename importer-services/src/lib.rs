//! Business logic for the XML content importer
//!
//! Provides the SQLite-backed content store and the import orchestrator
//! that drives parse -> upsert -> extract -> fetch/attach for each feed
//! item.

pub mod importer;
pub mod store;

pub use importer::{Importer, ImporterConfig};
pub use store::SqliteContentStore;
