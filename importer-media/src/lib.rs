//! HTTP image fetching
//!
//! Implements the network side of the import pipeline: retrieving an
//! image URL to a temporary file and inferring its MIME type from the
//! filename. Attachment to the store happens downstream; every failure
//! here leaves no file behind.

pub mod fetcher;
pub mod mime;

pub use fetcher::{file_name_from_url, HttpImageSource};
pub use mime::infer_mime_type;
