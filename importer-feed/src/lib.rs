//! Feed parsing and image reference extraction
//!
//! This crate turns an uploaded XML feed into [`FeedItem`]s and scans
//! item bodies for embedded `<img>` references. Parsing is strict at the
//! document level (a malformed feed fails the whole import); extraction
//! is deliberately permissive pattern matching over the body markup.

pub mod extract;
pub mod parser;

pub use extract::extract_image_urls;
pub use parser::{parse_feed, parse_feed_from_reader};

pub use importer_core::FeedItem;
