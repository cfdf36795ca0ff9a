//! Feed document parser
//!
//! Reads an RSS-style document (a `<channel>` with repeated `<item>`
//! elements) into a materialized list of [`FeedItem`]s. The whole
//! document is parsed before the caller performs any writes, so a parse
//! failure has zero side effects.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use importer_core::{FeedError, FeedItem};

/// Parse a feed file into items.
///
/// Fails with [`FeedError::Io`] if the file cannot be read and
/// [`FeedError::Parse`] if the document is malformed; both are fatal for
/// the import.
pub fn parse_feed(path: &Path) -> Result<Vec<FeedItem>, FeedError> {
    let file = File::open(path)?;
    parse_feed_from_reader(BufReader::new(file))
}

/// Parse a feed from any buffered reader.
pub fn parse_feed_from_reader<R: BufRead>(reader: R) -> Result<Vec<FeedItem>, FeedError> {
    let channel = rss::Channel::read_from(reader).map_err(|e| FeedError::Parse(e.to_string()))?;

    let items: Vec<FeedItem> = channel
        .items()
        .iter()
        .map(|item| FeedItem {
            // Missing elements map to empty strings, matching the
            // best-effort semantics of the feed format.
            title: item.title().unwrap_or_default().to_string(),
            body: item.description().unwrap_or_default().to_string(),
        })
        .collect();

    debug!("Parsed {} feed items", items.len());
    Ok(items)
}
