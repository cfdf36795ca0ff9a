//! Image download client

use std::io::Write;

use async_trait::async_trait;
use reqwest::Client;
use tempfile::NamedTempFile;
use tracing::debug;

use importer_core::{FetchError, ImageSource, TempDownload};

/// Reqwest-backed [`ImageSource`] with a bounded request timeout
pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    /// Create a new image source with a 30 second timeout per fetch
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .user_agent("ContentImporter/1.0")
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Create with a caller-configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpImageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<TempDownload, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Download(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Download(e.to_string()))?;

        let mut file =
            NamedTempFile::new().map_err(|e| FetchError::Download(e.to_string()))?;
        file.write_all(&bytes)
            .map_err(|e| FetchError::Download(e.to_string()))?;

        debug!("Downloaded {} bytes from {}", bytes.len(), url);

        Ok(TempDownload {
            file,
            source_url: url.to_string(),
            file_name: file_name_from_url(url),
        })
    }
}

/// Derive a filename from the last segment of a URL path, ignoring any
/// query string or fragment.
pub fn file_name_from_url(raw: &str) -> String {
    if let Ok(parsed) = url::Url::parse(raw) {
        // A trailing slash names a directory, not a file.
        if parsed.path().ends_with('/') {
            return String::new();
        }
        if let Some(segments) = parsed.path_segments() {
            if let Some(last) = segments.filter(|s| !s.is_empty()).last() {
                return last.to_string();
            }
        }
        return String::new();
    }

    // Not an absolute URL; fall back to the text after the last slash.
    let tail = raw.rsplit('/').next().unwrap_or(raw);
    let tail = tail.split(['?', '#']).next().unwrap_or(tail);
    tail.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_last_path_segment() {
        assert_eq!(file_name_from_url("http://x/a.jpg"), "a.jpg");
        assert_eq!(
            file_name_from_url("https://cdn.example.com/2024/05/photo.png"),
            "photo.png"
        );
    }

    #[test]
    fn query_string_is_ignored() {
        assert_eq!(
            file_name_from_url("http://x/img/b.webp?w=640&h=480"),
            "b.webp"
        );
    }

    #[test]
    fn directory_urls_yield_empty_name() {
        assert_eq!(file_name_from_url("http://x/images/"), "");
        assert_eq!(file_name_from_url("http://x/"), "");
    }

    #[test]
    fn relative_reference_uses_text_after_last_slash() {
        assert_eq!(file_name_from_url("/uploads/c.gif"), "c.gif");
        assert_eq!(file_name_from_url("d.jpeg?cache=1"), "d.jpeg");
    }
}
