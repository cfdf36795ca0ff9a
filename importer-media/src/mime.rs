//! MIME type inference from filenames
//!
//! Type checking is by extension only, matching the import pipeline's
//! contract: a name whose extension is unknown or missing is rejected
//! before any attachment happens.

use std::path::Path;

/// Infer an image MIME type from a filename extension.
///
/// Returns `None` for unknown or missing extensions (the caller treats
/// that as an unsupported type).
pub fn infer_mime_type(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" | "jpe" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "ico" => Some("image/x-icon"),
        "tif" | "tiff" => Some("image/tiff"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_image_extensions_resolve() {
        assert_eq!(infer_mime_type("a.jpg"), Some("image/jpeg"));
        assert_eq!(infer_mime_type("b.png"), Some("image/png"));
        assert_eq!(infer_mime_type("c.gif"), Some("image/gif"));
        assert_eq!(infer_mime_type("d.webp"), Some("image/webp"));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(infer_mime_type("PHOTO.JPEG"), Some("image/jpeg"));
        assert_eq!(infer_mime_type("logo.SVG"), Some("image/svg+xml"));
    }

    #[test]
    fn unknown_or_missing_extension_is_rejected() {
        assert_eq!(infer_mime_type("archive.zip"), None);
        assert_eq!(infer_mime_type("script.php"), None);
        assert_eq!(infer_mime_type("noextension"), None);
        assert_eq!(infer_mime_type(""), None);
    }
}
