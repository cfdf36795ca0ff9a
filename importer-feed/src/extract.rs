//! Image reference extraction from body markup
//!
//! Pattern-based, not a structured HTML parse: this mirrors the import
//! pipeline's permissive matching and is a known limitation on malformed
//! or unusual markup. Duplicate URLs are intentionally kept; each
//! occurrence is processed independently downstream.

use std::sync::LazyLock;

use regex::Regex;

/// Case-insensitive `<img ... src=...>` matcher; tolerates extra
/// attributes and quoted or unquoted src values.
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src=['"]?([^'" >]+)['"]?[^>]*>"#)
        .expect("img src pattern is valid")
});

/// Extract image URLs from body markup in order of appearance.
///
/// Returns an empty vec (never an error) when the body has no image
/// references.
pub fn extract_image_urls(body: &str) -> Vec<String> {
    IMG_SRC
        .captures_iter(body)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_order_of_appearance() {
        let body = r#"<p>intro</p><img src="http://x/a.jpg"><img src='http://x/b.png'>"#;
        assert_eq!(
            extract_image_urls(body),
            vec!["http://x/a.jpg", "http://x/b.png"]
        );
    }

    #[test]
    fn matches_unquoted_src() {
        let body = r#"<img src=http://x/c.gif alt="c">"#;
        assert_eq!(extract_image_urls(body), vec!["http://x/c.gif"]);
    }

    #[test]
    fn tag_name_and_attribute_are_case_insensitive() {
        let body = r#"<IMG SRC="http://x/d.webp">"#;
        assert_eq!(extract_image_urls(body), vec!["http://x/d.webp"]);
    }

    #[test]
    fn tolerates_extra_attributes() {
        let body = r#"<img class="hero" data-id="7" src="http://x/e.jpg" loading="lazy">"#;
        assert_eq!(extract_image_urls(body), vec!["http://x/e.jpg"]);
    }

    #[test]
    fn duplicates_are_not_deduplicated() {
        let body = r#"<img src="http://x/a.jpg"><img src="http://x/a.jpg">"#;
        assert_eq!(
            extract_image_urls(body),
            vec!["http://x/a.jpg", "http://x/a.jpg"]
        );
    }

    #[test]
    fn body_without_images_yields_empty() {
        assert!(extract_image_urls("<p>plain text only</p>").is_empty());
        assert!(extract_image_urls("").is_empty());
    }
}
