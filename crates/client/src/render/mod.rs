//! Presentation of cached documents.
//!
//! Cached content was sanitized before it was stored and is emitted as is.
//! The timestamp is the only staleness signal a reader gets.

use docmirror_core::DocumentEntry;

/// Shown in place of content that has never been fetched successfully.
pub const NO_CONTENT: &str = "No content found for this document.";

/// Shown in place of the timestamp of a never-fetched document.
pub const NO_TIMESTAMP: &str = "No timestamp available.";

/// Render a cached document with its last update time.
///
/// `None` (unknown id) renders the same placeholders as a registered
/// document that has no content yet.
pub fn render_document(entry: Option<&DocumentEntry>) -> String {
    let content = entry.and_then(|e| e.content.as_deref()).unwrap_or(NO_CONTENT);
    let timestamp = match entry.and_then(|e| e.fetched_at.as_deref()) {
        Some(ts) => ammonia::clean_text(ts),
        None => NO_TIMESTAMP.to_string(),
    };

    format!(
        "<div class=\"gdoc-html-content\">\n<p class=\"gdoc-updated\"><strong>Updated:</strong> {timestamp}</p>\n{content}\n</div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: Option<&str>, fetched_at: Option<&str>) -> DocumentEntry {
        DocumentEntry {
            id: 1,
            source_url: "https://docs.google.com/document/d/one/export?format=html".into(),
            content: content.map(str::to_string),
            content_sha256: None,
            fetched_at: fetched_at.map(str::to_string),
            created_at: "2025-01-01T00:00:00Z".into(),
            updated_at: "2025-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_render_never_fetched() {
        let html = render_document(Some(&entry(None, None)));
        assert!(html.contains(NO_CONTENT));
        assert!(html.contains(NO_TIMESTAMP));
    }

    #[test]
    fn test_render_unknown_id() {
        let html = render_document(None);
        assert!(html.contains(NO_CONTENT));
        assert!(html.contains(NO_TIMESTAMP));
    }

    #[test]
    fn test_render_cached_content() {
        let html = render_document(Some(&entry(Some("<p>hi</p>"), Some("2025-06-01T12:00:00Z"))));
        assert!(html.starts_with("<div class=\"gdoc-html-content\">"));
        assert!(html.contains("<strong>Updated:</strong> 2025-06-01T12:00:00Z"));
        assert!(html.contains("\n<p>hi</p>\n"));
        assert!(!html.contains(NO_CONTENT));
    }

    #[test]
    fn test_render_escapes_timestamp() {
        let html = render_document(Some(&entry(Some("<p>hi</p>"), Some("<b>now</b>"))));
        assert!(!html.contains("<b>now</b>"));
    }
}
