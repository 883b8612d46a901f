//! HTML sanitization for fetched documents.
//!
//! ### Policy
//! - ammonia's default allow-list (the usual post-content tags: headings,
//!   lists, tables, inline formatting, links, images).
//! - Global presentational attributes exported documents depend on:
//!   `class`, `id`, `style`, `dir`, `align`, `role`.
//! - `<style>` blocks are kept with their rules untouched. Sources are
//!   operator-registered, so stylesheet text passes through unfiltered.
//! - `<script>` elements are dropped together with their content; event
//!   handler attributes and `javascript:` URLs never survive.

use std::collections::HashSet;
use std::sync::LazyLock;

use ammonia::Builder;

static POLICY: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::default();
    builder
        .add_tags(&["style"])
        .clean_content_tags(HashSet::from(["script"]))
        .add_generic_attributes(&["class", "id", "style", "dir", "align", "role"]);
    builder
});

/// Strip everything outside the document allow-list.
///
/// Never fails; hostile or empty input yields a (possibly empty) string.
/// Idempotent: `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw_html: &str) -> String {
    POLICY.clean(raw_html).to_string()
}
