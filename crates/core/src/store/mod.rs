//! Document store interface.
//!
//! The store exclusively owns persisted document state: the id to source URL
//! registry, the last known good content and the time it was fetched.
//! Consumers receive it as `Arc<dyn DocumentStore>`.

pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

pub use memory::MemoryStore;

/// Numeric document key as entered by the operator.
pub type DocId = u32;

/// One tracked external document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DocumentEntry {
    pub id: DocId,
    pub source_url: String,
    /// Sanitized HTML from the most recent successful fetch.
    pub content: Option<String>,
    pub content_sha256: Option<String>,
    /// RFC 3339 timestamp of the most recent successful fetch.
    pub fetched_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Result of writing freshly fetched content for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Content differs from the previous copy (or there was none).
    Changed,
    /// Same content as before; only the timestamp moved.
    Unchanged,
    /// The id is no longer registered, nothing was written.
    Missing,
}

/// Persistence for registered documents and their cached content.
///
/// `content`, `content_sha256` and `fetched_at` are only ever written
/// together, through [`DocumentStore::record_success`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All registered documents as id to source URL, ascending by id.
    async fn list_sources(&self) -> Result<BTreeMap<DocId, String>, Error>;

    /// Register a source URL, or replace the URL of an existing id.
    ///
    /// Cached content of a reused id stays until the next successful fetch.
    async fn upsert_source(&self, id: DocId, url: &str) -> Result<(), Error>;

    /// Remove a document with its cached content and timestamp.
    ///
    /// Returns false if nothing was registered under `id`.
    async fn remove_document(&self, id: DocId) -> Result<bool, Error>;

    /// Fetch a document entry by id.
    async fn get_document(&self, id: DocId) -> Result<Option<DocumentEntry>, Error>;

    /// Store content from a successful fetch together with its timestamp.
    async fn record_success(
        &self, id: DocId, content: &str, fetched_at: DateTime<Utc>,
    ) -> Result<RecordOutcome, Error>;
}

/// Timestamp format used for every stored time.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        let at = DateTime::parse_from_rfc3339("2025-03-01T10:15:30.250Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(at), "2025-03-01T10:15:30Z");
    }
}
