//! In-memory document store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{DocId, DocumentEntry, DocumentStore, RecordOutcome, format_timestamp};
use crate::Error;
use crate::cache::hash::content_digest;

/// Process-local store backed by a `BTreeMap`.
///
/// Nothing survives a restart. Useful for embedding and for driving the
/// refresh pipeline in tests without SQLite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<DocId, DocumentEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_sources(&self) -> Result<BTreeMap<DocId, String>, Error> {
        let entries = self.entries.read().await;
        Ok(entries.iter().map(|(id, e)| (*id, e.source_url.clone())).collect())
    }

    async fn upsert_source(&self, id: DocId, url: &str) -> Result<(), Error> {
        let now = format_timestamp(Utc::now());
        let mut entries = self.entries.write().await;
        entries
            .entry(id)
            .and_modify(|e| {
                e.source_url = url.to_string();
                e.updated_at = now.clone();
            })
            .or_insert_with(|| DocumentEntry {
                id,
                source_url: url.to_string(),
                content: None,
                content_sha256: None,
                fetched_at: None,
                created_at: now.clone(),
                updated_at: now.clone(),
            });
        Ok(())
    }

    async fn remove_document(&self, id: DocId) -> Result<bool, Error> {
        Ok(self.entries.write().await.remove(&id).is_some())
    }

    async fn get_document(&self, id: DocId) -> Result<Option<DocumentEntry>, Error> {
        Ok(self.entries.read().await.get(&id).cloned())
    }

    async fn record_success(
        &self, id: DocId, content: &str, fetched_at: DateTime<Utc>,
    ) -> Result<RecordOutcome, Error> {
        let digest = content_digest(content);
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(&id) else {
            return Ok(RecordOutcome::Missing);
        };

        let outcome = if entry.content_sha256.as_deref() == Some(digest.as_str()) {
            RecordOutcome::Unchanged
        } else {
            RecordOutcome::Changed
        };

        entry.content = Some(content.to_string());
        entry.content_sha256 = Some(digest);
        entry.fetched_at = Some(format_timestamp(fetched_at));
        Ok(outcome)
    }
}
