//! Registry API: add, remove and list document sources.
//!
//! Thin validation layer over [`DocumentStore`]. URLs are only trimmed here;
//! their shape is checked again by the fetcher on every pass.

use std::collections::BTreeMap;

use crate::Error;
use crate::store::{DocId, DocumentStore};

/// Register `url` under `id`, replacing any URL already stored there.
///
/// # Errors
///
/// Returns `Error::InvalidInput` for id 0 or a blank URL.
pub async fn add_or_update(store: &dyn DocumentStore, id: DocId, url: &str) -> Result<(), Error> {
    check_id(id)?;
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()));
    }

    store.upsert_source(id, url).await?;
    tracing::info!(doc_id = id, url, "document source saved");
    Ok(())
}

/// Remove a document and everything cached for it.
///
/// Returns false when nothing was registered under `id`.
pub async fn remove(store: &dyn DocumentStore, id: DocId) -> Result<bool, Error> {
    check_id(id)?;
    let removed = store.remove_document(id).await?;
    tracing::info!(doc_id = id, removed, "document source removed");
    Ok(removed)
}

/// All registered sources, ascending by id.
pub async fn list_all(store: &dyn DocumentStore) -> Result<BTreeMap<DocId, String>, Error> {
    store.list_sources().await
}

fn check_id(id: DocId) -> Result<(), Error> {
    if id == 0 {
        return Err(Error::InvalidInput("document id must be at least 1".into()));
    }
    Ok(())
}
