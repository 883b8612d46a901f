//! Scripted fetcher and store for driving refresh passes in tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docmirror_core::{DocId, DocumentEntry, DocumentStore, Error, MemoryStore, RecordOutcome};
use reqwest::Url;
use tokio::sync::Notify;

use crate::fetch::{FetchFailure, FetchedDocument, Fetcher};

#[derive(Default)]
pub(crate) struct FakeFetcher {
    responses: Mutex<HashMap<String, Result<String, FetchFailure>>>,
    calls: Mutex<Vec<String>>,
    delay: Duration,
    gate: Option<Arc<Notify>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, url: &str, response: Result<&str, FetchFailure>) -> Self {
        self.set_response(url, response);
        self
    }

    pub(crate) fn set_response(&self, url: &str, response: Result<&str, FetchFailure>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response.map(str::to_string));
    }

    /// Every fetch sleeps this long before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every fetch waits for a permit on `gate` before answering.
    pub(crate) fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchFailure> {
        self.calls.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let response = self
            .responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchFailure::Transport("no scripted response".into())));

        response.map(|content| FetchedDocument {
            final_url: Url::parse(url).unwrap(),
            raw_bytes: content.len(),
            content,
            fetch_ms: 0,
        })
    }
}

/// Memory store whose writes for one id fail as if the database went away.
pub(crate) struct FailingStore {
    inner: MemoryStore,
    fail_on: DocId,
}

impl FailingStore {
    pub(crate) fn new(inner: MemoryStore, fail_on: DocId) -> Self {
        Self { inner, fail_on }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn list_sources(&self) -> Result<BTreeMap<DocId, String>, Error> {
        self.inner.list_sources().await
    }

    async fn upsert_source(&self, id: DocId, url: &str) -> Result<(), Error> {
        self.inner.upsert_source(id, url).await
    }

    async fn remove_document(&self, id: DocId) -> Result<bool, Error> {
        self.inner.remove_document(id).await
    }

    async fn get_document(&self, id: DocId) -> Result<Option<DocumentEntry>, Error> {
        self.inner.get_document(id).await
    }

    async fn record_success(
        &self, id: DocId, content: &str, fetched_at: DateTime<Utc>,
    ) -> Result<RecordOutcome, Error> {
        if id == self.fail_on {
            return Err(Error::Database(tokio_rusqlite::Error::ConnectionClosed));
        }
        self.inner.record_success(id, content, fetched_at).await
    }
}
