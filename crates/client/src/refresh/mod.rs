//! Refresh pipeline: fetch every registered document and keep the store current.
//!
//! ### Pass semantics
//! - Documents are processed one at a time, ascending by id.
//! - A successful fetch writes content and timestamp together.
//! - A failed fetch leaves the stored entry untouched (last known good) and
//!   becomes a line in the [`RefreshReport`]; it never stops the pass.
//! - Store errors are not per-document failures and end the pass with `Err`.
//!
//! ### Single flight
//! At most one pass runs at a time. [`Refresher::refresh_all`] waits for a
//! running pass to finish, [`Refresher::try_refresh_all`] skips instead.

pub mod report;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use docmirror_core::{DocId, DocumentStore, Error, RecordOutcome};
use tokio::sync::Mutex;

use crate::fetch::Fetcher;

pub use report::{EntryFailure, RefreshReport, RefreshSummary};
pub use scheduler::Scheduler;

/// Runs refresh passes over the document store.
pub struct Refresher {
    store: Arc<dyn DocumentStore>,
    fetcher: Arc<dyn Fetcher>,
    pause: Duration,
    pass: Mutex<()>,
}

impl Refresher {
    pub fn new(store: Arc<dyn DocumentStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { store, fetcher, pause: Duration::ZERO, pass: Mutex::new(()) }
    }

    /// Sleep between consecutive fetches of a pass (default: none).
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Whether a pass is currently running.
    pub fn is_running(&self) -> bool {
        self.pass.try_lock().is_err()
    }

    /// Run one pass over every registered document, waiting for any pass
    /// already in progress to finish first.
    pub async fn refresh_all(&self) -> Result<RefreshReport, Error> {
        let _pass = self.pass.lock().await;
        let entries = self.store.list_sources().await?;
        self.run_pass(&entries).await
    }

    /// Like [`refresh_all`](Self::refresh_all), but returns `Ok(None)`
    /// without doing anything when a pass is already running.
    pub async fn try_refresh_all(&self) -> Result<Option<RefreshReport>, Error> {
        let Ok(_pass) = self.pass.try_lock() else {
            return Ok(None);
        };
        let entries = self.store.list_sources().await?;
        self.run_pass(&entries).await.map(Some)
    }

    /// Run one pass over an explicit id to URL mapping.
    pub async fn refresh_entries(&self, entries: &BTreeMap<DocId, String>) -> Result<RefreshReport, Error> {
        let _pass = self.pass.lock().await;
        self.run_pass(entries).await
    }

    async fn run_pass(&self, entries: &BTreeMap<DocId, String>) -> Result<RefreshReport, Error> {
        let mut report = RefreshReport::begin(Utc::now());
        tracing::debug!(entries = entries.len(), "refresh pass started");

        for (i, (&id, url)) in entries.iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            match self.fetcher.fetch(url).await {
                Ok(doc) => match self.store.record_success(id, &doc.content, Utc::now()).await? {
                    RecordOutcome::Changed => {
                        tracing::debug!(
                            doc_id = id,
                            url = %doc.final_url,
                            raw_bytes = doc.raw_bytes,
                            elapsed_ms = doc.fetch_ms,
                            "document updated"
                        );
                        report.succeeded += 1;
                    }
                    RecordOutcome::Unchanged => {
                        tracing::debug!(doc_id = id, url = %doc.final_url, elapsed_ms = doc.fetch_ms, "document unchanged");
                        report.succeeded += 1;
                        report.unchanged += 1;
                    }
                    RecordOutcome::Missing => {
                        tracing::debug!(doc_id = id, "document removed during pass, discarding fetched content");
                        report.skipped += 1;
                    }
                },
                Err(reason) => {
                    tracing::warn!(
                        doc_id = id,
                        url = %url,
                        error = %reason,
                        "fetch failed, keeping last known good content"
                    );
                    report.failures.push(EntryFailure { id, url: url.clone(), reason });
                }
            }
        }

        report.finished_at = Utc::now();
        tracing::info!(
            succeeded = report.succeeded,
            unchanged = report.unchanged,
            failed = report.failed(),
            skipped = report.skipped,
            elapsed_ms = report.elapsed_ms(),
            summary = report.summary().as_str(),
            "refresh pass finished"
        );

        Ok(report)
    }
}
