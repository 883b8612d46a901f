//! Outcome of a single refresh pass.

use chrono::{DateTime, Utc};
use docmirror_core::DocId;

use crate::fetch::FetchFailure;

/// One document that could not be refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub id: DocId,
    pub url: String,
    pub reason: FetchFailure,
}

/// Overall shape of a pass, for operator-facing reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSummary {
    /// No documents were registered.
    Empty,
    AllSucceeded,
    AllFailed,
    Mixed,
}

impl RefreshSummary {
    pub fn as_str(self) -> &'static str {
        match self {
            RefreshSummary::Empty => "empty",
            RefreshSummary::AllSucceeded => "all_succeeded",
            RefreshSummary::AllFailed => "all_failed",
            RefreshSummary::Mixed => "mixed",
        }
    }
}

/// Aggregate of one pass over all registered documents.
///
/// Lives only as long as the caller needs it; nothing here is persisted.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Documents fetched and written to the store.
    pub succeeded: usize,
    /// Of `succeeded`, how many came back identical to the cached copy.
    pub unchanged: usize,
    /// Documents removed from the registry while the pass was running.
    pub skipped: usize,
    pub failures: Vec<EntryFailure>,
}

impl RefreshReport {
    pub(crate) fn begin(started_at: DateTime<Utc>) -> Self {
        Self { started_at, finished_at: started_at, succeeded: 0, unchanged: 0, skipped: 0, failures: Vec::new() }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Skipped documents count as processed without failure, so a pass
    /// whose documents were all removed mid-pass is not `Empty`.
    pub fn summary(&self) -> RefreshSummary {
        match (self.succeeded + self.skipped, self.failed()) {
            (0, 0) => RefreshSummary::Empty,
            (_, 0) => RefreshSummary::AllSucceeded,
            (0, _) => RefreshSummary::AllFailed,
            _ => RefreshSummary::Mixed,
        }
    }

    /// Per-failure lines, `Doc #<id>: <reason>`, ascending by id.
    pub fn messages(&self) -> Vec<String> {
        self.failures.iter().map(|f| format!("Doc #{}: {}", f.id, f.reason)).collect()
    }

    /// Operator-facing summary lines for a manual trigger.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.succeeded > 0 {
            lines.push(format!("{} document(s) successfully fetched and saved.", self.succeeded));
        }
        if self.failed() > 0 {
            lines.push(format!(
                "{} document(s) could not be fetched. Using the previous import for these documents.",
                self.failed()
            ));
        }
        if self.skipped > 0 {
            lines.push(format!("{} document(s) were removed during the refresh and skipped.", self.skipped));
        }
        if self.summary() == RefreshSummary::AllFailed {
            lines.push("All fetch attempts failed. Previous imports are being used.".to_string());
        }
        if self.summary() == RefreshSummary::Empty {
            lines.push("No documents are registered.".to_string());
        }
        lines
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
