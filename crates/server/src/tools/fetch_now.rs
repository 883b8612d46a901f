//! fetch_now tool implementation.
//!
//! Runs a refresh pass immediately and pushes the scheduled one a full
//! period out.

use docmirror_client::{RefreshReport, Scheduler};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::registry::json_result;

/// Output from the fetch_now tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchNowOutput {
    /// One of `empty`, `all_succeeded`, `all_failed` or `mixed`.
    pub status: String,
    pub succeeded: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Human-readable outcome lines.
    pub summary: Vec<String>,
    /// One line per failed document.
    pub errors: Vec<String>,
    pub elapsed_ms: i64,
    /// Seconds until the next scheduled pass.
    pub next_run_in_secs: u64,
}

impl FetchNowOutput {
    fn from_report(report: &RefreshReport, next_run_in_secs: u64) -> Self {
        Self {
            status: report.summary().as_str().to_string(),
            succeeded: report.succeeded,
            unchanged: report.unchanged,
            failed: report.failed(),
            summary: report.summary_lines(),
            errors: report.messages(),
            elapsed_ms: report.elapsed_ms(),
            next_run_in_secs,
        }
    }
}

/// Implementation of the fetch_now tool.
pub async fn fetch_now_impl(scheduler: &Scheduler) -> Result<CallToolResult, McpError> {
    let report = scheduler.trigger_now_and_rebase().await?;
    let next_run_in_secs = scheduler
        .next_fire_at()
        .saturating_duration_since(Instant::now())
        .as_secs();

    json_result(&FetchNowOutput::from_report(&report, next_run_in_secs))
}
