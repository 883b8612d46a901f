//! Recurring refresh trigger.
//!
//! A background task sleeps until the next fire time and then runs a pass
//! through [`Refresher::try_refresh_all`], so a tick that lands while a
//! manual pass is running is skipped rather than interleaved. The next fire
//! time lives in a `watch` channel: rebasing it wakes the task, which then
//! sleeps toward the new deadline.

use std::sync::Arc;
use std::time::Duration;

use docmirror_core::Error;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{RefreshReport, Refresher};

/// Minimum distance past `trigger + period` for the fire time set by a manual trigger.
const REBASE_MARGIN: Duration = Duration::from_secs(1);

/// Fixed-period scheduler for refresh passes.
pub struct Scheduler {
    refresher: Arc<Refresher>,
    period: Duration,
    next_fire: Arc<watch::Sender<Instant>>,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
    /// Start firing every `period`, first one `period` from now.
    pub fn start(refresher: Arc<Refresher>, period: Duration) -> Self {
        Self::start_at(refresher, period, Instant::now() + period)
    }

    /// Start firing every `period`, first one at `first_fire`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_at(refresher: Arc<Refresher>, period: Duration, first_fire: Instant) -> Self {
        let next_fire = Arc::new(watch::Sender::new(first_fire));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(run(refresher.clone(), period, next_fire.clone(), shutdown_rx));
        tracing::info!(period_secs = period.as_secs(), "refresh scheduler started");

        Self { refresher, period, next_fire, shutdown, task: Mutex::new(Some(task)) }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the next scheduled pass is due.
    pub fn next_fire_at(&self) -> Instant {
        *self.next_fire.borrow()
    }

    /// Run one pass now and push the next scheduled pass a full period out.
    ///
    /// Waits for a pass already in progress instead of running alongside it.
    /// The schedule is rebased both before and after the pass, so no
    /// automatic pass fires during or right after this one. The resulting
    /// fire time is always strictly later than trigger time plus period.
    pub async fn trigger_now_and_rebase(&self) -> Result<RefreshReport, Error> {
        let floor = Instant::now() + self.period + REBASE_MARGIN;
        self.next_fire.send_replace(floor);

        let report = self.refresher.refresh_all().await;

        self.next_fire.send_replace((Instant::now() + self.period).max(floor));
        report
    }

    /// Cancel the recurring trigger and wait for the task to exit.
    ///
    /// A pass already running is allowed to finish. Calling this twice is a no-op.
    pub async fn stop(&self) {
        let Some(task) = self.task.lock().await.take() else {
            return;
        };
        self.shutdown.send_replace(true);
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "refresh scheduler task ended abnormally");
        }
        tracing::info!("refresh scheduler stopped");
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

async fn run(
    refresher: Arc<Refresher>, period: Duration, next_fire: Arc<watch::Sender<Instant>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut rebased = next_fire.subscribe();

    loop {
        let deadline = *rebased.borrow_and_update();

        tokio::select! {
            biased;

            _ = shutdown.changed() => break,
            _ = rebased.changed() => continue,
            () = tokio::time::sleep_until(deadline) => {
                next_fire.send_replace(Instant::now() + period);

                match refresher.try_refresh_all().await {
                    Ok(Some(report)) => {
                        tracing::debug!(summary = report.summary().as_str(), "scheduled refresh completed");
                    }
                    Ok(None) => tracing::debug!("refresh pass already running, skipping scheduled tick"),
                    Err(e) => tracing::error!(error = %e, "scheduled refresh failed"),
                }
            }
        }
    }
}
