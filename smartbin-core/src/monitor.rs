//! Live status monitor: the polling lifecycle and the state a view renders from.
//!
//! A [`LiveStatusMonitor`] is mounted while the live view is active. Mounting
//! fetches immediately and then once per period; dropping the monitor stops the
//! timer and every fetch still in flight.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};

use crate::model::{BinStatus, SeveritySummary};
use crate::service::SmartBinService;

/// Shortest period accepted by [`spawn_poller`].
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Rendering phase of the monitor.
pub enum Phase {
    /// No poll has completed yet.
    Loading,
    /// At least one poll completed, successfully or not.
    Ready,
}

#[derive(Debug)]
/// Result of a single poll.
pub enum PollOutcome {
    /// The backend returned this set of bins.
    Fetched(Vec<BinStatus>),
    /// The poll failed for the given reason.
    Failed(String),
}

#[derive(Debug, Clone)]
/// Most recently fetched bins plus bookkeeping about the last polls.
pub struct LiveStatus {
    phase: Phase,
    bins: Vec<BinStatus>,
    last_success: Option<DateTime<Local>>,
    last_failure: Option<String>,
}

impl Default for LiveStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveStatus {
    /// Empty state in [`Phase::Loading`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            bins: Vec::new(),
            last_success: None,
            last_failure: None,
        }
    }

    /// Fold a poll outcome into the state.
    ///
    /// A fetched set replaces the current one wholesale. A failure leaves the
    /// current set untouched. Either way the state leaves [`Phase::Loading`].
    pub fn apply(&mut self, outcome: PollOutcome) {
        match outcome {
            PollOutcome::Fetched(bins) => {
                self.bins = bins;
                self.last_success = Some(Local::now());
                self.last_failure = None;
            }
            PollOutcome::Failed(reason) => {
                self.last_failure = Some(reason);
            }
        }
        self.phase = Phase::Ready;
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether no poll has completed yet.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Bins from the last successful poll.
    #[must_use]
    pub fn bins(&self) -> &[BinStatus] {
        &self.bins
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Severity counts of the current set.
    #[must_use]
    pub fn summary(&self) -> SeveritySummary {
        SeveritySummary::from_bins(&self.bins)
    }

    /// Local time of the last successful poll.
    #[must_use]
    pub fn last_success(&self) -> Option<DateTime<Local>> {
        self.last_success
    }

    /// Reason the most recent poll failed, cleared by the next success.
    #[must_use]
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Whether the shown data may be outdated because the latest poll failed.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.last_failure.is_some()
    }
}

/// Handle to a running poller.
///
/// Dropping the handle cancels the timer and aborts fetches still in flight.
pub struct PollHandle {
    outcomes: UnboundedReceiver<PollOutcome>,
    timer: JoinHandle<()>,
}

impl PollHandle {
    /// Next completed outcome, if one is waiting.
    pub fn try_next(&mut self) -> Option<PollOutcome> {
        self.outcomes.try_recv().ok()
    }

    /// Wait for the next completed outcome.
    ///
    /// Returns `None` once the poller has stopped.
    pub async fn next(&mut self) -> Option<PollOutcome> {
        self.outcomes.recv().await
    }

    /// Stop polling.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.timer.abort();
        tracing::debug!("bin status poller stopped");
    }
}

/// Start polling `service` every `period`, beginning immediately.
///
/// Each tick starts its own fetch, so a fetch slower than `period` overlaps
/// the next one. Outcomes arrive in completion order.
#[must_use]
pub fn spawn_poller(service: Arc<SmartBinService>, period: Duration) -> PollHandle {
    let period = period.max(MIN_POLL_INTERVAL);
    let (sender, outcomes) = mpsc::unbounded_channel();
    let timer = tokio::spawn(poll_loop(service, period, sender));
    PollHandle { outcomes, timer }
}

async fn poll_loop(
    service: Arc<SmartBinService>,
    period: Duration,
    sender: UnboundedSender<PollOutcome>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Dropped with this task, which aborts whatever is still running.
    let mut in_flight = JoinSet::new();

    while !sender.is_closed() {
        tokio::select! {
            _ = ticker.tick() => {
                let service = Arc::clone(&service);
                let sender = sender.clone();
                in_flight.spawn(async move {
                    let outcome = fetch_once(&service).await;
                    if sender.send(outcome).is_err() {
                        tracing::debug!("monitor unmounted, discarding poll result");
                    }
                });
            }
            Some(joined) = in_flight.join_next() => {
                if let Err(err) = joined
                    && err.is_panic()
                {
                    tracing::error!(error = %err, "bin status fetch panicked");
                }
            }
        }
    }
}

async fn fetch_once(service: &SmartBinService) -> PollOutcome {
    match service.bins().await {
        Ok(bins) => {
            tracing::debug!(
                source = service.source(),
                count = bins.len(),
                "fetched bin status"
            );
            PollOutcome::Fetched(bins)
        }
        Err(err) => {
            tracing::warn!(source = service.source(), error = %err, "error fetching bins");
            PollOutcome::Failed(err.to_string())
        }
    }
}

/// Polling lifecycle together with the state it feeds.
///
/// Unmount by dropping the monitor.
pub struct LiveStatusMonitor {
    status: LiveStatus,
    poller: PollHandle,
}

impl LiveStatusMonitor {
    /// Start polling and return the monitor in [`Phase::Loading`].
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn mount(service: Arc<SmartBinService>, period: Duration) -> Self {
        tracing::info!(source = service.source(), ?period, "mounting live bin monitor");
        Self {
            status: LiveStatus::new(),
            poller: spawn_poller(service, period),
        }
    }

    /// Apply every outcome that completed since the last call.
    ///
    /// Returns whether the state changed.
    pub fn refresh(&mut self) -> bool {
        let mut changed = false;
        while let Some(outcome) = self.poller.try_next() {
            self.status.apply(outcome);
            changed = true;
        }
        changed
    }

    /// Wait for the next outcome and apply it.
    ///
    /// Returns `false` if the poller stopped.
    pub async fn wait_for_update(&mut self) -> bool {
        match self.poller.next().await {
            Some(outcome) => {
                self.status.apply(outcome);
                true
            }
            None => false,
        }
    }

    /// State to render.
    #[must_use]
    pub fn status(&self) -> &LiveStatus {
        &self.status
    }
}
