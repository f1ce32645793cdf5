//! Live status synchronizer: polls the backend for the one tracked desk.
//!
//! DESIGN
//! ======
//! A background task fetches a [`StatusReport`] every poll interval
//! (default 5 s) and reconciles it into the tracked desk. It runs
//! independently of the simulator; the two never own the same desk.
//!
//! RECONCILIATION
//! ==============
//! - Reported id differs from the tracked id → ignored (logged only).
//! - Reported status equals the current one → no mutation and no
//!   `last_update` bump, so repeated reports never churn timestamps.
//! - Otherwise the status changes and only the matching timing field is set.
//!
//! ERROR HANDLING
//! ==============
//! Fetch and payload failures are logged and the last known state is kept.
//! The next poll is scheduled whatever happened.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::desk::{DeskState, NoiseBand, Occupancy, OccupancyStatus};
use crate::services::desk_api::{DeskApiError, StatusReport, StatusSource};
use crate::services::task::{CancelFlag, TaskGuard};

/// What a single report did to the tracked desk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Updated { from: OccupancyStatus, to: OccupancyStatus },
    Unchanged,
    IgnoredMismatch { reported: String },
}

/// Merge `report` into `desk` under the identity and idempotence rules.
pub fn reconcile(desk: &mut DeskState, report: &StatusReport, now: OffsetDateTime) -> ReconcileOutcome {
    if report.desk_id != desk.desk_id {
        return ReconcileOutcome::IgnoredMismatch { reported: report.desk_id.clone() };
    }
    let from = desk.status();
    if desk.set_status(report.status, now) {
        ReconcileOutcome::Updated { from, to: report.status }
    } else {
        ReconcileOutcome::Unchanged
    }
}

struct LiveDeskState {
    desk: DeskState,
    last_update: OffsetDateTime,
}

/// Shared handle to the externally tracked desk. Clones share state.
#[derive(Clone)]
pub struct LiveDeskSync {
    inner: Arc<RwLock<LiveDeskState>>,
    revision: Arc<watch::Sender<u64>>,
    poll_interval: Duration,
}

impl LiveDeskSync {
    /// Tracked desk starts available and quiet until the backend says
    /// otherwise.
    #[must_use]
    pub fn new(desk_id: &str, floor_id: &str, poll_interval_ms: u64, now: OffsetDateTime) -> Self {
        let desk = DeskState::new(
            desk_id,
            floor_id,
            Occupancy::enter(OccupancyStatus::Available, now),
            NoiseBand::Quiet,
        );
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(LiveDeskState { desk, last_update: now })),
            revision: Arc::new(revision),
            poll_interval: Duration::from_millis(poll_interval_ms),
        }
    }

    pub async fn desk(&self) -> DeskState {
        self.inner.read().await.desk.clone()
    }

    pub async fn last_update(&self) -> OffsetDateTime {
        self.inner.read().await.last_update
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Fold one fetch result into state. Returns `None` for failures, which
    /// never mutate anything.
    pub async fn apply_report(
        &self,
        result: Result<StatusReport, DeskApiError>,
        now: OffsetDateTime,
    ) -> Option<ReconcileOutcome> {
        let report = match result {
            Ok(report) => report,
            Err(DeskApiError::Payload(e)) => {
                warn!(error = %e, "live: unrecognized payload discarded");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "live: status fetch failed; keeping last known state");
                return None;
            }
        };

        let outcome = {
            let mut state = self.inner.write().await;
            let outcome = reconcile(&mut state.desk, &report, now);
            if matches!(outcome, ReconcileOutcome::Updated { .. }) {
                state.last_update = now;
            }
            outcome
        };

        match &outcome {
            ReconcileOutcome::Updated { from, to } => {
                self.revision.send_modify(|rev| *rev += 1);
                info!(desk_id = %report.desk_id, ?from, ?to, "live: desk status changed");
            }
            ReconcileOutcome::Unchanged => {
                debug!(desk_id = %report.desk_id, status = ?report.status, "live: status unchanged");
            }
            ReconcileOutcome::IgnoredMismatch { reported } => {
                warn!(%reported, "live: ignoring report for untracked desk");
            }
        }
        Some(outcome)
    }

    /// Spawn the poll loop. The first poll runs immediately.
    #[must_use]
    pub fn spawn<S: StatusSource + 'static>(&self, source: S) -> TaskGuard {
        let sync = self.clone();
        TaskGuard::spawn("live-status", move |cancel| async move {
            sync.run(&source, cancel).await;
        })
    }

    async fn run<S: StatusSource>(&self, source: &S, cancel: CancelFlag) {
        info!(poll_interval_ms = self.poll_interval.as_millis(), "live: polling started");
        loop {
            let result = source.fetch_status().await;

            // EDGE: a response that lands after cancellation must not mutate.
            if cancel.is_cancelled() {
                return;
            }
            self.apply_report(result, OffsetDateTime::now_utc()).await;

            tokio::time::sleep(self.poll_interval).await;
            if cancel.is_cancelled() {
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "live_status_test.rs"]
mod tests;
