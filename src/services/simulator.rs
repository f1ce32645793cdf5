//! Mock event simulator: random desk activity for the simulated floors.
//!
//! DESIGN
//! ======
//! The simulator owns every simulated desk record, seeded once at startup.
//! A background task waits a jittered delay (default 3–6 s), picks one
//! desk uniformly at random and runs it through the transition table in
//! [`crate::desk`]. Each tick applies under a single write lock, so readers
//! never observe a half-applied update.
//!
//! PAUSE / RESUME
//! ==============
//! The active flag lives in a `watch` channel. Pausing drops the pending
//! delay; no tick is scheduled until the flag flips back, at which point a
//! fresh jittered delay is drawn. Desk state is untouched by pausing.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::OffsetDateTime;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::desk::{DeskState, NoiseBand};
use crate::registry::Registry;
use crate::services::task::{CancelFlag, TaskGuard};

struct SimulatorState {
    desks: Vec<DeskState>,
    last_update: OffsetDateTime,
}

/// Shared handle to the simulated desk collection. Clones share state.
#[derive(Clone)]
pub struct DeskSimulator {
    inner: Arc<RwLock<SimulatorState>>,
    active: Arc<watch::Sender<bool>>,
    revision: Arc<watch::Sender<u64>>,
    config: SimulationConfig,
}

enum Wake {
    Elapsed,
    Toggled,
    Closed,
}

impl DeskSimulator {
    /// Seed one record per registry desk, skipping `excluded_desk_id`
    /// (the desk owned by the live synchronizer).
    pub fn new<R: Rng>(
        registry: &Registry,
        excluded_desk_id: &str,
        config: SimulationConfig,
        rng: &mut R,
        now: OffsetDateTime,
    ) -> Self {
        let desks: Vec<DeskState> = registry
            .all_desks()
            .into_iter()
            .filter(|(_, desk_id)| *desk_id != excluded_desk_id)
            .map(|(floor_id, desk_id)| DeskState::seeded(desk_id, floor_id, rng, now))
            .collect();
        info!(desks = desks.len(), active = config.enabled, "simulator seeded");
        Self::from_desks(desks, config, now)
    }

    /// Build a simulator over an explicit desk collection.
    #[must_use]
    pub fn from_desks(desks: Vec<DeskState>, config: SimulationConfig, now: OffsetDateTime) -> Self {
        let (active, _) = watch::channel(config.enabled);
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(SimulatorState { desks, last_update: now })),
            active: Arc::new(active),
            revision: Arc::new(revision),
            config,
        }
    }

    /// Desks on `floor_id`, in registry order.
    pub async fn desks_for_floor(&self, floor_id: &str) -> Vec<DeskState> {
        let state = self.inner.read().await;
        state
            .desks
            .iter()
            .filter(|d| d.floor_id == floor_id)
            .cloned()
            .collect()
    }

    #[cfg(test)]
    pub async fn all_desks(&self) -> Vec<DeskState> {
        self.inner.read().await.desks.clone()
    }

    /// Time of the most recent desk mutation (or startup).
    pub async fn last_update(&self) -> OffsetDateTime {
        self.inner.read().await.last_update
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// Flip the active flag and return the new value.
    pub fn toggle(&self) -> bool {
        self.active.send_modify(|active| *active = !*active);
        let active = self.is_active();
        info!(active, "simulation toggled");
        active
    }

    pub fn set_active(&self, active: bool) {
        self.active.send_if_modified(|current| {
            let changed = *current != active;
            *current = active;
            changed
        });
    }

    /// Revision counter bumped on every desk mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Uniform delay in `[min_delay_ms, max_delay_ms]`.
    pub fn next_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.random_range(self.config.min_delay_ms..=self.config.max_delay_ms))
    }

    /// Apply one update to a uniformly chosen desk. Returns the desk id, or
    /// `None` when the collection is empty.
    pub async fn tick_with<R: Rng>(&self, rng: &mut R, now: OffsetDateTime) -> Option<String> {
        let (desk_id, changed, since) = {
            let mut state = self.inner.write().await;
            if state.desks.is_empty() {
                return None;
            }
            let idx = rng.random_range(0..state.desks.len());
            let roll = rng.random::<f64>();
            let noise = NoiseBand::random(rng);
            let desk = &mut state.desks[idx];
            let changed = desk.apply_update(roll, noise, now);
            let desk_id = desk.desk_id.clone();
            let since = desk.occupancy.changed_at();
            state.last_update = now;
            (desk_id, changed, since)
        };
        self.revision.send_modify(|rev| *rev += 1);
        debug!(%desk_id, changed, %since, "simulator tick");
        Some(desk_id)
    }

    /// Spawn the tick loop seeded from OS entropy.
    #[must_use]
    pub fn spawn(&self) -> TaskGuard {
        self.spawn_with_rng(StdRng::from_os_rng())
    }

    #[must_use]
    pub fn spawn_with_rng<R: Rng + Send + 'static>(&self, mut rng: R) -> TaskGuard {
        let sim = self.clone();
        TaskGuard::spawn("simulator", move |cancel| async move {
            sim.run(&mut rng, cancel).await;
        })
    }

    async fn run<R: Rng + Send>(&self, rng: &mut R, cancel: CancelFlag) {
        let mut active_rx = self.active.subscribe();
        loop {
            if cancel.is_cancelled() {
                return;
            }

            // PHASE: IDLE WHILE PAUSED
            if !*active_rx.borrow_and_update() {
                if active_rx.changed().await.is_err() {
                    return;
                }
                continue;
            }

            // PHASE: JITTERED WAIT
            // WHY: a toggle during the wait discards the delay; resuming draws a new one.
            let delay = self.next_delay(rng);
            let wake = tokio::select! {
                () = tokio::time::sleep(delay) => Wake::Elapsed,
                changed = active_rx.changed() => if changed.is_ok() { Wake::Toggled } else { Wake::Closed },
            };

            match wake {
                Wake::Elapsed => {
                    if cancel.is_cancelled() {
                        return;
                    }
                    self.tick_with(rng, OffsetDateTime::now_utc()).await;
                }
                Wake::Toggled => {}
                Wake::Closed => return,
            }
        }
    }
}

#[cfg(test)]
#[path = "simulator_test.rs"]
mod tests;
