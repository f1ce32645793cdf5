//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the static registry, the configured status vocabulary and the two
//! desk engines. The simulator and the live synchronizer own disjoint desks;
//! the state merges them back into one floor view on read.

use rand::Rng;
use time::OffsetDateTime;
use tokio::sync::watch;

use crate::config::DeskwatchConfig;
use crate::desk::{DeskState, StatusScheme};
use crate::registry::{DEMO_FLOOR_ID, Registry};
use crate::services::live_status::LiveDeskSync;
use crate::services::simulator::DeskSimulator;

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; both engines are
/// `Arc`-backed handles.
#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
    pub scheme: StatusScheme,
    pub simulator: DeskSimulator,
    pub live: LiveDeskSync,
    /// Whether a backend poller feeds the live desk.
    pub live_polling: bool,
}

impl AppState {
    /// Seed both engines. The live desk is excluded from the simulation and
    /// lives on whichever floor the registry places it (the demo floor when
    /// the id is not a registry desk).
    pub fn new<R: Rng>(config: &DeskwatchConfig, rng: &mut R, now: OffsetDateTime) -> Self {
        let registry = Registry::builtin();
        let live_desk_id = config.live_desk_id();
        let live_floor = registry.floor_of_desk(live_desk_id).unwrap_or(DEMO_FLOOR_ID);
        let poll_interval_ms = config
            .live
            .as_ref()
            .map_or(crate::config::DEFAULT_POLL_INTERVAL_MS, |live| live.poll_interval_ms);

        let simulator = DeskSimulator::new(&registry, live_desk_id, config.simulation, rng, now);
        let live = LiveDeskSync::new(live_desk_id, live_floor, poll_interval_ms, now);
        Self { registry, scheme: config.scheme, simulator, live, live_polling: config.live.is_some() }
    }

    /// All desks on `floor_id` from both engines, in registry order.
    pub async fn desks_for_floor(&self, floor_id: &str) -> Vec<DeskState> {
        let mut desks = self.simulator.desks_for_floor(floor_id).await;
        let live = self.live.desk().await;
        if live.floor_id == floor_id {
            desks.push(live);
        }

        let order = self.registry.desk_ids_for_floor(floor_id);
        desks.sort_by_key(|d| order.iter().position(|id| *id == d.desk_id).unwrap_or(usize::MAX));
        desks
    }

    /// Newest mutation time across both engines.
    pub async fn last_update(&self) -> OffsetDateTime {
        let sim = self.simulator.last_update().await;
        let live = self.live.last_update().await;
        sim.max(live)
    }

    /// Revision receivers for both engines, in `(simulator, live)` order.
    #[must_use]
    pub fn subscribe(&self) -> (watch::Receiver<u64>, watch::Receiver<u64>) {
        (self.simulator.subscribe(), self.live.subscribe())
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
