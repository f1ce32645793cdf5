//! Simulation control routes.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStatus {
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub last_update: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveBody {
    pub active: bool,
}

async fn snapshot(state: &AppState) -> SimulationStatus {
    SimulationStatus { active: state.simulator.is_active(), last_update: state.simulator.last_update().await }
}

/// `GET /api/simulation`: current flag and last simulated change.
pub async fn status(State(state): State<AppState>) -> Json<SimulationStatus> {
    Json(snapshot(&state).await)
}

/// `POST /api/simulation/toggle`: flip the flag.
pub async fn toggle(State(state): State<AppState>) -> Json<SimulationStatus> {
    state.simulator.toggle();
    Json(snapshot(&state).await)
}

/// `PUT /api/simulation`: set the flag explicitly; idempotent.
pub async fn set_active(State(state): State<AppState>, Json(body): Json<SetActiveBody>) -> Json<SimulationStatus> {
    state.simulator.set_active(body.active);
    Json(snapshot(&state).await)
}
