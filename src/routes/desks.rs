//! Location, dashboard and desk read routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::desk::DeskRecord;
use crate::registry::{Floor, Library};
use crate::state::AppState;
use crate::view::filters::DeskFilters;
use crate::view::selection::{DeskSelection, LocationSelection};
use crate::view::{DashboardView, ViewInputs, compose_view};

#[derive(Serialize)]
pub struct LocationsResponse {
    pub libraries: &'static [Library],
    pub floors: &'static [Floor],
}

/// Query string accepted by the dashboard route. Every field is optional;
/// invalid values fall back silently.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub library: Option<String>,
    pub floor: Option<String>,
    pub search: Option<String>,
    /// Comma list of status labels.
    pub status: Option<String>,
    /// Comma list of noise bands.
    pub noise: Option<String>,
    /// Currently selected desk.
    pub desk: Option<String>,
    /// Desk to toggle against `desk`; an empty value clears the selection.
    pub toggle: Option<String>,
    /// Drop every filter.
    #[serde(default)]
    pub clear: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveDeskResponse {
    pub desk: DeskRecord,
    pub polling: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub last_update: OffsetDateTime,
}

/// `GET /api/locations`: every library and floor.
pub async fn locations(State(state): State<AppState>) -> Json<LocationsResponse> {
    Json(LocationsResponse { libraries: state.registry.libraries(), floors: state.registry.floors() })
}

/// `GET /api/dashboard`: composed view for one selection and filter set.
pub async fn dashboard(State(state): State<AppState>, Query(query): Query<DashboardQuery>) -> Json<DashboardView> {
    let selection = LocationSelection::resolve(&state.registry, query.library.as_deref(), query.floor.as_deref());

    let mut filters =
        DeskFilters::from_query(query.search.as_deref(), query.status.as_deref(), query.noise.as_deref(), state.scheme);
    if query.clear {
        filters.clear_all();
    }

    let mut desk_selection = DeskSelection::new(query.desk.as_deref());
    match query.toggle.as_deref() {
        Some("") => desk_selection.clear(),
        Some(desk_id) => desk_selection.toggle(desk_id),
        None => {}
    }

    let floor_desks = state.desks_for_floor(&selection.floor_id).await;
    let view = compose_view(ViewInputs {
        registry: &state.registry,
        scheme: state.scheme,
        selection,
        filters: &filters,
        desk_selection: &desk_selection,
        floor_desks,
        simulation_active: state.simulator.is_active(),
        last_update: state.last_update().await,
    });
    Json(view)
}

/// `GET /api/floors/:floor_id/desks`: raw records for one floor.
pub async fn floor_desks(
    State(state): State<AppState>,
    Path(floor_id): Path<String>,
) -> Result<Json<Vec<DeskRecord>>, StatusCode> {
    if state.registry.floor(&floor_id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    let desks = state.desks_for_floor(&floor_id).await;
    Ok(Json(desks.iter().map(|d| state.scheme.record(d)).collect()))
}

/// `GET /api/live`: the externally tracked desk.
pub async fn live_desk(State(state): State<AppState>) -> Json<LiveDeskResponse> {
    let desk = state.live.desk().await;
    Json(LiveDeskResponse {
        desk: state.scheme.record(&desk),
        polling: state.live_polling,
        last_update: state.live.last_update().await,
    })
}
