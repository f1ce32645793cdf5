//! Dashboard view composition.
//!
//! DESIGN
//! ======
//! `compose_view` is pure: callers snapshot the engines first and hand the
//! floor's desks in. Selection and filter state come from the request, so
//! nothing here is shared between clients.
//!
//! Counts cover the whole floor, not just the filtered desks, so facet
//! chips can show how many desks each filter would reveal.

pub mod filters;
pub mod selection;

use serde::Serialize;
use time::OffsetDateTime;

use crate::desk::{DeskRecord, DeskState, OccupancyStatus, StatusScheme};
use crate::registry::{Floor, Library, Registry};
use filters::{DeskFilters, FilterEcho};
use selection::{DeskSelection, LocationSelection};

const FALLBACK_FLOOR_NAME: &str = "Floor";

/// Everything a view needs, snapshotted by the caller.
pub struct ViewInputs<'a> {
    pub registry: &'a Registry,
    pub scheme: StatusScheme,
    pub selection: LocationSelection,
    pub filters: &'a DeskFilters,
    pub desk_selection: &'a DeskSelection,
    /// All desks on the selected floor, in registry order.
    pub floor_desks: Vec<DeskState>,
    pub simulation_active: bool,
    pub last_update: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub available: usize,
    pub occupied: usize,
    /// Desks in the third status, named by `third_label`.
    pub third: usize,
    pub third_label: &'static str,
    pub total: usize,
    pub visible: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub selection: LocationSelection,
    pub query: String,
    pub libraries: &'static [Library],
    pub floors: Vec<&'static Floor>,
    pub floor_name: &'static str,
    pub filters: FilterEcho,
    pub desks: Vec<DeskRecord>,
    /// Selection after any toggle, echoed so the client can carry it forward.
    pub selected_desk_id: Option<String>,
    /// The selected desk's record, only while it passes the filters.
    pub selected_desk: Option<DeskRecord>,
    pub counts: StatusCounts,
    pub simulation_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub last_update: OffsetDateTime,
}

#[must_use]
pub fn compose_view(inputs: ViewInputs<'_>) -> DashboardView {
    let ViewInputs {
        registry,
        scheme,
        selection,
        filters,
        desk_selection,
        floor_desks,
        simulation_active,
        last_update,
    } = inputs;

    let visible = filters.apply(&floor_desks);
    let selected_desk = desk_selection.resolve(&visible).map(|d| scheme.record(d));
    let counts = count_statuses(&floor_desks, visible.len(), scheme);

    DashboardView {
        query: selection.to_query(),
        libraries: registry.libraries(),
        floors: selection.available_floors(registry),
        floor_name: registry
            .floor(&selection.floor_id)
            .map_or(FALLBACK_FLOOR_NAME, |f| f.name),
        filters: filters.echo(scheme),
        desks: visible.iter().map(|d| scheme.record(d)).collect(),
        selected_desk_id: desk_selection.selected().map(str::to_string),
        selected_desk,
        counts,
        simulation_active,
        last_update,
        selection,
    }
}

fn count_statuses(desks: &[DeskState], visible: usize, scheme: StatusScheme) -> StatusCounts {
    let mut counts = StatusCounts {
        third_label: scheme.third_label(),
        total: desks.len(),
        visible,
        ..StatusCounts::default()
    };
    for desk in desks {
        match desk.status() {
            OccupancyStatus::Available => counts.available += 1,
            OccupancyStatus::Occupied => counts.occupied += 1,
            OccupancyStatus::Reserved => counts.third += 1,
        }
    }
    counts
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
