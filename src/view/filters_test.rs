use super::*;
use crate::desk::Occupancy;
use time::macros::datetime;

fn desk(id: &str, status: OccupancyStatus, noise: NoiseBand) -> DeskState {
    DeskState::new(id, "ussher-gf", Occupancy::enter(status, datetime!(2025-03-01 10:00:00 UTC)), noise)
}

fn ussher_ground() -> Vec<DeskState> {
    vec![
        desk("UG-D1", OccupancyStatus::Available, NoiseBand::Quiet),
        desk("UG-D2", OccupancyStatus::Occupied, NoiseBand::Loud),
        desk("UG-D3", OccupancyStatus::Reserved, NoiseBand::Quiet),
        desk("UG-D4", OccupancyStatus::Occupied, NoiseBand::Silent),
        desk("UG-D5", OccupancyStatus::Available, NoiseBand::Moderate),
        desk("UG-D6", OccupancyStatus::Occupied, NoiseBand::Quiet),
        desk("UG-D7", OccupancyStatus::Reserved, NoiseBand::Loud),
        desk("UG-D8", OccupancyStatus::Available, NoiseBand::Silent),
    ]
}

fn ids(desks: &[DeskState]) -> Vec<&str> {
    desks.iter().map(|d| d.desk_id.as_str()).collect()
}

#[test]
fn no_filters_pass_everything() {
    let filters = DeskFilters::default();
    assert!(!filters.has_active_filters());
    assert_eq!(filters.apply(&ussher_ground()).len(), 8);
}

#[test]
fn search_d3_on_ussher_ground_finds_single_desk() {
    let mut filters = DeskFilters::default();
    filters.set_search("D3");
    assert_eq!(ids(&filters.apply(&ussher_ground())), vec!["UG-D3"]);
}

#[test]
fn search_is_case_insensitive_substring() {
    let mut filters = DeskFilters::default();
    filters.set_search("ug-d");
    assert_eq!(filters.apply(&ussher_ground()).len(), 8);
    filters.set_search("  d7 ");
    assert_eq!(ids(&filters.apply(&ussher_ground())), vec!["UG-D7"]);
}

#[test]
fn status_facet_keeps_input_order() {
    let mut filters = DeskFilters::default();
    filters.toggle_status(OccupancyStatus::Occupied);
    assert_eq!(ids(&filters.apply(&ussher_ground())), vec!["UG-D2", "UG-D4", "UG-D6"]);
}

#[test]
fn toggling_twice_removes_facet_value() {
    let mut filters = DeskFilters::default();
    filters.toggle_noise(NoiseBand::Loud);
    filters.toggle_noise(NoiseBand::Loud);
    assert!(!filters.has_active_filters());
}

#[test]
fn facets_combine_with_and() {
    let mut filters = DeskFilters::default();
    filters.toggle_status(OccupancyStatus::Occupied);
    filters.toggle_status(OccupancyStatus::Reserved);
    filters.toggle_noise(NoiseBand::Loud);
    assert_eq!(ids(&filters.apply(&ussher_ground())), vec!["UG-D2", "UG-D7"]);
}

#[test]
fn facets_commute() {
    let desks = ussher_ground();

    let mut status_first = DeskFilters::default();
    status_first.toggle_status(OccupancyStatus::Available);
    let mut noise_only = DeskFilters::default();
    noise_only.toggle_noise(NoiseBand::Silent);
    let mut status_only = DeskFilters::default();
    status_only.toggle_status(OccupancyStatus::Available);

    let a = noise_only.apply(&status_first.apply(&desks));
    let b = status_only.apply(&noise_only.apply(&desks));
    assert_eq!(a, b);

    let mut combined = DeskFilters::default();
    combined.toggle_noise(NoiseBand::Silent);
    combined.toggle_status(OccupancyStatus::Available);
    assert_eq!(combined.apply(&desks), a);
    assert_eq!(ids(&a), vec!["UG-D8"]);
}

#[test]
fn clear_all_resets_every_facet() {
    let mut filters = DeskFilters::from_query(Some("D1"), Some("occupied"), Some("loud"), StatusScheme::Reserved);
    assert!(filters.has_active_filters());
    filters.clear_all();
    assert_eq!(filters, DeskFilters::default());
}

#[test]
fn from_query_parses_comma_lists_and_drops_unknowns() {
    let filters = DeskFilters::from_query(
        None,
        Some("occupied, reserved,bogus"),
        Some("LOUD,,whisper"),
        StatusScheme::Reserved,
    );
    let echo = filters.echo(StatusScheme::Reserved);
    assert_eq!(echo.statuses, vec!["occupied", "reserved"]);
    assert_eq!(echo.noise, vec![NoiseBand::Loud]);
    assert!(echo.has_active_filters);
}

#[test]
fn unsure_scheme_uses_its_own_label() {
    let filters = DeskFilters::from_query(None, Some("unsure,reserved"), None, StatusScheme::Unsure);
    assert_eq!(filters.echo(StatusScheme::Unsure).statuses, vec!["unsure"]);
    assert_eq!(ids(&filters.apply(&ussher_ground())), vec!["UG-D3", "UG-D7"]);
}
