use super::test_helpers::{TEST_NOW, test_app_state, test_app_state_with, test_config};
use super::*;
use crate::config::{LiveStatusConfig, LiveStatusMode};
use crate::desk::OccupancyStatus;
use crate::registry::DEMO_DESK_ID;
use crate::services::desk_api::StatusReport;
use time::macros::datetime;

#[tokio::test]
async fn demo_floor_shows_only_live_desk() {
    let state = test_app_state();
    let desks = state.desks_for_floor(DEMO_FLOOR_ID).await;
    assert_eq!(desks.len(), 1);
    assert_eq!(desks[0].desk_id, DEMO_DESK_ID);
    assert_eq!(desks[0].status(), OccupancyStatus::Available);
}

#[tokio::test]
async fn simulated_floor_excludes_live_desk() {
    let state = test_app_state();
    let ids: Vec<String> = state
        .desks_for_floor("ussher-gf")
        .await
        .into_iter()
        .map(|d| d.desk_id)
        .collect();
    let expected: Vec<String> = (1..=8).map(|i| format!("UG-D{i}")).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn live_desk_on_simulated_floor_keeps_registry_order() {
    let mut config = test_config();
    config.live = Some(LiveStatusConfig {
        base_url: "http://desks.test".into(),
        mode: LiveStatusMode::Array,
        desk_id: "UG-D3".into(),
        poll_interval_ms: 5000,
        request_timeout_ms: 5000,
        connect_timeout_ms: 5000,
    });
    let state = test_app_state_with(&config);

    let desks = state.desks_for_floor("ussher-gf").await;
    let ids: Vec<&str> = desks.iter().map(|d| d.desk_id.as_str()).collect();
    assert_eq!(ids.len(), 8);
    assert_eq!(ids[2], "UG-D3");
    assert!(state.simulator.all_desks().await.iter().all(|d| d.desk_id != "UG-D3"));
    // The demo desk is simulated again when the live poller owns another desk.
    assert_eq!(state.desks_for_floor(DEMO_FLOOR_ID).await.len(), 1);
}

#[tokio::test]
async fn last_update_is_newest_of_both_engines() {
    let state = test_app_state();
    assert_eq!(state.last_update().await, TEST_NOW);

    let later = datetime!(2025-03-01 10:05:00 UTC);
    state
        .live
        .apply_report(Ok(StatusReport { desk_id: DEMO_DESK_ID.into(), status: OccupancyStatus::Occupied }), later)
        .await;
    assert_eq!(state.last_update().await, later);
}

#[tokio::test]
async fn subscribe_yields_both_revisions() {
    let state = test_app_state();
    let (sim_rx, live_rx) = state.subscribe();
    assert_eq!(*sim_rx.borrow(), 0);
    assert_eq!(*live_rx.borrow(), 0);
}
