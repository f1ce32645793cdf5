use super::*;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::json;

/// Serve `router` on an ephemeral localhost port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn live_config(base_url: String, mode: LiveStatusMode) -> LiveStatusConfig {
    LiveStatusConfig {
        base_url,
        mode,
        desk_id: "DG-D1".into(),
        poll_interval_ms: 5000,
        request_timeout_ms: 300,
        connect_timeout_ms: 300,
    }
}

// =============================================================================
// Pure parsing
// =============================================================================

#[test]
fn parses_snake_case_desk_id() {
    let body = r#"[{"desk_id":"DG-D1","status":"Occupied"}]"#;
    let report = parse_array_payload(body, StatusScheme::Reserved).unwrap();
    assert_eq!(report, StatusReport { desk_id: "DG-D1".into(), status: OccupancyStatus::Occupied });
}

#[test]
fn parses_camel_case_desk_id() {
    let body = r#"[{"deskId":"DG-D1","status":"vacant"}]"#;
    let report = parse_array_payload(body, StatusScheme::Reserved).unwrap();
    assert_eq!(report.desk_id, "DG-D1");
    assert_eq!(report.status, OccupancyStatus::Available);
}

#[test]
fn snake_case_wins_when_both_keys_present() {
    let body = r#"[{"desk_id":"DG-D1","deskId":"OTHER","status":"reserved"}]"#;
    let report = parse_array_payload(body, StatusScheme::Reserved).unwrap();
    assert_eq!(report.desk_id, "DG-D1");
    assert_eq!(report.status, OccupancyStatus::Reserved);
}

#[test]
fn only_first_element_is_consulted() {
    let body = r#"[{"desk_id":"A","status":"occupied"},{"desk_id":"B","status":"vacant"}]"#;
    let report = parse_array_payload(body, StatusScheme::Reserved).unwrap();
    assert_eq!(report.desk_id, "A");
}

#[test]
fn rejects_non_array_payloads() {
    let err = parse_array_payload(r#"{"desk_id":"DG-D1","status":"occupied"}"#, StatusScheme::Reserved);
    assert_eq!(err, Err(PayloadError::NotAnArray));
}

#[test]
fn rejects_empty_array() {
    assert_eq!(parse_array_payload("[]", StatusScheme::Reserved), Err(PayloadError::Empty));
}

#[test]
fn rejects_missing_identifier() {
    let err = parse_array_payload(r#"[{"status":"occupied"}]"#, StatusScheme::Reserved);
    assert_eq!(err, Err(PayloadError::MissingDeskId));
}

#[test]
fn rejects_missing_status() {
    let err = parse_array_payload(r#"[{"desk_id":"DG-D1"}]"#, StatusScheme::Reserved);
    assert_eq!(err, Err(PayloadError::MissingStatus));
}

#[test]
fn rejects_unknown_status_value() {
    let err = parse_array_payload(r#"[{"desk_id":"DG-D1","status":"broken"}]"#, StatusScheme::Reserved);
    assert_eq!(err, Err(PayloadError::UnknownStatus("broken".into())));
}

#[test]
fn rejects_malformed_json() {
    assert!(matches!(
        parse_array_payload("[{not json", StatusScheme::Reserved),
        Err(PayloadError::Malformed(_))
    ));
    assert!(matches!(
        parse_array_payload(r#"[{"desk_id":7,"status":"occupied"}]"#, StatusScheme::Reserved),
        Err(PayloadError::Malformed(_))
    ));
}

#[test]
fn single_payload_uses_requested_desk_id() {
    let report = parse_single_payload(r#"{"status":"VACANT"}"#, "DG-D1", StatusScheme::Unsure).unwrap();
    assert_eq!(report, StatusReport { desk_id: "DG-D1".into(), status: OccupancyStatus::Available });
}

#[test]
fn single_payload_accepts_unsure_under_unsure_scheme() {
    let report = parse_single_payload(r#"{"status":"unsure"}"#, "DG-D1", StatusScheme::Unsure).unwrap();
    assert_eq!(report.status, OccupancyStatus::Reserved);
    assert!(parse_single_payload(r#"{"status":"unsure"}"#, "DG-D1", StatusScheme::Reserved).is_err());
}

// =============================================================================
// URL resolution
// =============================================================================

#[test]
fn array_mode_polls_base_url_verbatim() {
    let url = status_url("http://desks.test:8080/api", LiveStatusMode::Array, "DG-D1").unwrap();
    assert_eq!(url.as_str(), "http://desks.test:8080/api");
}

#[test]
fn per_desk_mode_appends_status_path() {
    let url = status_url("http://desks.test:8080", LiveStatusMode::PerDesk, "DG-D1").unwrap();
    assert_eq!(url.as_str(), "http://desks.test:8080/api/desks/DG-D1/status");
}

#[test]
fn per_desk_mode_escapes_desk_id() {
    let url = status_url("http://desks.test", LiveStatusMode::PerDesk, "desk 1/a").unwrap();
    assert_eq!(url.as_str(), "http://desks.test/api/desks/desk%201%2Fa/status");
}

#[test]
fn invalid_base_url_is_rejected() {
    assert!(matches!(
        status_url("not a url", LiveStatusMode::Array, "DG-D1"),
        Err(DeskApiError::InvalidUrl(_))
    ));
}

// =============================================================================
// HTTP round trips against a local server
// =============================================================================

#[tokio::test]
async fn fetches_array_contract() {
    let router = Router::new().route("/api", get(|| async { axum::Json(json!([{"desk_id": "DG-D1", "status": "occupied"}])) }));
    let base = serve(router).await;
    let client = DeskApiClient::new(&live_config(format!("{base}/api"), LiveStatusMode::Array), StatusScheme::Reserved)
        .unwrap();

    let report = client.fetch_status().await.unwrap();
    assert_eq!(report, StatusReport { desk_id: "DG-D1".into(), status: OccupancyStatus::Occupied });
}

#[tokio::test]
async fn fetches_per_desk_contract() {
    let router = Router::new().route(
        "/api/desks/{desk_id}/status",
        get(|axum::extract::Path(desk_id): axum::extract::Path<String>| async move {
            if desk_id == "DG-D1" {
                (StatusCode::OK, axum::Json(json!({"status": "reserved"})))
            } else {
                (StatusCode::NOT_FOUND, axum::Json(json!({})))
            }
        }),
    );
    let base = serve(router).await;
    let client = DeskApiClient::new(&live_config(base, LiveStatusMode::PerDesk), StatusScheme::Reserved).unwrap();
    assert_eq!(client.desk_id(), "DG-D1");

    let report = client.fetch_status().await.unwrap();
    assert_eq!(report.status, OccupancyStatus::Reserved);
}

#[tokio::test]
async fn non_success_status_is_soft_error() {
    let router = Router::new().route("/api", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    let base = serve(router).await;
    let client = DeskApiClient::new(&live_config(format!("{base}/api"), LiveStatusMode::Array), StatusScheme::Reserved)
        .unwrap();

    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, DeskApiError::Status { status: 503 }));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let router = Router::new().route(
        "/api",
        get(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            axum::Json(json!([]))
        }),
    );
    let base = serve(router).await;
    let client = DeskApiClient::new(&live_config(format!("{base}/api"), LiveStatusMode::Array), StatusScheme::Reserved)
        .unwrap();

    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, DeskApiError::Request(_)));
}

#[tokio::test]
async fn garbage_body_is_payload_error() {
    let router = Router::new().route("/api", get(|| async { "definitely not json" }));
    let base = serve(router).await;
    let client = DeskApiClient::new(&live_config(format!("{base}/api"), LiveStatusMode::Array), StatusScheme::Reserved)
        .unwrap();

    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, DeskApiError::Payload(PayloadError::Malformed(_))));
}
