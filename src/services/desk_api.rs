//! Remote desk status client.
//!
//! Thin HTTP wrapper over the two backend contracts the live poller
//! understands. Parsing is pure (`parse_array_payload`,
//! `parse_single_payload`) for testability.
//!
//! ERROR HANDLING
//! ==============
//! Every failure here is soft. Callers log it and keep the last known
//! state; nothing in this module retries.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::config::{LiveStatusConfig, LiveStatusMode};
use crate::desk::{OccupancyStatus, StatusScheme};

// =============================================================================
// ERRORS
// =============================================================================

/// A response body that could not be turned into a status report.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("malformed JSON: {0}")]
    Malformed(String),
    #[error("expected a JSON array")]
    NotAnArray,
    #[error("status array is empty")]
    Empty,
    #[error("missing desk id (expected `desk_id` or `deskId`)")]
    MissingDeskId,
    #[error("missing status field")]
    MissingStatus,
    #[error("unknown status value: {0}")]
    UnknownStatus(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DeskApiError {
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected response status {status}")]
    Status { status: u16 },
    #[error("unrecognized payload: {0}")]
    Payload(#[from] PayloadError),
}

// =============================================================================
// REPORT
// =============================================================================

/// One normalized status observation from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub desk_id: String,
    pub status: OccupancyStatus,
}

/// Source of live status reports. The poller only depends on this seam.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<StatusReport, DeskApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct DeskApiClient {
    http: reqwest::Client,
    url: Url,
    mode: LiveStatusMode,
    desk_id: String,
    scheme: StatusScheme,
}

impl DeskApiClient {
    pub fn new(config: &LiveStatusConfig, scheme: StatusScheme) -> Result<Self, DeskApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(|e| DeskApiError::HttpClientBuild(e.to_string()))?;
        let url = status_url(&config.base_url, config.mode, &config.desk_id)?;
        Ok(Self { http, url, mode: config.mode, desk_id: config.desk_id.clone(), scheme })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn desk_id(&self) -> &str {
        &self.desk_id
    }
}

#[async_trait::async_trait]
impl StatusSource for DeskApiClient {
    async fn fetch_status(&self) -> Result<StatusReport, DeskApiError> {
        let response = self
            .http
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DeskApiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeskApiError::Status { status: status.as_u16() });
        }

        let text = response
            .text()
            .await
            .map_err(|e| DeskApiError::Request(e.to_string()))?;

        // Per-desk responses omit the id; the request URL already names it.
        let report = match self.mode {
            LiveStatusMode::Array => parse_array_payload(&text, self.scheme)?,
            LiveStatusMode::PerDesk => parse_single_payload(&text, &self.desk_id, self.scheme)?,
        };
        Ok(report)
    }
}

/// Resolve the polled URL for `mode`.
pub fn status_url(base_url: &str, mode: LiveStatusMode, desk_id: &str) -> Result<Url, DeskApiError> {
    let mut url = Url::parse(base_url).map_err(|e| DeskApiError::InvalidUrl(format!("{base_url}: {e}")))?;
    if mode == LiveStatusMode::PerDesk {
        url.path_segments_mut()
            .map_err(|()| DeskApiError::InvalidUrl(format!("{base_url}: cannot be a base")))?
            .pop_if_empty()
            .extend(["api", "desks", desk_id, "status"]);
    }
    Ok(url)
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Element shape for the array contract. Both id spellings are accepted;
/// `desk_id` wins when both are present.
#[derive(Deserialize)]
struct ArrayEntry {
    #[serde(default)]
    desk_id: Option<String>,
    #[serde(default, rename = "deskId")]
    desk_id_camel: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct SingleStatus {
    #[serde(default)]
    status: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse `[{ "desk_id" | "deskId": .., "status": .. }, ..]`; only element 0
/// is consulted.
pub fn parse_array_payload(body: &str, scheme: StatusScheme) -> Result<StatusReport, PayloadError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| PayloadError::Malformed(e.to_string()))?;
    let serde_json::Value::Array(items) = value else {
        return Err(PayloadError::NotAnArray);
    };
    let first = items.into_iter().next().ok_or(PayloadError::Empty)?;
    let entry: ArrayEntry = serde_json::from_value(first).map_err(|e| PayloadError::Malformed(e.to_string()))?;

    let desk_id = entry
        .desk_id
        .or(entry.desk_id_camel)
        .ok_or(PayloadError::MissingDeskId)?;
    let raw_status = entry.status.ok_or(PayloadError::MissingStatus)?;
    let status = map_status(&raw_status, scheme)?;
    Ok(StatusReport { desk_id, status })
}

/// Parse `{ "status": .. }` for a desk named by the request URL.
pub fn parse_single_payload(body: &str, desk_id: &str, scheme: StatusScheme) -> Result<StatusReport, PayloadError> {
    let single: SingleStatus = serde_json::from_str(body).map_err(|e| PayloadError::Malformed(e.to_string()))?;
    let raw_status = single.status.ok_or(PayloadError::MissingStatus)?;
    let status = map_status(&raw_status, scheme)?;
    Ok(StatusReport { desk_id: desk_id.to_string(), status })
}

fn map_status(raw: &str, scheme: StatusScheme) -> Result<OccupancyStatus, PayloadError> {
    scheme
        .map_backend(raw)
        .ok_or_else(|| PayloadError::UnknownStatus(raw.to_string()))
}

#[cfg(test)]
#[path = "desk_api_test.rs"]
mod tests;
