//! Service configuration parsed from environment variables.

use crate::desk::StatusScheme;
use crate::registry::DEMO_DESK_ID;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_SIM_MIN_DELAY_MS: u64 = 3000;
pub const DEFAULT_SIM_MAX_DELAY_MS: u64 = 6000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// Which backend contract the live poller speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveStatusMode {
    /// `GET {base}` returning an array whose first element names the desk.
    Array,
    /// `GET {base}/api/desks/{id}/status` returning `{ "status": .. }`.
    PerDesk,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStatusConfig {
    pub base_url: String,
    pub mode: LiveStatusMode,
    pub desk_id: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub enabled: bool,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { enabled: true, min_delay_ms: DEFAULT_SIM_MIN_DELAY_MS, max_delay_ms: DEFAULT_SIM_MAX_DELAY_MS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskwatchConfig {
    pub port: u16,
    pub scheme: StatusScheme,
    pub simulation: SimulationConfig,
    /// `None` when `LIVE_STATUS_URL` is unset; the live desk then keeps its
    /// initial state.
    pub live: Option<LiveStatusConfig>,
    pub dashboard_dir: Option<String>,
}

impl DeskwatchConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `STATUS_SCHEME`: `reserved` (default) or `unsure`
    /// - `SIMULATION_ENABLED`: default `true`
    /// - `SIM_MIN_DELAY_MS` / `SIM_MAX_DELAY_MS`: default 3000 / 6000
    /// - `LIVE_STATUS_URL`: enables the live poller
    /// - `LIVE_STATUS_MODE`: `array` (default) or `per_desk`
    /// - `LIVE_DESK_ID`: default `DG-D1`
    /// - `LIVE_POLL_INTERVAL_MS`: default 5000
    /// - `LIVE_REQUEST_TIMEOUT_MS` / `LIVE_CONNECT_TIMEOUT_MS`: default 5000
    /// - `DASHBOARD_DIR`: static assets served as the fallback route
    pub fn from_env() -> Result<Self, ConfigError> {
        let scheme = match std::env::var("STATUS_SCHEME").ok() {
            Some(raw) => StatusScheme::parse(&raw)
                .ok_or_else(|| ConfigError::Parse(format!("unknown STATUS_SCHEME: {raw}")))?,
            None => StatusScheme::default(),
        };

        let min_delay_ms = env_parse("SIM_MIN_DELAY_MS", DEFAULT_SIM_MIN_DELAY_MS);
        let max_delay_ms = env_parse("SIM_MAX_DELAY_MS", DEFAULT_SIM_MAX_DELAY_MS);
        if min_delay_ms > max_delay_ms {
            return Err(ConfigError::Parse(format!(
                "SIM_MIN_DELAY_MS ({min_delay_ms}) exceeds SIM_MAX_DELAY_MS ({max_delay_ms})"
            )));
        }
        let simulation = SimulationConfig {
            enabled: parse_bool(std::env::var("SIMULATION_ENABLED").ok().as_deref())?,
            min_delay_ms,
            max_delay_ms,
        };

        let live = match std::env::var("LIVE_STATUS_URL").ok().filter(|v| !v.trim().is_empty()) {
            Some(url) => Some(LiveStatusConfig {
                base_url: url.trim_end_matches('/').to_string(),
                mode: parse_mode(std::env::var("LIVE_STATUS_MODE").ok().as_deref())?,
                desk_id: std::env::var("LIVE_DESK_ID").unwrap_or_else(|_| DEMO_DESK_ID.to_string()),
                poll_interval_ms: env_parse("LIVE_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS),
                request_timeout_ms: env_parse("LIVE_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS),
                connect_timeout_ms: env_parse("LIVE_CONNECT_TIMEOUT_MS", DEFAULT_CONNECT_TIMEOUT_MS),
            }),
            None => None,
        };

        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT),
            scheme,
            simulation,
            live,
            dashboard_dir: std::env::var("DASHBOARD_DIR").ok(),
        })
    }

    /// Desk id the live poller owns; the simulator never touches it.
    #[must_use]
    pub fn live_desk_id(&self) -> &str {
        self.live.as_ref().map_or(DEMO_DESK_ID, |live| live.desk_id.as_str())
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_mode(raw: Option<&str>) -> Result<LiveStatusMode, ConfigError> {
    match raw.unwrap_or("array") {
        "array" => Ok(LiveStatusMode::Array),
        "per_desk" => Ok(LiveStatusMode::PerDesk),
        other => Err(ConfigError::Parse(format!(
            "unsupported LIVE_STATUS_MODE '{other}' (expected 'array' or 'per_desk')"
        ))),
    }
}

fn parse_bool(raw: Option<&str>) -> Result<bool, ConfigError> {
    match raw.map(str::trim) {
        None | Some("1" | "true" | "yes") => Ok(true),
        Some("0" | "false" | "no") => Ok(false),
        Some(other) => Err(ConfigError::Parse(format!("SIMULATION_ENABLED must be a boolean, got '{other}'"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
