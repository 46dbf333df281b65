//! Configuration management for the Weather MCP Server
//!
//! Handles environment variables and fixed process-wide settings.

use std::time::Duration;

use crate::error::{ConfigError, Result, WeatherMcpError};

/// Default per-fetch timeout in milliseconds
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default cap on forecast periods returned by `get_forecast`
const DEFAULT_MAX_FORECAST_PERIODS: usize = 5;

/// Default interval between stream `ping` events
const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for the Weather MCP Server
///
/// Read once at startup and shared read-only across all requests and
/// channels; never mutated at runtime.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream weather API
    pub nws_api_base: String,

    /// User-Agent header sent on every upstream request
    pub user_agent: String,

    /// Per-fetch timeout (applies to each upstream call independently)
    pub request_timeout: Duration,

    /// Maximum number of forecast periods returned by `get_forecast`
    pub max_forecast_periods: usize,

    /// Interval between `ping` events on an open stream channel
    pub ping_interval: Duration,
}

impl Config {
    /// Create a new configuration from the environment
    ///
    /// Unset variables fall back to defaults; a variable that is set but
    /// unparseable is a startup error rather than a silent default.
    pub fn new() -> Result<Self> {
        let nws_api_base =
            std::env::var("NWS_API_BASE").unwrap_or_else(|_| nws::API_BASE_URL.to_string());

        let user_agent =
            std::env::var("USER_AGENT").unwrap_or_else(|_| nws::DEFAULT_USER_AGENT.to_string());

        let request_timeout_ms = parse_env_var("REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT_MS)?;

        let max_forecast_periods =
            parse_env_var("MAX_FORECAST_PERIODS", DEFAULT_MAX_FORECAST_PERIODS)?;

        Ok(Self {
            nws_api_base,
            user_agent,
            request_timeout: Duration::from_millis(request_timeout_ms),
            max_forecast_periods,
            ping_interval: DEFAULT_PING_INTERVAL,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nws_api_base: nws::API_BASE_URL.to_string(),
            user_agent: nws::DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            max_forecast_periods: DEFAULT_MAX_FORECAST_PERIODS,
            ping_interval: DEFAULT_PING_INTERVAL,
        }
    }
}

/// Parse an environment variable, erroring only when it is set but invalid
fn parse_env_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| {
            WeatherMcpError::Config(ConfigError::InvalidEnvVar {
                var: name.to_string(),
                value,
            })
        }),
        Err(_) => Ok(default),
    }
}

/// National Weather Service API constants
pub mod nws {
    /// Base URL for the NWS API
    pub const API_BASE_URL: &str = "https://api.weather.gov";

    /// Default User-Agent (NWS rejects requests without one)
    pub const DEFAULT_USER_AGENT: &str =
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    /// Content type the NWS API serves
    pub const GEO_JSON_ACCEPT: &str = "application/geo+json";
}
