//! National Weather Service API client
//!
//! Low-level client for the NWS API. Every failure mode — network error,
//! timeout, non-2xx status, unparseable body — collapses into `None`;
//! callers treat `None` as "data unavailable" rather than a distinguishable
//! error kind. Failures are logged here and nowhere else.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;

use crate::config::{nws, Config};
use crate::error::Result;

/// NWS API client
pub struct WeatherClient {
    /// HTTP client (carries User-Agent, Accept, and per-request timeout)
    http_client: reqwest::Client,

    /// Shared read-only configuration
    config: Arc<Config>,
}

impl WeatherClient {
    /// Create a new weather client
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(nws::GEO_JSON_ACCEPT));

        let http_client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Maximum number of forecast periods the formatter should emit
    pub fn max_forecast_periods(&self) -> usize {
        self.config.max_forecast_periods
    }

    /// Fetch a URL and parse the body as JSON
    ///
    /// Returns `None` on any failure; never returns an error and never
    /// panics. Each call gets its own independent timeout.
    pub async fn fetch_json(&self, url: &str) -> Option<Value> {
        let response = match self.http_client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                if e.is_timeout() {
                    tracing::warn!(url, "upstream request timed out");
                } else {
                    tracing::warn!(url, error = %e, "upstream request failed");
                }
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(url, status = %response.status(), "upstream returned error status");
            return None;
        }

        match response.json().await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to parse upstream response");
                None
            }
        }
    }

    /// Fetch active alerts for a US state code
    pub async fn active_alerts(&self, state: &str) -> Option<Value> {
        let url = format!(
            "{}/alerts/active/area/{}",
            self.config.nws_api_base,
            urlencoding::encode(state)
        );
        self.fetch_json(&url).await
    }

    /// Fetch grid-point metadata for a coordinate pair
    ///
    /// Coordinates are passed through as given; the NWS API reports its own
    /// failure for out-of-range values, which collapses to `None` here.
    pub async fn point_metadata(&self, latitude: f64, longitude: f64) -> Option<Value> {
        let url = format!(
            "{}/points/{:.4},{:.4}",
            self.config.nws_api_base, latitude, longitude
        );
        self.fetch_json(&url).await
    }

    /// Fetch a forecast document from the URL a point lookup returned
    pub async fn forecast(&self, forecast_url: &str) -> Option<Value> {
        self.fetch_json(forecast_url).await
    }
}
