//! MCP Tool definitions and handlers
//!
//! Defines the weather tools and their implementations. Arguments are
//! validated against the declared input schema before any upstream call is
//! made; upstream failures are reported as prose in a successful result,
//! never as protocol errors.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::McpError;
use crate::mcp::types::Tool;
use crate::weather::client::WeatherClient;
use crate::weather::format::{format_alert, format_forecast_period, SECTION_SEPARATOR};

/// Tool handler
///
/// Holds the fixed tool catalog; built once per server construction and
/// never mutated.
pub struct ToolHandler {
    weather_client: Arc<WeatherClient>,
    tools: Vec<Tool>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(weather_client: Arc<WeatherClient>) -> Self {
        let tools = vec![
            tool_def(
                "get_alerts",
                "Get active weather alerts for a US state",
                get_alerts_schema(),
            ),
            tool_def(
                "get_forecast",
                "Get the weather forecast for a location",
                get_forecast_schema(),
            ),
        ];

        Self {
            weather_client,
            tools,
        }
    }

    /// List all available tools, in declaration order
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.clone()
    }

    /// Call a tool by name
    ///
    /// Fails with `UnknownTool` for an unrecognized name and with
    /// `InvalidArguments` when the arguments do not satisfy the declared
    /// schema; both are mapped to `-32603` by the dispatcher.
    pub async fn call_tool(&self, name: &str, args: Value) -> Result<String, McpError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| McpError::UnknownTool {
                name: name.to_string(),
            })?;

        validate_arguments(&tool.input_schema, &args)?;

        match name {
            "get_alerts" => self.handle_get_alerts(args).await,
            "get_forecast" => self.handle_get_forecast(args).await,
            _ => Err(McpError::UnknownTool {
                name: name.to_string(),
            }),
        }
    }

    // ==================== Tool Handlers ====================

    async fn handle_get_alerts(&self, args: Value) -> Result<String, McpError> {
        #[derive(Deserialize)]
        struct Args {
            state: String,
        }

        let args: Args = parse_args(args)?;

        let Some(data) = self.weather_client.active_alerts(&args.state).await else {
            return Ok("Unable to fetch alerts or no alerts found.".to_string());
        };

        let Some(features) = data.get("features").and_then(Value::as_array) else {
            return Ok("Unable to fetch alerts or no alerts found.".to_string());
        };

        if features.is_empty() {
            return Ok("No active alerts for this state.".to_string());
        }

        Ok(features
            .iter()
            .map(format_alert)
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR))
    }

    async fn handle_get_forecast(&self, args: Value) -> Result<String, McpError> {
        #[derive(Deserialize)]
        struct Args {
            latitude: f64,
            longitude: f64,
        }

        let args: Args = parse_args(args)?;

        let Some(points) = self
            .weather_client
            .point_metadata(args.latitude, args.longitude)
            .await
        else {
            return Ok("Unable to fetch forecast data for this location.".to_string());
        };

        let forecast_url = points
            .pointer("/properties/forecast")
            .and_then(Value::as_str);

        let forecast = match forecast_url {
            Some(url) => self.weather_client.forecast(url).await,
            None => None,
        };

        let Some(forecast) = forecast else {
            return Ok("Unable to fetch detailed forecast.".to_string());
        };

        let Some(periods) = forecast
            .pointer("/properties/periods")
            .and_then(Value::as_array)
        else {
            return Ok("Unable to fetch detailed forecast.".to_string());
        };

        if periods.is_empty() {
            return Ok("No forecast periods available.".to_string());
        }

        Ok(periods
            .iter()
            .take(self.weather_client.max_forecast_periods())
            .map(format_forecast_period)
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR))
    }
}

/// Deserialize tool arguments into a typed struct
fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T, McpError> {
    serde_json::from_value(args).map_err(|e| McpError::InvalidArguments {
        message: e.to_string(),
    })
}

/// Validate a tool-call argument object against a declared input schema
///
/// Checks that every `required` parameter is present and that every present
/// parameter matches its declared primitive type (`string`, `number`).
pub fn validate_arguments(schema: &Value, args: &Value) -> Result<(), McpError> {
    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    for name in required.iter().filter_map(Value::as_str) {
        if args.get(name).is_none() {
            return Err(McpError::InvalidArguments {
                message: format!("missing required parameter: {}", name),
            });
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (name, declared) in properties {
        let Some(value) = args.get(name) else {
            continue;
        };

        let matches = match declared.get("type").and_then(Value::as_str) {
            Some("string") => value.is_string(),
            Some("number") => value.is_number(),
            _ => true,
        };

        if !matches {
            return Err(McpError::InvalidArguments {
                message: format!(
                    "parameter {} does not match declared type {}",
                    name,
                    declared.get("type").and_then(Value::as_str).unwrap_or("?")
                ),
            });
        }
    }

    Ok(())
}

// ==================== Schema Definitions ====================

fn tool_def(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn get_alerts_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "state": {
                "type": "string",
                "description": "Two-letter US state code (e.g. CA, NY)"
            }
        },
        "required": ["state"]
    })
}

fn get_forecast_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "latitude": {
                "type": "number",
                "description": "Latitude of the location"
            },
            "longitude": {
                "type": "number",
                "description": "Longitude of the location"
            }
        },
        "required": ["latitude", "longitude"]
    })
}
