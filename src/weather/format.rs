//! Text formatting for weather tool output
//!
//! Converts raw NWS payload fragments into the fixed display templates the
//! tools return. Missing fields never fail; they fall back to placeholder
//! text.

use serde_json::Value;

/// Separator between formatted alert/forecast blocks
pub const SECTION_SEPARATOR: &str = "\n---\n";

/// Read a string field, falling back when absent or not a string
fn str_or<'a>(value: &'a Value, field: &str, fallback: &'a str) -> &'a str {
    value.get(field).and_then(Value::as_str).unwrap_or(fallback)
}

/// Format a single alert feature as a display block
///
/// `feature` is one element of the NWS `features` array; the fields of
/// interest live under its `properties` object.
pub fn format_alert(feature: &Value) -> String {
    static EMPTY: Value = Value::Null;
    let props = feature.get("properties").unwrap_or(&EMPTY);

    format!(
        "Event: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}",
        str_or(props, "event", "Unknown"),
        str_or(props, "areaDesc", "Unknown"),
        str_or(props, "severity", "Unknown"),
        str_or(props, "description", "No description available"),
        str_or(props, "instruction", "No specific instructions provided"),
    )
}

/// Format a single forecast period as a display block
pub fn format_forecast_period(period: &Value) -> String {
    let temperature = period
        .get("temperature")
        .and_then(Value::as_i64)
        .map(|t| t.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    format!(
        "{}:\nTemperature: {}°{}\nWind: {} {}\n{}",
        str_or(period, "name", "Unknown"),
        temperature,
        str_or(period, "temperatureUnit", "F"),
        str_or(period, "windSpeed", "Unknown"),
        str_or(period, "windDirection", ""),
        str_or(period, "detailedForecast", "No detailed forecast available"),
    )
}
