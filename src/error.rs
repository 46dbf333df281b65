//! Error types for the Weather MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.
//! Upstream weather-API failures are deliberately absent: the client absorbs
//! them into an `Option` and the tools report them as prose (see
//! `weather::client`).

use thiserror::Error;

/// Main error type for the Weather MCP Server
#[derive(Error, Debug)]
pub enum WeatherMcpError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {value}")]
    InvalidEnvVar { var: String, value: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// MCP protocol errors
///
/// All variants surface to callers as a `-32603` internal-error envelope;
/// the protocol defines no finer-grained taxonomy for tool failures.
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Protocol error: {message}")]
    ProtocolError { message: String },
}

/// Result type alias for Weather MCP operations
pub type Result<T> = std::result::Result<T, WeatherMcpError>;
