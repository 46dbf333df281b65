//! Weather MCP Server Library
//!
//! A Model Context Protocol (MCP) server proxying the National Weather
//! Service API. Exposes weather alert and forecast tools over JSON-RPC
//! endpoints and a server-sent-events stream.

pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod weather;

pub use config::Config;
pub use error::{Result, WeatherMcpError};
