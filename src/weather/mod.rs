//! Weather API module
//!
//! Contains the upstream National Weather Service client and the text
//! formatting used for tool output.

pub mod client;
pub mod format;
