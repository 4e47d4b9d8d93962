//! Error conversion helpers for MCP servers
//!
//! Tool handlers return `rmcp::ErrorData`. Domain error types implement
//! [`IntoMcpError`] so handlers can use `.to_mcp_err()?`.

use rmcp::ErrorData as McpError;
use serde_json::Value;

/// Type alias for MCP tool results
pub type McpResult<T> = Result<T, McpError>;

/// Conversion of a domain error into an MCP error
///
/// ```rust,ignore
/// impl IntoMcpError for MyError {
///     fn into_mcp_error(self) -> McpError {
///         internal_error_with_data(self.to_string(), json!({ "kind": self.kind() }))
///     }
/// }
/// ```
pub trait IntoMcpError {
    fn into_mcp_error(self) -> McpError;
}

impl IntoMcpError for serde_json::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(format!("JSON error: {}", self), None)
    }
}

impl IntoMcpError for String {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(self, None)
    }
}

/// Adds `to_mcp_err()` to any `Result` whose error implements [`IntoMcpError`]
pub trait ResultExt<T> {
    fn to_mcp_err(self) -> Result<T, McpError>;
}

impl<T, E: IntoMcpError> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> Result<T, McpError> {
        self.map_err(IntoMcpError::into_mcp_error)
    }
}

/// Internal error with a message and no data
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}

/// Internal error carrying a structured `data` payload for the caller
///
/// Use this when the caller needs to tell failure kinds apart without
/// parsing the message.
pub fn internal_error_with_data(message: impl Into<String>, data: Value) -> McpError {
    McpError::internal_error(message.into(), Some(data))
}

/// Invalid params error, for arguments rejected before any work is done
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::invalid_params(message.into(), None)
}
