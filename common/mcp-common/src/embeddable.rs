//! In-process execution of MCP servers
//!
//! [`EmbeddableMcp`] lets a host call a server's tools directly, without a
//! stdio transport in between. Each server maps tool names onto its own
//! handler methods.
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//!
//! let result = server
//!     .call_tool("unipile_get_chat_messages", serde_json::json!({ "chat_id": "abc" }))
//!     .await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Error type for embedded tool calls
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Arguments did not match the tool's input schema
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// The tool ran and failed. Carries the MCP error unchanged so callers
    /// keep its code and structured data.
    #[error("tool execution failed: {}", .0.message)]
    Execution(rmcp::ErrorData),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::Execution(err)
    }
}

impl From<serde_json::Error> for EmbeddableError {
    fn from(err: serde_json::Error) -> Self {
        EmbeddableError::InvalidParams(err.to_string())
    }
}

pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// An MCP server that can be driven in-process
///
/// Implementations must be `Send + Sync`; hosts may issue concurrent calls
/// from several tasks.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Name used for the server in MCP client configuration
    fn server_name(&self) -> &str;

    /// All tools with their names, descriptions and input schemas
    fn list_tools(&self) -> Vec<Tool>;

    /// Run the tool `name` with JSON `params`
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }
}
