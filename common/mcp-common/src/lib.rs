//! MCP Common - shared plumbing for the workspace's MCP servers
//!
//! - **Tracing**: [`init_tracing`] routes logs to stderr so stdout stays
//!   reserved for MCP frames
//! - **Errors**: [`IntoMcpError`] and friends turn domain errors into
//!   `rmcp::ErrorData` with optional structured `data`
//! - **Results**: [`json_success`] for JSON tool responses
//! - **Embedding**: [`EmbeddableMcp`] lets a host drive a server in-process
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{json_success, invalid_params, McpError, CallToolResult};
//!
//! fn my_tool(&self, id: &str) -> Result<CallToolResult, McpError> {
//!     if id.is_empty() {
//!         return Err(invalid_params("id cannot be empty"));
//!     }
//!     json_success(&self.lookup(id))
//! }
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{
    internal_error, internal_error_with_data, invalid_params, IntoMcpError, McpResult, ResultExt,
};
pub use init::{init_tracing, LogFormat};
pub use result::json_success;

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
