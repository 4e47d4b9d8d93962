//! Error types for Unipile API calls
//!
//! Each failure mode the caller may want to react to differently gets its
//! own variant. Status-based variants keep the upstream status and body.

use mcp_common::{internal_error_with_data, IntoMcpError, McpError};
use serde_json::json;
use thiserror::Error;

/// Errors from a single Unipile request
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// 401 or 403: the API key was rejected
    #[error("Unipile rejected the API key ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// 404: unknown chat, account or endpoint
    #[error("Unipile resource not found ({status}): {body}")]
    NotFound { status: u16, body: String },

    /// 429
    #[error("Unipile rate limit hit ({status}): {body}")]
    RateLimited { status: u16, body: String },

    /// Any other non-success status
    #[error("Unipile returned unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Connection could not be made or broke mid-request
    #[error("network failure talking to Unipile: {0}")]
    NetworkFailure(String),

    /// The per-request timeout elapsed
    #[error("Unipile request timed out: {0}")]
    Timeout(String),

    /// Success status but a body that is not the expected JSON
    #[error("invalid response from Unipile: {0}")]
    InvalidResponse(String),
}

/// Result type alias for Unipile operations
pub type UpstreamResult<T> = Result<T, UpstreamError>;

impl UpstreamError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => UpstreamError::Unauthorized { status, body },
            404 => UpstreamError::NotFound { status, body },
            429 => UpstreamError::RateLimited { status, body },
            _ => UpstreamError::UnexpectedStatus { status, body },
        }
    }

    /// Stable snake_case name of the variant, reported to MCP callers
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Unauthorized { .. } => "unauthorized",
            UpstreamError::NotFound { .. } => "not_found",
            UpstreamError::RateLimited { .. } => "rate_limited",
            UpstreamError::UnexpectedStatus { .. } => "unexpected_status",
            UpstreamError::NetworkFailure(_) => "network_failure",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::InvalidResponse(_) => "invalid_response",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Unauthorized { status, .. }
            | UpstreamError::NotFound { status, .. }
            | UpstreamError::RateLimited { status, .. }
            | UpstreamError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            UpstreamError::Unauthorized { body, .. }
            | UpstreamError::NotFound { body, .. }
            | UpstreamError::RateLimited { body, .. }
            | UpstreamError::UnexpectedStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(err.to_string())
        } else if err.is_decode() {
            UpstreamError::InvalidResponse(err.to_string())
        } else {
            UpstreamError::NetworkFailure(err.to_string())
        }
    }
}

impl IntoMcpError for UpstreamError {
    fn into_mcp_error(self) -> McpError {
        let data = json!({
            "kind": self.kind(),
            "status": self.status(),
            "body": self.body(),
        });
        internal_error_with_data(self.to_string(), data)
    }
}
