//! Unipile MCP Library
//!
//! Chat history from the messaging accounts connected to a Unipile workspace
//! (LinkedIn, WhatsApp, Instagram, Messenger, Telegram, mail), exposed as MCP
//! tools and resources.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use unipile_mcp::{Config, UnipileMcpServer};
//!
//! let config = Config::from_env()?;
//! let server = UnipileMcpServer::new(&config)?;
//! // Serve via stdio, or call tools in-process through EmbeddableMcp
//! ```
//!
//! # Usage as Binary
//!
//! Run directly: `UNIPILE_DSN=... UNIPILE_API_KEY=... unipile-mcp`
//!
//! Or configure in `.mcp.json`:
//! ```json
//! { "mcpServers": { "unipile": { "command": "./unipile-mcp" } } }
//! ```

pub mod aggregator;
pub mod config;
pub mod handlers;
pub mod params;
pub mod resources;
pub mod server;
pub mod unipile;

#[cfg(test)]
mod testing;

// Re-export main server and configuration types
pub use config::{Args, Config, ConfigError};
pub use server::UnipileMcpServer;

// Re-export parameter types for direct API usage
pub use params::*;

// Re-export EmbeddableMcp trait for in-process usage
pub use mcp_common::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
