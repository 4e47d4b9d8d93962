//! Unipile API access
//!
//! [`MessagingGateway`] is the seam between the MCP layer and the network.
//! [`UnipileClient`] is the HTTP implementation; tests substitute in-memory
//! gateways.

mod client;
mod error;
mod types;

pub use client::UnipileClient;
pub use error::{UpstreamError, UpstreamResult};
pub use types::{record_id, Cursor, Message, MessagePage, Record};

use async_trait::async_trait;

/// Operations this server needs from Unipile
///
/// Each call is a single request: no retries, no pagination.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Largest page size worth requesting
    fn page_max(&self) -> usize;

    /// Fetch one page of a chat's history
    ///
    /// `page_size` is clamped to `1..=page_max()`. `cursor` is the token from
    /// the previous page, or `None` for the first page.
    async fn fetch_page(
        &self,
        chat_id: &str,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> UpstreamResult<MessagePage>;

    /// All connected accounts
    async fn list_accounts(&self) -> UpstreamResult<Vec<Record>>;

    /// Up to `limit` chats belonging to `account_id`
    async fn list_chats(&self, account_id: &str, limit: usize) -> UpstreamResult<Vec<Record>>;
}
