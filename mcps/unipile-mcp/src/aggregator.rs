//! Cursor-following message collection
//!
//! Unipile returns chat history a page at a time. [`MessageAggregator`]
//! keeps requesting pages until the caller's batch is full or Unipile has
//! nothing more to give.

use mcp_common::{internal_error_with_data, IntoMcpError, McpError};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::unipile::{record_id, Cursor, Message, MessagingGateway, Record, UpstreamError};

/// Why a collection run produced no result
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("message collection was cancelled")]
    Cancelled,
}

impl IntoMcpError for AggregateError {
    fn into_mcp_error(self) -> McpError {
        match self {
            AggregateError::Upstream(err) => err.into_mcp_error(),
            AggregateError::Cancelled => internal_error_with_data(
                self.to_string(),
                json!({ "kind": "cancelled", "status": null, "body": null }),
            ),
        }
    }
}

/// Drives a [`MessagingGateway`] across pages
#[derive(Clone)]
pub struct MessageAggregator {
    gateway: Arc<dyn MessagingGateway>,
}

impl MessageAggregator {
    pub fn new(gateway: Arc<dyn MessagingGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<dyn MessagingGateway> {
        &self.gateway
    }

    /// Collect up to `batch_size` messages from `chat_id`, in upstream order
    ///
    /// Stops when the batch is full, when Unipile returns no next cursor, or
    /// when a page comes back empty or adds no new message. A failed page discards everything
    /// collected so far. `batch_size <= 0` returns an empty list without
    /// calling Unipile.
    pub async fn collect_messages(
        &self,
        chat_id: &str,
        batch_size: i64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Message>, AggregateError> {
        if batch_size <= 0 {
            return Ok(Vec::new());
        }

        let target = usize::try_from(batch_size).unwrap_or(usize::MAX);
        let page_max = self.gateway.page_max().max(1);

        let mut collected: Vec<Message> = Vec::with_capacity(target.min(page_max));
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut cursor: Option<Cursor> = None;
        let mut pages = 0usize;

        loop {
            if cancel.is_cancelled() {
                return Err(AggregateError::Cancelled);
            }

            let page_size = (target - collected.len()).min(page_max);
            let page = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AggregateError::Cancelled),
                page = self.gateway.fetch_page(chat_id, cursor.as_ref(), page_size) => page?,
            };
            pages += 1;

            if page.messages.is_empty() {
                break;
            }

            let before = collected.len();
            for message in page.messages {
                // Unipile occasionally repeats a message across page boundaries
                if let Some(id) = record_id(&message) {
                    if !seen_ids.insert(id.to_string()) {
                        continue;
                    }
                }
                collected.push(message);
            }

            // a page of nothing but repeats cannot make progress
            if collected.len() == before {
                tracing::warn!(chat_id, pages, "Unipile returned only repeated messages, stopping");
                break;
            }

            if collected.len() >= target {
                break;
            }

            match page.next_cursor {
                Some(next) if cursor.as_ref() == Some(&next) => {
                    tracing::warn!(chat_id, pages, "Unipile repeated a cursor, stopping");
                    break;
                }
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        collected.truncate(target);
        tracing::debug!(chat_id, pages, count = collected.len(), "Collected chat messages");
        Ok(collected)
    }

    /// Recent messages across the chats of one account
    ///
    /// Lists up to `batch_size` chats, collects up to `batch_size` messages
    /// from each, and tags every message with a `chat_info` object naming
    /// its chat. Chats without an `id` are skipped.
    pub async fn collect_recent_messages(
        &self,
        account_id: &str,
        batch_size: i64,
        cancel: &CancellationToken,
    ) -> Result<Vec<Message>, AggregateError> {
        if batch_size <= 0 {
            return Ok(Vec::new());
        }

        let limit = usize::try_from(batch_size).unwrap_or(usize::MAX);
        let chats = self.gateway.list_chats(account_id, limit).await?;

        let mut all_messages = Vec::new();
        for chat in &chats {
            let Some(chat_id) = record_id(chat) else {
                continue;
            };

            let chat_info = chat_info(chat);
            let messages = self.collect_messages(chat_id, batch_size, cancel).await?;
            all_messages.extend(messages.into_iter().map(|mut message| {
                message.insert("chat_info".to_string(), chat_info.clone());
                message
            }));
        }

        tracing::debug!(
            account_id,
            chats = chats.len(),
            count = all_messages.len(),
            "Collected recent messages"
        );
        Ok(all_messages)
    }
}

fn chat_info(chat: &Record) -> Value {
    let field = |name: &str| chat.get(name).cloned().unwrap_or(Value::Null);
    json!({
        "id": field("id"),
        "name": field("name"),
        "account_type": field("account_type"),
        "account_id": field("account_id"),
    })
}
