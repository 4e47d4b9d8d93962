//! Unipile tool handler implementations
//!
//! Each handler validates its parameters before touching the network, then
//! returns the Unipile records as a JSON tool result.

use mcp_common::{invalid_params, json_success, CallToolResult, McpError, ResultExt};
use tokio_util::sync::CancellationToken;

use crate::aggregator::MessageAggregator;
use crate::params::*;

/// Reject blank identifiers; the original string is passed on untouched
fn require_non_empty<'a>(name: &str, value: &'a str) -> Result<&'a str, McpError> {
    if value.trim().is_empty() {
        return Err(invalid_params(format!("{name} cannot be empty")));
    }
    Ok(value)
}

fn positive_or_default(name: &str, value: Option<i64>, default: i64) -> Result<i64, McpError> {
    match value {
        None => Ok(default),
        Some(v) if v >= 1 => Ok(v),
        Some(v) => Err(invalid_params(format!(
            "{name} must be a positive integer, got {v}"
        ))),
    }
}

/// Unipile source ids come as `<account>_MESSAGING`; the chats endpoint
/// wants the bare account id
fn account_id(raw: &str) -> &str {
    raw.strip_suffix("_MESSAGING").unwrap_or(raw)
}

pub async fn get_chat_messages(
    aggregator: &MessageAggregator,
    params: GetChatMessagesParams,
    cancel: &CancellationToken,
) -> Result<CallToolResult, McpError> {
    let chat_id = require_non_empty("chat_id", &params.chat_id)?;
    let batch_size = positive_or_default("batch_size", params.batch_size, DEFAULT_BATCH_SIZE)?;

    tracing::info!(chat_id, batch_size, "Fetching chat messages");

    let messages = aggregator
        .collect_messages(chat_id, batch_size, cancel)
        .await
        .to_mcp_err()?;

    json_success(&messages)
}

pub async fn get_accounts(aggregator: &MessageAggregator) -> Result<CallToolResult, McpError> {
    tracing::info!("Listing connected accounts");

    let accounts = aggregator.gateway().list_accounts().await.to_mcp_err()?;
    json_success(&accounts)
}

pub async fn get_chats(
    aggregator: &MessageAggregator,
    params: GetChatsParams,
) -> Result<CallToolResult, McpError> {
    let account = account_id(require_non_empty("account_id", &params.account_id)?);
    let limit = positive_or_default("limit", params.limit, DEFAULT_CHAT_LIMIT)?;

    tracing::info!(account_id = account, limit, "Listing chats");

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let chats = aggregator
        .gateway()
        .list_chats(account, limit)
        .await
        .to_mcp_err()?;

    json_success(&chats)
}

pub async fn get_recent_messages(
    aggregator: &MessageAggregator,
    params: GetRecentMessagesParams,
    cancel: &CancellationToken,
) -> Result<CallToolResult, McpError> {
    let account = account_id(require_non_empty("account_id", &params.account_id)?);
    let batch_size = positive_or_default(
        "batch_size",
        params.batch_size,
        DEFAULT_RECENT_BATCH_SIZE,
    )?;

    tracing::info!(account_id = account, batch_size, "Fetching recent messages");

    let messages = aggregator
        .collect_recent_messages(account, batch_size, cancel)
        .await
        .to_mcp_err()?;

    json_success(&messages)
}
