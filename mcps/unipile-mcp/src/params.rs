//! Parameter types for Unipile MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Messages returned by `unipile_get_chat_messages` when `batch_size` is omitted
pub const DEFAULT_BATCH_SIZE: i64 = 100;

/// Per-chat messages returned by `unipile_get_recent_messages` by default
pub const DEFAULT_RECENT_BATCH_SIZE: i64 = 20;

/// Chats returned by `unipile_get_chats` by default
pub const DEFAULT_CHAT_LIMIT: i64 = 10;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetChatMessagesParams {
    #[schemars(description = "The Unipile chat id to read messages from")]
    pub chat_id: String,

    #[schemars(
        description = "Maximum number of messages to return across all pages (default: 100)"
    )]
    #[serde(default)]
    pub batch_size: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetChatsParams {
    #[schemars(
        description = "The account source id, as found in the account's sources array (a trailing _MESSAGING is accepted)"
    )]
    pub account_id: String,

    #[schemars(description = "Maximum number of chats to return (default: 10)")]
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetRecentMessagesParams {
    #[schemars(
        description = "The account source id, as found in the account's sources array (a trailing _MESSAGING is accepted)"
    )]
    pub account_id: String,

    #[schemars(
        description = "Number of chats to scan and of messages to fetch per chat (default: 20)"
    )]
    #[serde(default)]
    pub batch_size: Option<i64>,
}
