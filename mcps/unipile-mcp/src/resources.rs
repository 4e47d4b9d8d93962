//! MCP resources exposed by the Unipile server

use rmcp::model::{AnnotateAble, RawResource, Resource};
use serde_json::{json, Value};

use crate::params::{GetChatMessagesParams, DEFAULT_BATCH_SIZE};

pub const MESSAGES_URI: &str = "unipile://messages";
pub const ACCOUNTS_URI: &str = "unipile://accounts";

const JSON_MIME: &str = "application/json";

/// Messaging platforms Unipile can aggregate
pub const PLATFORMS: &[&str] = &[
    "Mobile",
    "Mail",
    "WhatsApp",
    "LinkedIn",
    "Slack",
    "Twitter",
    "Telegram",
    "Instagram",
    "Messenger",
];

fn resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some(JSON_MIME.to_string());
    raw.no_annotation()
}

/// Every resource this server can read
pub fn catalog() -> Vec<Resource> {
    vec![
        resource(
            MESSAGES_URI,
            "Unipile messages",
            "How to fetch chat history through unipile_get_chat_messages",
        ),
        resource(
            ACCOUNTS_URI,
            "Unipile accounts",
            "Messaging accounts connected to this Unipile workspace",
        ),
    ]
}

/// Static description of the message tool, built without any upstream call
pub fn messages_descriptor(page_max: usize) -> Value {
    let input_schema = schemars::schema_for!(GetChatMessagesParams);

    json!({
        "uri": MESSAGES_URI,
        "description": "Messages from a single chat, in the order Unipile returns them",
        "tool": "unipile_get_chat_messages",
        "input_schema": input_schema,
        "default_batch_size": DEFAULT_BATCH_SIZE,
        "page_max": page_max,
        "platforms": PLATFORMS,
    })
}
