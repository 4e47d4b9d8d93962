//! Wire types for the Unipile REST API
//!
//! Messages, chats and accounts are kept as untyped JSON objects. Their shape
//! differs per source platform and this server passes them through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One JSON object as returned by Unipile
pub type Record = Map<String, Value>;

/// A chat message, exactly as Unipile returned it
pub type Message = Record;

/// Opaque pagination token issued by Unipile
///
/// Never parsed or inspected; only handed back on the next request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a token. Empty tokens mean "no more pages" and yield `None`.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of chat history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    /// Where the next page starts; `None` on the last page
    pub next_cursor: Option<Cursor>,
}

/// Envelope shared by Unipile list endpoints:
/// `{"object": "MessageList", "items": [...], "cursor": "..."}`
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub items: Vec<Record>,
    #[serde(default)]
    pub cursor: Option<String>,
}

impl ListEnvelope {
    /// Items and next cursor, if the envelope is the expected list kind
    ///
    /// A mismatched `object` tag is logged and read as an empty last page.
    pub fn into_page(self, expected: &str) -> (Vec<Record>, Option<Cursor>) {
        match self.object.as_deref() {
            Some(kind) if kind != expected => {
                tracing::warn!(expected, actual = kind, "Unexpected Unipile list object");
                (Vec::new(), None)
            }
            _ => (self.items, self.cursor.and_then(Cursor::new)),
        }
    }
}

/// Id of a record, when it carries a string `id` field
pub fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}
