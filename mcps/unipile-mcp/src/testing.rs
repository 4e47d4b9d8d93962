//! Test doubles shared across module tests

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::unipile::{Cursor, MessagePage, MessagingGateway, Record, UpstreamError, UpstreamResult};

/// In-memory Unipile: chats hold numbered messages, cursors are offsets
pub struct FakeGateway {
    pub page_max: usize,
    pub chats: HashMap<String, usize>,
    pub account_chats: Vec<Record>,
    /// Fail with this status on the n-th page request (0-based)
    pub fail_on_call: Option<(usize, u16)>,
    /// Page sizes requested, in order
    pub calls: Mutex<Vec<usize>>,
    /// Account ids passed to `list_chats`
    pub chat_lookups: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new(page_max: usize) -> Self {
        Self {
            page_max,
            chats: HashMap::new(),
            account_chats: Vec::new(),
            fail_on_call: None,
            calls: Mutex::new(Vec::new()),
            chat_lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn with_chat(mut self, chat_id: &str, total: usize) -> Self {
        self.chats.insert(chat_id.to_string(), total);
        self
    }

    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingGateway for FakeGateway {
    fn page_max(&self) -> usize {
        self.page_max
    }

    async fn fetch_page(
        &self,
        chat_id: &str,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> UpstreamResult<MessagePage> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(page_size);
            calls.len() - 1
        };
        if let Some((n, status)) = self.fail_on_call {
            if n == call {
                return Err(UpstreamError::from_status(status, "denied".to_string()));
            }
        }

        let Some(&total) = self.chats.get(chat_id) else {
            return Err(UpstreamError::from_status(404, "no such chat".to_string()));
        };
        let offset: usize = cursor.map(|c| c.as_str().parse().unwrap()).unwrap_or(0);
        let end = (offset + page_size.min(self.page_max)).min(total);
        let messages = (offset..end)
            .map(|i| {
                serde_json::from_value(json!({ "id": format!("{chat_id}-{i}"), "seq": i }))
                    .unwrap()
            })
            .collect();
        let next_cursor = if end < total {
            Cursor::new(end.to_string())
        } else {
            None
        };
        Ok(MessagePage {
            messages,
            next_cursor,
        })
    }

    async fn list_accounts(&self) -> UpstreamResult<Vec<Record>> {
        Ok(vec![serde_json::from_value(json!({ "id": "acc", "type": "WHATSAPP" })).unwrap()])
    }

    async fn list_chats(&self, account_id: &str, limit: usize) -> UpstreamResult<Vec<Record>> {
        self.chat_lookups.lock().unwrap().push(account_id.to_string());
        Ok(self.account_chats.iter().take(limit).cloned().collect())
    }
}
