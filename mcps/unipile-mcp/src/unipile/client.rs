//! HTTP client for the Unipile REST API
//!
//! See: https://developer.unipile.com/reference

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use url::Url;

use super::error::{UpstreamError, UpstreamResult};
use super::types::{Cursor, ListEnvelope, MessagePage, Record};
use super::MessagingGateway;
use crate::config::{Config, ConfigError, API_KEY_VAR};

const MESSAGE_LIST: &str = "MessageList";
const CHAT_LIST: &str = "ChatList";
const ACCOUNT_LIST: &str = "AccountList";

/// Unipile client bound to one DSN and API key
#[derive(Clone)]
pub struct UnipileClient {
    client: Client,
    base_url: Url,
    page_max: usize,
}

impl UnipileClient {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut api_key = HeaderValue::from_str(config.credentials.api_key()).map_err(|e| {
            ConfigError::InvalidVar {
                var: API_KEY_VAR,
                reason: e.to_string(),
            }
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.credentials.base_url().clone(),
            page_max: config.page_max,
        })
    }

    /// `base_url` with `segments` appended, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET a list endpoint and unwrap its envelope
    async fn get_list(
        &self,
        url: Url,
        query: &[(&str, String)],
        expected: &str,
    ) -> UpstreamResult<(Vec<Record>, Option<Cursor>)> {
        tracing::debug!(path = url.path(), "Unipile request");

        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Unipile request failed");
            return Err(UpstreamError::from_status(status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        let envelope: ListEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

        Ok(envelope.into_page(expected))
    }
}

#[async_trait]
impl MessagingGateway for UnipileClient {
    fn page_max(&self) -> usize {
        self.page_max
    }

    async fn fetch_page(
        &self,
        chat_id: &str,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> UpstreamResult<MessagePage> {
        let limit = page_size.clamp(1, self.page_max.max(1));
        let url = self.endpoint(&["api", "v1", "chats", chat_id, "messages"]);

        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.as_str().to_string()));
        }

        let (messages, next_cursor) = self.get_list(url, &query, MESSAGE_LIST).await?;
        Ok(MessagePage {
            messages,
            next_cursor,
        })
    }

    async fn list_accounts(&self) -> UpstreamResult<Vec<Record>> {
        let url = self.endpoint(&["api", "v1", "accounts"]);
        let (accounts, _) = self.get_list(url, &[], ACCOUNT_LIST).await?;
        Ok(accounts)
    }

    async fn list_chats(&self, account_id: &str, limit: usize) -> UpstreamResult<Vec<Record>> {
        let url = self.endpoint(&["api", "v1", "chats"]);
        let query = [
            ("account_id", account_id.to_string()),
            ("limit", limit.max(1).to_string()),
        ];
        let (chats, _) = self.get_list(url, &query, CHAT_LIST).await?;
        Ok(chats)
    }
}
