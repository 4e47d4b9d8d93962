//! MCP Server implementation for Unipile

use mcp_common::{
    async_trait, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError, ResultExt,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, ListResourcesResult, PaginatedRequestParam, ReadResourceRequestParam,
        ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, RoleServer,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::aggregator::MessageAggregator;
use crate::config::{Config, ConfigError};
use crate::handlers;
use crate::params::*;
use crate::resources::{self, ACCOUNTS_URI, MESSAGES_URI};
use crate::unipile::{MessagingGateway, UnipileClient};

const INSTRUCTIONS: &str = "Unipile MCP Server - read chat history from the messaging accounts \
     (WhatsApp, LinkedIn, Slack, Telegram, mail and more) connected to a Unipile workspace. \
     Use unipile_get_accounts to find account ids, unipile_get_chats to find chat ids, and \
     unipile_get_chat_messages to read a chat.";

/// The main Unipile MCP Server
#[derive(Clone)]
pub struct UnipileMcpServer {
    aggregator: MessageAggregator,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl UnipileMcpServer {
    /// Server backed by the Unipile HTTP API
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let client = UnipileClient::new(config)?;
        Ok(Self::with_gateway(Arc::new(client)))
    }

    pub fn with_gateway(gateway: Arc<dyn MessagingGateway>) -> Self {
        Self {
            aggregator: MessageAggregator::new(gateway),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Get messages from a Unipile chat. Follows pagination until batch_size messages \
                       are collected or the chat has no more history. Returns a JSON array of messages."
    )]
    async fn unipile_get_chat_messages(
        &self,
        Parameters(params): Parameters<GetChatMessagesParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_chat_messages(&self.aggregator, params, &context.ct).await
    }

    #[tool(description = "List all messaging accounts connected to Unipile")]
    async fn unipile_get_accounts(&self) -> Result<CallToolResult, McpError> {
        handlers::get_accounts(&self.aggregator).await
    }

    #[tool(
        description = "List chats of a Unipile account. Use the account's source id from \
                       unipile_get_accounts (a trailing _MESSAGING is accepted)."
    )]
    async fn unipile_get_chats(
        &self,
        Parameters(params): Parameters<GetChatsParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_chats(&self.aggregator, params).await
    }

    #[tool(
        description = "Get recent messages across the chats of a Unipile account. Each message \
                       carries a chat_info object naming the chat it came from."
    )]
    async fn unipile_get_recent_messages(
        &self,
        Parameters(params): Parameters<GetRecentMessagesParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        handlers::get_recent_messages(&self.aggregator, params, &context.ct).await
    }
}

impl UnipileMcpServer {
    /// JSON text of a resource
    pub async fn resource_text(&self, uri: &str) -> Result<String, McpError> {
        let value = match uri {
            MESSAGES_URI => resources::messages_descriptor(self.aggregator.gateway().page_max()),
            ACCOUNTS_URI => {
                let accounts = self
                    .aggregator
                    .gateway()
                    .list_accounts()
                    .await
                    .to_mcp_err()?;
                Value::Array(accounts.into_iter().map(Value::Object).collect())
            }
            _ => {
                return Err(McpError::resource_not_found(
                    format!("unknown resource: {uri}"),
                    Some(json!({ "uri": uri })),
                ))
            }
        };

        serde_json::to_string_pretty(&value).to_mcp_err()
    }
}

#[tool_handler]
impl rmcp::ServerHandler for UnipileMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(resources::catalog()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self.resource_text(&request.uri).await?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for UnipileMcpServer {
    fn server_name(&self) -> &str {
        "unipile"
    }

    fn server_description(&self) -> Option<&str> {
        Some(INSTRUCTIONS)
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        let cancel = CancellationToken::new();
        match name {
            "unipile_get_chat_messages" => {
                let params: GetChatMessagesParams = serde_json::from_value(params)?;
                handlers::get_chat_messages(&self.aggregator, params, &cancel)
                    .await
                    .map_err(Into::into)
            }

            "unipile_get_accounts" => handlers::get_accounts(&self.aggregator)
                .await
                .map_err(Into::into),

            "unipile_get_chats" => {
                let params: GetChatsParams = serde_json::from_value(params)?;
                handlers::get_chats(&self.aggregator, params)
                    .await
                    .map_err(Into::into)
            }

            "unipile_get_recent_messages" => {
                let params: GetRecentMessagesParams = serde_json::from_value(params)?;
                handlers::get_recent_messages(&self.aggregator, params, &cancel)
                    .await
                    .map_err(Into::into)
            }

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGateway;
    use rmcp::model::{ErrorCode, RawContent};

    fn server(gateway: FakeGateway) -> (UnipileMcpServer, Arc<FakeGateway>) {
        let gateway = Arc::new(gateway);
        (UnipileMcpServer::with_gateway(gateway.clone()), gateway)
    }

    fn result_json(result: &CallToolResult) -> Value {
        match &result.content[0].raw {
            RawContent::Text(text) => serde_json::from_str(&text.text).unwrap(),
            other => panic!("expected text content, got {other:?}"),
        }
    }

    fn execution_error(err: EmbeddableError) -> McpError {
        match err {
            EmbeddableError::Execution(e) => e,
            other => panic!("expected execution error, got {other:?}"),
        }
    }

    #[test]
    fn test_list_tools() {
        let (server, _) = server(FakeGateway::new(100));
        let tools = server.list_tools();

        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"unipile_get_chat_messages"));
        assert!(names.contains(&"unipile_get_accounts"));
        assert!(names.contains(&"unipile_get_chats"));
        assert!(names.contains(&"unipile_get_recent_messages"));
    }

    #[test]
    fn test_server_info_enables_resources() {
        use rmcp::ServerHandler;

        let (server, _) = server(FakeGateway::new(100));
        let info = server.get_info();

        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
    }

    #[tokio::test]
    async fn test_missing_chat_id_is_invalid_params() {
        let (server, gateway) = server(FakeGateway::new(100).with_chat("chat_123", 10));

        let err = server
            .call_tool("unipile_get_chat_messages", json!({ "batch_size": 5 }))
            .await
            .unwrap_err();

        assert!(matches!(err, EmbeddableError::InvalidParams(_)));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_chat_id_rejected_before_network() {
        let (server, gateway) = server(FakeGateway::new(100).with_chat("chat_123", 10));

        let err = server
            .call_tool("unipile_get_chat_messages", json!({ "chat_id": "   " }))
            .await
            .unwrap_err();

        assert_eq!(execution_error(err).code, ErrorCode::INVALID_PARAMS);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_batch_size_must_be_positive_integer() {
        let (server, gateway) = server(FakeGateway::new(100).with_chat("chat_123", 10));

        let err = server
            .call_tool(
                "unipile_get_chat_messages",
                json!({ "chat_id": "chat_123", "batch_size": 0 }),
            )
            .await
            .unwrap_err();
        assert_eq!(execution_error(err).code, ErrorCode::INVALID_PARAMS);

        let err = server
            .call_tool(
                "unipile_get_chat_messages",
                json!({ "chat_id": "chat_123", "batch_size": 1.5 }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EmbeddableError::InvalidParams(_)));

        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_chat_messages_across_pages() {
        let (server, gateway) = server(FakeGateway::new(100).with_chat("chat_123", 250));

        let result = server
            .call_tool(
                "unipile_get_chat_messages",
                json!({ "chat_id": "chat_123", "batch_size": 150 }),
            )
            .await
            .unwrap();

        let messages = result_json(&result);
        assert_eq!(messages.as_array().unwrap().len(), 150);
        assert_eq!(messages[0]["id"], "chat_123-0");
        assert_eq!(messages[149]["id"], "chat_123-149");
        assert_eq!(gateway.calls(), vec![100, 50]);
    }

    #[tokio::test]
    async fn test_default_batch_size() {
        let (server, _) = server(FakeGateway::new(100).with_chat("chat_123", 250));

        let result = server
            .call_tool("unipile_get_chat_messages", json!({ "chat_id": "chat_123" }))
            .await
            .unwrap();

        assert_eq!(result_json(&result).as_array().unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_empty_chat_is_success() {
        let (server, _) = server(FakeGateway::new(100).with_chat("quiet", 0));

        let result = server
            .call_tool("unipile_get_chat_messages", json!({ "chat_id": "quiet" }))
            .await
            .unwrap();

        assert!(result.is_error.is_none() || !result.is_error.unwrap());
        assert_eq!(result_json(&result), json!([]));
    }

    #[tokio::test]
    async fn test_upstream_error_carries_kind() {
        let mut gateway = FakeGateway::new(100).with_chat("chat_123", 250);
        gateway.fail_on_call = Some((0, 401));
        let (server, _) = server(gateway);

        let err = server
            .call_tool("unipile_get_chat_messages", json!({ "chat_id": "chat_123" }))
            .await
            .unwrap_err();

        let err = execution_error(err);
        let data = err.data.unwrap();
        assert_eq!(data["kind"], "unauthorized");
        assert_eq!(data["status"], 401);
    }

    #[tokio::test]
    async fn test_unknown_chat_is_not_found() {
        let (server, _) = server(FakeGateway::new(100));

        let err = server
            .call_tool("unipile_get_chat_messages", json!({ "chat_id": "nope" }))
            .await
            .unwrap_err();

        assert_eq!(execution_error(err).data.unwrap()["kind"], "not_found");
    }

    #[tokio::test]
    async fn test_cancelled_call_reports_cancelled() {
        let (server, gateway) = server(FakeGateway::new(100).with_chat("chat_123", 250));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let params = GetChatMessagesParams {
            chat_id: "chat_123".to_string(),
            batch_size: None,
        };
        let err = handlers::get_chat_messages(&server.aggregator, params, &cancel)
            .await
            .unwrap_err();

        assert_eq!(err.data.unwrap()["kind"], "cancelled");
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_chats_strips_messaging_suffix() {
        let mut gateway = FakeGateway::new(100);
        gateway.account_chats = vec![
            serde_json::from_value(json!({ "id": "c1", "name": "Alice" })).unwrap(),
            serde_json::from_value(json!({ "id": "c2", "name": "Bob" })).unwrap(),
        ];
        let (server, gateway) = server(gateway);

        let result = server
            .call_tool(
                "unipile_get_chats",
                json!({ "account_id": "abc_MESSAGING", "limit": 1 }),
            )
            .await
            .unwrap();

        assert_eq!(result_json(&result).as_array().unwrap().len(), 1);
        assert_eq!(*gateway.chat_lookups.lock().unwrap(), vec!["abc".to_string()]);
    }

    #[tokio::test]
    async fn test_get_recent_messages() {
        let mut gateway = FakeGateway::new(100).with_chat("c1", 30);
        gateway.account_chats =
            vec![serde_json::from_value(json!({ "id": "c1", "name": "Alice" })).unwrap()];
        let (server, _) = server(gateway);

        let result = server
            .call_tool("unipile_get_recent_messages", json!({ "account_id": "acc" }))
            .await
            .unwrap();

        let messages = result_json(&result);
        assert_eq!(messages.as_array().unwrap().len(), 20);
        assert_eq!(messages[0]["chat_info"]["name"], "Alice");
    }

    #[tokio::test]
    async fn test_get_accounts() {
        let (server, _) = server(FakeGateway::new(100));

        let result = server
            .call_tool("unipile_get_accounts", json!({}))
            .await
            .unwrap();

        assert_eq!(result_json(&result)[0]["type"], "WHATSAPP");
    }

    #[tokio::test]
    async fn test_resources() {
        let (server, gateway) = server(FakeGateway::new(100));

        let descriptor: Value =
            serde_json::from_str(&server.resource_text(MESSAGES_URI).await.unwrap()).unwrap();
        assert_eq!(descriptor["tool"], "unipile_get_chat_messages");
        assert!(gateway.calls().is_empty());

        let accounts: Value =
            serde_json::from_str(&server.resource_text(ACCOUNTS_URI).await.unwrap()).unwrap();
        assert_eq!(accounts[0]["id"], "acc");

        let err = server.resource_text("unipile://nope").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let (server, _) = server(FakeGateway::new(100));

        let result = server.call_tool("nonexistent_tool", json!({})).await;

        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }
}
