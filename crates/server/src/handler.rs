//! MCP server handler implementation.
//!
//! Routes the registry and refresh tools to their implementations.

use std::sync::Arc;

use docmirror_client::Scheduler;
use docmirror_core::DocumentStore;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::tools::fetch_now::fetch_now_impl;
use crate::tools::registry::{delete_impl, list_impl, save_impl};
use crate::tools::show::show_impl;
use crate::tools::{DocDeleteParams, DocSaveParams, DocShowParams};

/// The MCP server handler for docmirror.
#[derive(Clone)]
pub struct DocMirrorServer {
    tool_router: ToolRouter<Self>,
    store: Arc<dyn DocumentStore>,
    scheduler: Arc<Scheduler>,
}

#[tool_router]
impl DocMirrorServer {
    pub fn new(store: Arc<dyn DocumentStore>, scheduler: Arc<Scheduler>) -> Self {
        Self { tool_router: Self::tool_router(), store, scheduler }
    }

    #[tool(description = "Register or replace the source URL for a document number. Cached content is kept until the next successful fetch.")]
    async fn doc_save(&self, params: Parameters<DocSaveParams>) -> Result<CallToolResult, McpError> {
        save_impl(self.store.as_ref(), params.0).await
    }

    #[tool(description = "Delete a document number together with its cached content.")]
    async fn doc_delete(&self, params: Parameters<DocDeleteParams>) -> Result<CallToolResult, McpError> {
        delete_impl(self.store.as_ref(), params.0).await
    }

    #[tool(description = "List registered document numbers and their source URLs.")]
    async fn doc_list(&self) -> Result<CallToolResult, McpError> {
        list_impl(self.store.as_ref()).await
    }

    /// Render the cached HTML. Never triggers a network fetch.
    #[tool(description = "Render the cached copy of a document with its last update time. Does not fetch.")]
    async fn doc_show(&self, params: Parameters<DocShowParams>) -> Result<CallToolResult, McpError> {
        show_impl(self.store.as_ref(), params.0).await
    }

    #[tool(description = "Fetch every registered document now and postpone the next scheduled refresh by a full period.")]
    async fn fetch_now(&self) -> Result<CallToolResult, McpError> {
        fetch_now_impl(&self.scheduler).await
    }
}

impl ServerHandler for DocMirrorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "docmirror".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
