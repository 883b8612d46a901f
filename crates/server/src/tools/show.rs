//! doc_show tool implementation.
//!
//! Renders the cached copy of a document with its update time.

use docmirror_client::render_document;
use docmirror_core::{DocId, DocumentStore};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the doc_show tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocShowParams {
    /// Document number to render.
    #[serde(default = "default_id")]
    pub id: DocId,
}

fn default_id() -> DocId {
    1
}

/// Implementation of the doc_show tool.
pub async fn show_impl(store: &dyn DocumentStore, params: DocShowParams) -> Result<CallToolResult, McpError> {
    let entry = store.get_document(params.id).await?;
    Ok(CallToolResult::success(vec![Content::text(render_document(entry.as_ref()))]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::registry::result_text;
    use docmirror_client::render::{NO_CONTENT, NO_TIMESTAMP};
    use docmirror_core::CacheDb;

    #[tokio::test]
    async fn test_show_never_fetched() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.upsert_source(2, "https://docs.google.com/document/d/two/export?format=html")
            .await
            .unwrap();

        let result = show_impl(&db, DocShowParams { id: 2 }).await.unwrap();
        let html = result_text(&result);
        assert!(html.contains(NO_CONTENT));
        assert!(html.contains(NO_TIMESTAMP));
    }

    #[tokio::test]
    async fn test_show_cached() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.upsert_source(1, "https://docs.google.com/document/d/one/export?format=html")
            .await
            .unwrap();
        db.record_success(1, "<p>cached</p>", chrono::Utc::now()).await.unwrap();

        let result = show_impl(&db, DocShowParams { id: 1 }).await.unwrap();
        let html = result_text(&result);
        assert!(html.contains("<p>cached</p>"));
        assert!(!html.contains(NO_TIMESTAMP));
    }

    #[test]
    fn test_default_id() {
        let params: DocShowParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.id, 1);
    }
}
