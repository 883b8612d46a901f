//! doc_save, doc_delete and doc_list tool implementations.
//!
//! Manage the id to source URL registry.

use docmirror_core::{DocId, DocumentStore, Error, registry};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the doc_save tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocSaveParams {
    /// Document number (1 or higher). Saving over an existing number replaces its URL.
    pub id: DocId,

    /// Export URL of the document (HTML export).
    pub url: String,
}

/// Parameters for the doc_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocDeleteParams {
    /// Document number to delete.
    pub id: DocId,
}

/// Output from the doc_save and doc_delete tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RegistryChangeOutput {
    pub id: DocId,
    /// False when doc_delete found nothing under `id`.
    pub changed: bool,
    pub message: String,
}

/// One registered document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocListItem {
    pub id: DocId,
    pub url: String,
}

/// Output from the doc_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocListOutput {
    pub documents: Vec<DocListItem>,
}

/// Implementation of the doc_save tool.
pub async fn save_impl(store: &dyn DocumentStore, params: DocSaveParams) -> Result<CallToolResult, McpError> {
    registry::add_or_update(store, params.id, &params.url).await?;
    json_result(&RegistryChangeOutput {
        id: params.id,
        changed: true,
        message: format!("Document #{} URL saved.", params.id),
    })
}

/// Implementation of the doc_delete tool.
pub async fn delete_impl(store: &dyn DocumentStore, params: DocDeleteParams) -> Result<CallToolResult, McpError> {
    let removed = registry::remove(store, params.id).await?;
    let message = if removed {
        format!("Document #{} URL and content deleted.", params.id)
    } else {
        format!("No document registered as #{}.", params.id)
    };
    json_result(&RegistryChangeOutput { id: params.id, changed: removed, message })
}

/// Implementation of the doc_list tool.
pub async fn list_impl(store: &dyn DocumentStore) -> Result<CallToolResult, McpError> {
    let documents = registry::list_all(store)
        .await?
        .into_iter()
        .map(|(id, url)| DocListItem { id, url })
        .collect();
    json_result(&DocListOutput { documents })
}

pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) fn result_text(result: &CallToolResult) -> String {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmirror_core::CacheDb;

    const URL: &str = "https://docs.google.com/document/d/abc/export?format=html";

    #[tokio::test]
    async fn test_save_then_list() {
        let db = CacheDb::open_in_memory().await.unwrap();
        save_impl(&db, DocSaveParams { id: 5, url: URL.into() }).await.unwrap();

        let result = list_impl(&db).await.unwrap();
        let output: DocListOutput = serde_json::from_str(&result_text(&result)).unwrap();
        assert_eq!(output.documents.len(), 1);
        assert_eq!(output.documents[0].id, 5);
        assert_eq!(output.documents[0].url, URL);
    }

    #[tokio::test]
    async fn test_save_rejects_zero_id() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = save_impl(&db, DocSaveParams { id: 0, url: URL.into() }).await;
        assert_eq!(result.unwrap_err().code.0, -32602);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = CacheDb::open_in_memory().await.unwrap();
        save_impl(&db, DocSaveParams { id: 5, url: URL.into() }).await.unwrap();

        let result = delete_impl(&db, DocDeleteParams { id: 5 }).await.unwrap();
        let output: RegistryChangeOutput = serde_json::from_str(&result_text(&result)).unwrap();
        assert!(output.changed);

        let result = delete_impl(&db, DocDeleteParams { id: 5 }).await.unwrap();
        let output: RegistryChangeOutput = serde_json::from_str(&result_text(&result)).unwrap();
        assert!(!output.changed);

        let result = list_impl(&db).await.unwrap();
        let output: DocListOutput = serde_json::from_str(&result_text(&result)).unwrap();
        assert!(output.documents.is_empty());
    }
}
