//! Handler and helpers for the `search_resume` tool.

use std::sync::Arc;

use crate::{
    mcp::{format::build_search_response, handlers::parse_arguments},
    resume::{DEFAULT_TOP_K, ResumeApi, ResumeService},
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

/// Raw search request payload accepted from MCP clients.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SearchToolRequest {
    /// Natural language question to rank chunks against.
    pub(crate) question: String,
    /// Optional snippet count override.
    #[serde(default)]
    pub(crate) k: Option<usize>,
}

/// Handle the `search_resume` tool by ranking résumé chunks for the question.
pub(crate) async fn handle_search(
    resume: &Arc<ResumeService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let SearchToolRequest { question, k } = parse_arguments(arguments)?;
    if question.trim().is_empty() {
        return Err(McpError::invalid_params("`question` must not be empty", None));
    }
    let k = k.unwrap_or(DEFAULT_TOP_K);
    if k == 0 {
        return Err(McpError::invalid_params("`k` must be at least 1", None));
    }

    let snippets = resume
        .search(&question, Some(k))
        .await
        .map_err(|err| McpError::internal_error(err.to_string(), None))?;
    tracing::debug!(k, hits = snippets.len(), "search_resume completed");

    Ok(CallToolResult::structured(build_search_response(k, snippets)))
}
