//! Handler for the metrics tool.

use std::sync::Arc;

use crate::resume::{ResumeApi, ResumeService};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde_json::json;

/// Handle the `metrics` tool, returning the current query counters.
pub(crate) async fn handle_metrics(
    resume: &Arc<ResumeService>,
) -> Result<CallToolResult, McpError> {
    let snapshot = resume.metrics_snapshot();
    Ok(CallToolResult::structured(json!({
        "searches": snapshot.searches,
        "synthesizedAnswers": snapshot.synthesized_answers,
        "snippetAnswers": snapshot.snippet_answers,
    })))
}
