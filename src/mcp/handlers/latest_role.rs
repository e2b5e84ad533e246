//! Handler for the `latest_role` tool.

use std::sync::Arc;

use crate::{mcp::format::latest_role_payload, resume::ResumeService};
use rmcp::{ErrorData as McpError, model::CallToolResult};

/// Handle the `latest_role` tool by running the positional heuristic over the résumé.
///
/// A miss is a normal outcome and is reported with `null` fields rather than an error.
pub(crate) async fn handle_latest_role(
    resume: &Arc<ResumeService>,
) -> Result<CallToolResult, McpError> {
    let role = resume.latest_role();
    Ok(CallToolResult::structured(latest_role_payload(role)))
}
