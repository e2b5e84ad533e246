//! MCP server entrypoint (stdio transport).
//!
//! Exposes the résumé resources and tools over stdio for editor and agent integrations. Logs go to
//! stderr and the log file because stdout carries the protocol.
use anyhow::{Context, Result};
use cvmcp::{
    config,
    logging::{self, ConsoleTarget},
    mcp::CvMcpServer,
    resume::ResumeService,
};
use rmcp::{service::ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::init_config(|_| {}).context("failed to load configuration")?;
    logging::init_tracing(ConsoleTarget::Stderr);

    let resume = ResumeService::from_config().await.with_context(|| {
        format!("failed to load résumé from {}", config.resume_path.display())
    })?;
    let server = CvMcpServer::new(Arc::new(resume));

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    service
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}
