//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    mcp::{
        format::{
            health_payload, json_resource_contents, markdown_resource_contents, sections_payload,
        },
        handlers::{
            latest_role::handle_latest_role, metrics::handle_metrics, search::handle_search,
        },
        registry, schemas,
    },
    resume::{ResumeApi, ResumeService},
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, ListResourcesResult, ListToolsResult,
        RawResource, ReadResourceRequestParam, ReadResourceResult, Resource, ServerCapabilities,
        ServerInfo, Tool, ToolAnnotations,
    },
};

const RESUME_URI: &str = "resume://me";
const SECTIONS_URI: &str = "resume://sections";
const HEALTH_URI: &str = "mcp://health";

/// MCP server implementation exposing résumé search and answers.
#[derive(Clone)]
pub struct CvMcpServer {
    resume: Arc<ResumeService>,
    registry: Arc<registry::Registry>,
}

impl CvMcpServer {
    /// Create a new MCP server over an already-indexed résumé.
    pub fn new(resume: Arc<ResumeService>) -> Self {
        let registry = registry::Registry::default()
            .with_resource(RESUME_URI, resource_resume)
            .with_resource(SECTIONS_URI, resource_sections)
            .with_resource(HEALTH_URI, resource_health)
            .with_tool("search_resume", tool_search)
            .with_tool("latest_role", tool_latest_role)
            .with_tool("metrics", tool_metrics);

        tracing::debug!(
            tools = ?registry.tool_names().collect::<Vec<_>>(),
            "Registered MCP tools"
        );

        Self {
            resume,
            registry: Arc::new(registry),
        }
    }

    fn describe_tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: Cow::Borrowed("search_resume"),
                title: Some("Search Résumé".to_string()),
                description: Some(Cow::Borrowed(
                    "Return top-K relevant snippets from the résumé for a question.",
                )),
                input_schema: Arc::new(schemas::search_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Search Résumé")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("latest_role"),
                title: Some("Latest Role".to_string()),
                description: Some(Cow::Borrowed(
                    "Report the most recent job title and company with the dates they were read from.",
                )),
                input_schema: Arc::new(schemas::empty_object_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Latest Role")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("metrics"),
                title: Some("Metrics Snapshot".to_string()),
                description: Some(Cow::Borrowed(
                    "Check how many searches and answers have been served.",
                )),
                input_schema: Arc::new(schemas::empty_object_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Metrics Snapshot")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
        ]
    }

    fn describe_resources(&self) -> Vec<Resource> {
        let mut resume = RawResource::new(RESUME_URI, "resume");
        resume.description = Some("Parsed résumé as markdown".into());
        resume.mime_type = Some(super::format::TEXT_MARKDOWN.into());

        let mut sections = RawResource::new(SECTIONS_URI, "sections");
        sections.description = Some("Résumé sections detected from headings".into());
        sections.mime_type = Some(super::format::APPLICATION_JSON.into());

        let mut health = RawResource::new(HEALTH_URI, "health");
        health.description = Some("Indexed chunk count and active ranking mode".into());
        health.mime_type = Some(super::format::APPLICATION_JSON.into());

        vec![
            resume.no_annotation(),
            sections.no_annotation(),
            health.no_annotation(),
        ]
    }
}

fn resource_resume(
    server: &CvMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let markdown = server.resume.markdown().to_string();
    Box::pin(async move {
        Ok(ReadResourceResult {
            contents: vec![markdown_resource_contents(RESUME_URI, markdown)],
        })
    })
}

fn resource_sections(
    server: &CvMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let body = sections_payload(server.resume.sections());
    Box::pin(async move {
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(SECTIONS_URI, body)],
        })
    })
}

fn resource_health(
    server: &CvMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let body = health_payload(
        server.resume.chunk_count(),
        server.resume.embeddings_enabled(),
    );
    Box::pin(async move {
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(HEALTH_URI, body)],
        })
    })
}

fn tool_search(server: &CvMcpServer, request: CallToolRequestParam) -> registry::ToolFuture {
    let resume = server.resume.clone();
    Box::pin(async move { handle_search(&resume, request.arguments).await })
}

fn tool_latest_role(server: &CvMcpServer, _request: CallToolRequestParam) -> registry::ToolFuture {
    let resume = server.resume.clone();
    Box::pin(async move { handle_latest_role(&resume).await })
}

fn tool_metrics(server: &CvMcpServer, _request: CallToolRequestParam) -> registry::ToolFuture {
    let resume = server.resume.clone();
    Box::pin(async move { handle_metrics(&resume).await })
}

impl ServerHandler for CvMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "cv-mcp".to_string();
        implementation.title = Some("CV MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: implementation,
            instructions: Some(
                "Use this server to answer questions about one résumé. Read resume://me for the full text, call search_resume for relevant snippets, and latest_role for the current position.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources = self.describe_resources();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    #[allow(clippy::manual_async_fn)]
    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.resource(request.uri.as_str()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown resource URI: {}", request.uri),
                None,
            ))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.tool(request.name.as_ref()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ))
        }
    }
}
