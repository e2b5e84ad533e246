use std::sync::Arc;

use cvmcp::{embedding::Embedder, mcp::CvMcpServer, resume::ResumeService};
use rmcp::{
    handler::client::ClientHandler,
    model::{
        self, CallToolRequestParam, ClientInfo, PaginatedRequestParam, ReadResourceRequestParam,
        ResourceContents,
    },
    service::{RoleClient, RoleServer, RunningService, Service, serve_directly},
    transport::async_rw::AsyncRwTransport,
};
use serde_json::json;
use tokio::io::split;

const RESUME: &str = "Jane Doe\n\
Staff engineer focused on distributed systems\n\
Experience\n\
Jun 2021 - Present\n\
Staff Engineer\n\
Acme Corp\n\
2017 - 2021\n\
Backend Engineer\n\
Globex\n\
Skills\n\
Rust, Go, Kubernetes\n\
Education\n\
BSc Computer Science, MIT\n";

#[derive(Clone, Default)]
struct DummyClientHandler;

impl ClientHandler for DummyClientHandler {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

struct TestHarness {
    service: RunningService<RoleClient, DummyClientHandler>,
    server: RunningService<RoleServer, CvMcpServer>,
}

impl TestHarness {
    async fn new() -> Self {
        let resume = ResumeService::from_text(RESUME, Embedder::Disabled)
            .await
            .expect("resume service");
        let server = CvMcpServer::new(Arc::new(resume));

        let (client_stream, server_stream) = tokio::io::duplex(16 * 1024);
        let (client_read, client_write) = split(client_stream);
        let (server_read, server_write) = split(server_stream);

        let client_transport = AsyncRwTransport::new_client(client_read, client_write);
        let server_transport = AsyncRwTransport::new_server(server_read, server_write);

        let server_info = server.get_info();
        let client_handler = DummyClientHandler;
        let client_info = ClientHandler::get_info(&client_handler);

        let server =
            serve_directly::<RoleServer, _, _, _, _>(server, server_transport, Some(client_info));
        let service = serve_directly::<RoleClient, _, _, _, _>(
            client_handler,
            client_transport,
            Some(server_info),
        );

        Self { service, server }
    }

    async fn shutdown(self) {
        let Self { service, server } = self;
        let _ = service.cancel().await;
        let _ = server.cancel().await;
    }
}

fn arguments(value: serde_json::Value) -> Option<model::JsonObject> {
    value.as_object().cloned()
}

#[tokio::test]
async fn initialize_and_list_tools() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let info = service
        .peer_info()
        .expect("server info should be initialized");
    assert_eq!(info.server_info.name, "cv-mcp");
    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.resources.is_some());

    let tools_result = service
        .list_tools(Some(PaginatedRequestParam { cursor: None }))
        .await
        .expect("list_tools");
    let names: Vec<_> = tools_result
        .tools
        .iter()
        .map(|tool| tool.name.as_ref())
        .collect();

    assert!(names.contains(&"search_resume"));
    assert!(names.contains(&"latest_role"));
    assert!(names.contains(&"metrics"));

    let resources = service
        .list_resources(Some(PaginatedRequestParam { cursor: None }))
        .await
        .expect("list_resources");
    let uris: Vec<_> = resources
        .resources
        .iter()
        .map(|resource| resource.uri.as_str())
        .collect();
    assert_eq!(uris, vec!["resume://me", "resume://sections", "mcp://health"]);

    harness.shutdown().await;
}

#[tokio::test]
async fn search_resume_ranks_matching_section_first() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let response = service
        .call_tool(CallToolRequestParam {
            name: "search_resume".into(),
            arguments: arguments(json!({ "question": "Any Kubernetes skills?", "k": 2 })),
        })
        .await
        .expect("search tool call");

    assert_eq!(response.is_error, Some(false));
    let payload = response.structured_content.expect("structured payload");
    assert_eq!(payload["k"], 2);
    let results = payload["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    assert!(results[0]["text"].as_str().unwrap_or_default().starts_with("## Resume"));
    assert_eq!(results[1]["text"], "Skills\nRust, Go, Kubernetes");
    assert!(payload["context"].as_str().is_some());

    let metrics = service
        .call_tool(CallToolRequestParam {
            name: "metrics".into(),
            arguments: arguments(json!({})),
        })
        .await
        .expect("metrics tool call");
    let metrics = metrics.structured_content.expect("metrics payload");
    assert_eq!(metrics["searches"], 1);

    harness.shutdown().await;
}

#[tokio::test]
async fn latest_role_reports_evidence() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let response = service
        .call_tool(CallToolRequestParam {
            name: "latest_role".into(),
            arguments: arguments(json!({})),
        })
        .await
        .expect("latest_role tool call");

    let payload = response.structured_content.expect("structured payload");
    assert_eq!(
        payload["answer"],
        "Your latest job title is Staff Engineer at Acme Corp (Jun 2021 - Present)."
    );
    assert_eq!(payload["evidence"]["company"], "Acme Corp");
    assert_eq!(payload["evidence"]["idx"], 3);

    harness.shutdown().await;
}

#[tokio::test]
async fn empty_question_returns_invalid_params() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let err = service
        .call_tool(CallToolRequestParam {
            name: "search_resume".into(),
            arguments: arguments(json!({ "question": "   " })),
        })
        .await
        .expect_err("search should fail");

    match err {
        rmcp::service::ServiceError::McpError(data) => {
            assert_eq!(data.code, model::ErrorCode::INVALID_PARAMS);
        }
        other => panic!("expected MCP error, got {other:?}"),
    }

    harness.shutdown().await;
}

#[tokio::test]
async fn reads_resume_markdown_resource() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let result = service
        .read_resource(ReadResourceRequestParam {
            uri: "resume://me".into(),
        })
        .await
        .expect("read resume resource");

    match &result.contents[0] {
        ResourceContents::TextResourceContents {
            mime_type, text, ..
        } => {
            assert_eq!(mime_type.as_deref(), Some("text/markdown"));
            assert!(text.starts_with("## Resume\n\n- Jane Doe"));
        }
        other => panic!("expected text contents, got {other:?}"),
    }

    let err = service
        .read_resource(ReadResourceRequestParam {
            uri: "resume://unknown".into(),
        })
        .await
        .expect_err("unknown resource should fail");
    assert!(matches!(err, rmcp::service::ServiceError::McpError(_)));

    harness.shutdown().await;
}
