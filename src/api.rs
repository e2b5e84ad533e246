//! HTTP surface for CV MCP.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /health` – Liveness plus the number of indexed chunks and the embedding mode.
//! - `POST /ask` – Return the top five résumé snippets for `{ "question": ... }`.
//! - `POST /answer` – Answer latest-role questions directly; otherwise return snippets with a
//!   `null` answer.
//! - `GET /metrics` – Observe query counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! The HTTP surface shares the same résumé service with the MCP server, so answers are
//! identical across interfaces.

use crate::metrics::MetricsSnapshot;
use crate::resume::{Answer, IndexError, ResumeApi, Snippet};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the HTTP router exposing the question-answering surface.
///
/// `web_origin` is the only browser origin allowed by CORS; an unparsable origin disables
/// cross-origin access entirely.
pub fn create_router<S>(service: Arc<S>, web_origin: &str) -> Router
where
    S: ResumeApi + 'static,
{
    let cors = match HeaderValue::from_str(web_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]),
        Err(_) => {
            tracing::warn!(web_origin, "Ignoring invalid WEB_ORIGIN");
            CorsLayer::new()
        }
    };

    Router::new()
        .route("/health", get(health::<S>))
        .route("/ask", post(ask::<S>))
        .route("/answer", post(answer::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Request body shared by `POST /ask` and `POST /answer`.
#[derive(Deserialize)]
struct QuestionRequest {
    /// Natural-language question about the résumé.
    #[serde(default)]
    question: String,
}

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    name: &'static str,
    chunks: usize,
    embeddings: &'static str,
}

/// Response body for `POST /ask`.
#[derive(Serialize)]
struct AskResponse {
    snippets: Vec<Snippet>,
}

async fn health<S>(State(service): State<Arc<S>>) -> Json<HealthResponse>
where
    S: ResumeApi,
{
    Json(HealthResponse {
        ok: true,
        name: "cv-mcp",
        chunks: service.chunk_count(),
        embeddings: if service.embeddings_enabled() {
            "enabled"
        } else {
            "disabled"
        },
    })
}

/// Rank résumé chunks for the supplied question.
async fn ask<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<AskResponse>, AppError>
where
    S: ResumeApi,
{
    let question = require_question(request)?;
    let snippets = service.search(&question, None).await?;
    tracing::info!(hits = snippets.len(), "Ask request completed");
    Ok(Json(AskResponse { snippets }))
}

/// Answer directly when the heuristic applies, otherwise fall back to snippets.
///
/// An empty question is not rejected here; it simply ranks every chunk at zero. A missing or
/// unreadable body counts as an empty question.
async fn answer<S>(
    State(service): State<Arc<S>>,
    request: Option<Json<QuestionRequest>>,
) -> Result<Json<Answer>, AppError>
where
    S: ResumeApi,
{
    let question = request
        .map(|Json(request)| request.question)
        .unwrap_or_default();
    let answer = service.answer(&question).await?;
    tracing::info!(
        synthesized = matches!(answer, Answer::Synthesized { .. }),
        "Answer request completed"
    );
    Ok(Json(answer))
}

async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: ResumeApi,
{
    Json(service.metrics_snapshot())
}

fn require_question(request: QuestionRequest) -> Result<String, AppError> {
    if request.question.is_empty() {
        return Err(AppError::BadRequest("question required"));
    }
    Ok(request.question)
}

/// Description of an HTTP command for discovery.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Liveness check with indexed chunk count and embedding mode.",
                request_example: None,
            },
            CommandDescriptor {
                name: "ask",
                method: "POST",
                path: "/ask",
                description: "Return the top five résumé snippets for a question. Response returns { \"snippets\": [{ \"text\", \"score\" }] }.",
                request_example: Some(json!({ "question": "Which databases have you used?" })),
            },
            CommandDescriptor {
                name: "answer",
                method: "POST",
                path: "/answer",
                description: "Answer latest-role questions directly with evidence; other questions return { \"answer\": null, \"snippets\": [...] }.",
                request_example: Some(json!({ "question": "What is my latest job title?" })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return query counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    BadRequest(&'static str),
    Index(IndexError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Self::Index(error) => {
                tracing::error!(%error, "Query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": error.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

impl From<IndexError> for AppError {
    fn from(inner: IndexError) -> Self {
        Self::Index(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{create_router, get_commands};
    use crate::embedding::EmbeddingClientError;
    use crate::metrics::MetricsSnapshot;
    use crate::resume::{Answer, IndexError, ResumeApi, RoleEvidence, Snippet};
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const ORIGIN: &str = "http://localhost:3000";

    #[tokio::test]
    async fn commands_catalog_exposes_answer_endpoint() {
        let response = get_commands().await;
        let commands = response.0.commands;
        let answer = commands
            .iter()
            .find(|cmd| cmd.name == "answer")
            .expect("answer command present");

        assert_eq!(answer.method, "POST");
        assert_eq!(answer.path, "/answer");
        assert!(commands.len() >= 3);
    }

    #[tokio::test]
    async fn ask_route_returns_snippets() {
        let service = Arc::new(StubResumeService::default());
        let app = create_router(service.clone(), ORIGIN);

        let response = app
            .oneshot(json_request("/ask", json!({ "question": "rust?" })))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["snippets"][0]["text"], "Skills\nRust");
        assert_eq!(body["snippets"][0]["score"], 0.5);
        assert_eq!(service.recorded_questions().await, vec!["rust?".to_string()]);
    }

    #[tokio::test]
    async fn ask_route_requires_question() {
        let service = Arc::new(StubResumeService::default());
        let app = create_router(service.clone(), ORIGIN);

        let response = app
            .oneshot(json_request("/ask", json!({})))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["error"], "question required");
        assert!(service.recorded_questions().await.is_empty());
    }

    #[tokio::test]
    async fn answer_route_serializes_evidence() {
        let app = create_router(Arc::new(StubResumeService::default()), ORIGIN);

        let response = app
            .oneshot(json_request(
                "/answer",
                json!({ "question": "latest role" }),
            ))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(
            body["answer"],
            "Your latest job title is Staff Engineer at Acme Corp (Jun 2021 - Present)."
        );
        assert_eq!(body["evidence"]["company"], "Acme Corp");
        assert_eq!(body["evidence"]["idx"], 1);
    }

    #[tokio::test]
    async fn answer_route_without_body_ranks_snippets() {
        let service = Arc::new(StubResumeService::default());
        let app = create_router(service.clone(), ORIGIN);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/answer")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert!(body["answer"].is_null());
        assert_eq!(body["snippets"][0]["text"], "Skills\nRust");
        assert_eq!(service.recorded_questions().await, vec![String::new()]);
    }

    #[tokio::test]
    async fn provider_failure_maps_to_server_error() {
        let service = Arc::new(StubResumeService {
            fail: true,
            ..StubResumeService::default()
        });
        let app = create_router(service, ORIGIN);

        let response = app
            .oneshot(json_request("/answer", json!({ "question": "skills" })))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert!(body["error"].as_str().expect("message").contains("boom"));
    }

    #[tokio::test]
    async fn health_reports_chunks() {
        let app = create_router(Arc::new(StubResumeService::default()), ORIGIN);
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        let body = read_json(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["chunks"], 3);
        assert_eq!(body["embeddings"], "disabled");
    }

    fn json_request(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request")
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json body")
    }

    #[derive(Default)]
    struct StubResumeService {
        questions: Mutex<Vec<String>>,
        fail: bool,
    }

    impl StubResumeService {
        async fn recorded_questions(&self) -> Vec<String> {
            self.questions.lock().await.clone()
        }
    }

    #[async_trait]
    impl ResumeApi for StubResumeService {
        async fn search(
            &self,
            question: &str,
            _k: Option<usize>,
        ) -> Result<Vec<Snippet>, IndexError> {
            if self.fail {
                return Err(IndexError::Embedding(
                    EmbeddingClientError::GenerationFailed("boom".into()),
                ));
            }
            self.questions.lock().await.push(question.to_string());
            Ok(vec![Snippet {
                text: "Skills\nRust".into(),
                score: 0.5,
            }])
        }

        async fn answer(&self, question: &str) -> Result<Answer, IndexError> {
            if question.contains("latest") {
                return Ok(Answer::Synthesized {
                    answer: "Your latest job title is Staff Engineer at Acme Corp (Jun 2021 - Present)."
                        .into(),
                    evidence: RoleEvidence {
                        title: "Staff Engineer".into(),
                        company: "Acme Corp".into(),
                        dates: "Jun 2021 - Present".into(),
                        idx: 1,
                    },
                });
            }
            let snippets = self.search(question, None).await?;
            Ok(Answer::Snippets {
                answer: None,
                snippets,
            })
        }

        fn chunk_count(&self) -> usize {
            3
        }

        fn embeddings_enabled(&self) -> bool {
            false
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot::default()
        }
    }
}
