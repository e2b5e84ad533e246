//! Formatting helpers shared across MCP handlers and resources.

use crate::resume::{LatestRole, Section, Snippet};
use rmcp::model::ResourceContents;
use serde::Serialize;
use serde_json::{Map, Value, json};

pub(crate) const APPLICATION_JSON: &str = "application/json";
pub(crate) const TEXT_MARKDOWN: &str = "text/markdown";

/// Build the health payload summarizing index state.
pub(crate) fn health_payload(chunks: usize, embeddings_enabled: bool) -> String {
    let payload = json!({
        "ok": true,
        "name": "cv-mcp",
        "index": {
            "chunks": chunks,
            "ranking": if embeddings_enabled { "embedding" } else { "keyword" },
        },
    });

    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
}

/// Sections resource body.
pub(crate) fn sections_payload(sections: &[Section]) -> String {
    serialize_json(&json!({ "sections": sections }), "resume://sections")
}

/// Serialize a value to JSON, falling back to compact formatting on error.
pub(crate) fn serialize_json<T: Serialize>(value: &T, context_uri: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(uri = context_uri, %error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

/// Build JSON resource contents for MCP resource responses.
pub(crate) fn json_resource_contents(uri: &str, text: String) -> ResourceContents {
    text_resource_contents(uri, APPLICATION_JSON, text)
}

/// Build markdown resource contents for MCP resource responses.
pub(crate) fn markdown_resource_contents(uri: &str, text: String) -> ResourceContents {
    text_resource_contents(uri, TEXT_MARKDOWN, text)
}

fn text_resource_contents(uri: &str, mime_type: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(mime_type.into()),
        text,
        meta: None,
    }
}

/// Assemble the structured `search_resume` response with a prompt-ready context string.
pub(crate) fn build_search_response(k: usize, snippets: Vec<Snippet>) -> Value {
    let context: Vec<String> = snippets
        .iter()
        .filter(|snippet| snippet.score > 0.0)
        .map(|snippet| snippet.text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    let mut payload = Map::new();
    payload.insert("k".into(), Value::from(k as u64));
    payload.insert("results".into(), json!(snippets));
    if !context.is_empty() {
        payload.insert("context".into(), Value::String(context.join("\n\n")));
    }
    Value::Object(payload)
}

/// Structured `latest_role` response; a miss reports `null` for both fields.
pub(crate) fn latest_role_payload(role: Option<LatestRole>) -> Value {
    match role {
        Some(LatestRole { sentence, evidence }) => json!({
            "answer": sentence,
            "evidence": evidence,
        }),
        None => json!({ "answer": null, "evidence": null }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::RoleEvidence;

    #[test]
    fn health_payload_is_valid_json() {
        let body = health_payload(4, false);
        let value: Value = serde_json::from_str(&body).expect("health payload must be valid JSON");
        assert_eq!(value["index"]["chunks"], 4);
        assert_eq!(value["index"]["ranking"], "keyword");
    }

    #[test]
    fn search_context_skips_zero_scores() {
        let payload = build_search_response(
            2,
            vec![
                Snippet {
                    text: "Skills\nRust ".into(),
                    score: 0.5,
                },
                Snippet {
                    text: "Education\nMIT".into(),
                    score: 0.0,
                },
            ],
        );
        assert_eq!(payload["k"], 2);
        assert_eq!(payload["results"].as_array().map(Vec::len), Some(2));
        assert_eq!(payload["context"], "Skills\nRust");
    }

    #[test]
    fn search_without_matches_has_no_context() {
        let payload = build_search_response(5, Vec::new());
        assert!(payload.get("context").is_none());
    }

    #[test]
    fn latest_role_payload_handles_both_outcomes() {
        let hit = latest_role_payload(Some(LatestRole {
            sentence: "Your latest job title is A at B (2020 - Present).".into(),
            evidence: RoleEvidence {
                title: "A".into(),
                company: "B".into(),
                dates: "2020 - Present".into(),
                idx: 3,
            },
        }));
        assert_eq!(hit["evidence"]["idx"], 3);

        let miss = latest_role_payload(None);
        assert!(miss["answer"].is_null());
        assert!(miss["evidence"].is_null());
    }
}
