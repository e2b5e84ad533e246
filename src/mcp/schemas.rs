//! JSON schema builders for MCP tools.

use crate::resume::DEFAULT_TOP_K;
use serde_json::{Map, Value};

/// Build the schema describing the `search_resume` tool input.
pub(crate) fn search_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "question".into(),
        string_schema("Natural-language question about the résumé"),
    );

    let mut k_schema = Map::new();
    k_schema.insert("type".into(), Value::String("integer".into()));
    k_schema.insert(
        "description".into(),
        Value::String("Maximum number of snippets to return".into()),
    );
    k_schema.insert("minimum".into(), Value::Number(1.into()));
    k_schema.insert("default".into(), Value::Number(DEFAULT_TOP_K.into()));
    properties.insert("k".into(), Value::Object(k_schema));

    finalize_object_schema(properties, &["question"])
}

/// Build an empty object schema for tools that take no parameters.
pub(crate) fn empty_object_schema() -> Map<String, Value> {
    finalize_object_schema(Map::new(), &[])
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|&key| Value::String(key.into()))
                    .collect(),
            ),
        );
    }
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}
