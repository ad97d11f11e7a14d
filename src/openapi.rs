//! OpenAPI 3.1 document generation.
//!
//! The document is derived from the same [`Operation`] table the router is
//! built from, so operation ids, paths and methods cannot drift apart.

use serde_json::{Map, Value, json};

use crate::method::Method;

/// Static description of one routed operation.
#[derive(Clone, Copy, Debug)]
pub struct Operation {
    /// Stable operation identifier; generated clients name methods after it.
    pub id: &'static str,
    pub method: Method,
    /// matchit route syntax, which coincides with OpenAPI path templating.
    pub path: &'static str,
    pub summary: &'static str,
    pub request: Option<&'static str>,
    pub response: Body,
    /// Whether the operation can answer `404` with a `Detail` body.
    pub not_found: bool,
    pub links: &'static [Link],
}

/// Shape of a `200` response body.
#[derive(Clone, Copy, Debug)]
pub enum Body {
    Empty,
    Schema(&'static str),
    ArrayOf(&'static str),
}

/// A follow-up operation reachable from a `200` response.
#[derive(Clone, Copy, Debug)]
pub struct Link {
    pub name: &'static str,
    pub operation_id: &'static str,
    pub parameter: &'static str,
    /// Runtime expression, e.g. `$response.body#/id`.
    pub expression: &'static str,
}

impl Operation {
    /// Names of the `{param}` segments in [`path`](Operation::path).
    pub fn path_params(&self) -> impl Iterator<Item = &'static str> {
        self.path
            .split('/')
            .filter_map(|seg| seg.strip_prefix('{')?.strip_suffix('}'))
    }
}

/// Builds the full document for `operations`.
pub fn document(title: &str, version: &str, operations: &[Operation]) -> Value {
    let mut paths = Map::new();
    for op in operations {
        let item = paths
            .entry(op.path)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(item) = item {
            item.insert(op.method.as_lower().to_owned(), operation(op));
        }
    }

    json!({
        "openapi": "3.1.0",
        "info": { "title": title, "version": version },
        "paths": paths,
        "components": { "schemas": schemas() },
    })
}

fn operation(op: &Operation) -> Value {
    let mut out = Map::new();
    out.insert("operationId".into(), json!(op.id));
    out.insert("summary".into(), json!(op.summary));

    let params: Vec<Value> = op.path_params()
        .map(|name| json!({
            "name": name,
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "minimum": 0 },
        }))
        .collect();
    let validated = !params.is_empty() || op.request.is_some();
    if !params.is_empty() {
        out.insert("parameters".into(), Value::Array(params));
    }

    if let Some(schema) = op.request {
        out.insert("requestBody".into(), json!({
            "required": true,
            "content": { "application/json": { "schema": schema_ref(schema) } },
        }));
    }

    let mut ok = Map::new();
    ok.insert("description".into(), json!("Successful Response"));
    match op.response {
        Body::Empty => {}
        Body::Schema(name) => {
            ok.insert("content".into(), json_content(schema_ref(name)));
        }
        Body::ArrayOf(name) => {
            ok.insert("content".into(), json_content(json!({ "type": "array", "items": schema_ref(name) })));
        }
    }
    if !op.links.is_empty() {
        let links: Map<String, Value> = op.links.iter()
            .map(|l| {
                let mut parameters = Map::new();
                parameters.insert(l.parameter.to_owned(), json!(l.expression));
                (l.name.to_owned(), json!({
                    "operationId": l.operation_id,
                    "parameters": parameters,
                }))
            })
            .collect();
        ok.insert("links".into(), Value::Object(links));
    }

    let mut responses = Map::new();
    responses.insert("200".into(), Value::Object(ok));
    if op.not_found {
        responses.insert("404".into(), error_response("Not Found"));
    }
    if validated {
        responses.insert("422".into(), error_response("Validation Error"));
    }
    out.insert("responses".into(), Value::Object(responses));

    Value::Object(out)
}

fn schemas() -> Value {
    json!({
        "User": {
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "email": { "type": "string" },
            },
            "required": ["name", "email"],
        },
        "Created": {
            "type": "object",
            "properties": { "id": { "type": "integer", "minimum": 0 } },
            "required": ["id"],
        },
        "Detail": {
            "type": "object",
            "properties": { "detail": { "type": "string" } },
            "required": ["detail"],
        },
    })
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn error_response(description: &str) -> Value {
    json!({ "description": description, "content": json_content(schema_ref("Detail")) })
}
