//! Outbound request descriptors.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::operations::HttpMethod;

/// One call against the gateway, built fresh per item.
///
/// An empty `body` or `query` is omitted from the wire request entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZapiRequest {
    pub method: HttpMethod,
    /// Path relative to the instance base URL, starting with `/`.
    pub path: String,
    pub body: Map<String, Value>,
    pub query: Map<String, Value>,
}

impl ZapiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Map::new(),
            query: Map::new(),
        }
    }

    /// Replace the body.
    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self
    }

    /// Add a query-string parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Query parameters as string pairs, rendering non-strings as JSON text.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .iter()
            .map(|(k, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect()
    }
}
