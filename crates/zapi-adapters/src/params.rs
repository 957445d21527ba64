//! Parameter retrieval.
//!
//! The router never talks to a host's parameter system directly.  It reads
//! through [`ParameterSource`], so a workflow host, the CLI and the tests
//! can each supply parameters their own way.

use serde_json::{Map, Value};

/// Read access to the parameters of one node invocation.
///
/// Parameters are resolved per input item: a host may evaluate an
/// expression differently for every item of a batch.
pub trait ParameterSource: Send + Sync {
    /// Return the raw value of `name` for item `item`, if set.
    fn get(&self, name: &str, item: usize) -> Option<Value>;

    /// Number of input items in the batch.
    fn item_count(&self) -> usize;

    /// Return the value of `name`, or `default` when it is not set.
    fn get_or(&self, name: &str, item: usize, default: Value) -> Value {
        self.get(name, item).unwrap_or(default)
    }

    /// Return `name` rendered as a string.
    ///
    /// Numbers and booleans are rendered with their JSON text; `null`,
    /// arrays and objects count as unset.
    fn string(&self, name: &str, item: usize) -> Option<String> {
        match self.get(name, item)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// In-memory parameters: a node-level map plus optional per-item overrides.
///
/// A key present in an item's override map wins over the node-level value
/// for that item only.  Without an item list the node values form one
/// item; an explicit empty list is a batch of zero items.
#[derive(Debug, Clone, Default)]
pub struct StaticParameters {
    node: Map<String, Value>,
    items: Option<Vec<Map<String, Value>>>,
}

impl StaticParameters {
    /// Create a single-item parameter set from node-level values.
    pub fn new(node: Map<String, Value>) -> Self {
        Self { node, items: None }
    }

    /// Create a batch: `items[i]` overrides the node-level values for item `i`.
    pub fn with_items(node: Map<String, Value>, items: Vec<Map<String, Value>>) -> Self {
        Self {
            node,
            items: Some(items),
        }
    }

    /// Build from a JSON object; anything else yields an empty set.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::new(map),
            _ => Self::default(),
        }
    }

    /// Set a node-level parameter.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.node.insert(name.into(), value.into());
        self
    }

    /// Append an input item with its overrides.
    pub fn push_item(mut self, overrides: Map<String, Value>) -> Self {
        self.items.get_or_insert_with(Vec::new).push(overrides);
        self
    }
}

impl ParameterSource for StaticParameters {
    fn get(&self, name: &str, item: usize) -> Option<Value> {
        self.items
            .as_ref()
            .and_then(|items| items.get(item))
            .and_then(|overrides| overrides.get(name))
            .or_else(|| self.node.get(name))
            .cloned()
    }

    fn item_count(&self) -> usize {
        self.items.as_ref().map_or(1, Vec::len)
    }
}
