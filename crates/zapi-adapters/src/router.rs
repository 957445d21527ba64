//! Operation routing and batch execution.
//!
//! Routing is a pure function of the operation table and the parameters of
//! one item: `(operation, item) -> ZapiRequest`.  [`execute_batch`] then
//! issues exactly one dispatcher call per input item, sequentially, in
//! input order.

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::client::Dispatch;
use crate::error::{Result, ZapiError};
use crate::operations::{self, FieldKind, FieldSpec, OperationSpec, Resource, Target};
use crate::params::ParameterSource;
use crate::phone;
use crate::request::ZapiRequest;

/// Parameter holding the selected resource.
pub const RESOURCE_PARAM: &str = "resource";
/// Parameter holding the selected operation.
pub const OPERATION_PARAM: &str = "operation";

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Resolve the (resource, operation) pair for a batch.
///
/// The selection is read once, from the first item.  A missing resource
/// means `message`; a missing operation means the resource's default.
pub fn select(params: &dyn ParameterSource) -> Result<&'static OperationSpec> {
    let resource = match params.string(RESOURCE_PARAM, 0) {
        Some(name) if !name.is_empty() => name.parse::<Resource>()?,
        _ => Resource::default(),
    };
    let operation = params
        .string(OPERATION_PARAM, 0)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| resource.default_operation().to_string());
    operations::lookup(resource, &operation)
}

// ---------------------------------------------------------------------------
// Request construction
// ---------------------------------------------------------------------------

/// Build the request for one item.
///
/// Only the fields active for `op` are read.
pub fn build_request(
    op: &OperationSpec,
    params: &dyn ParameterSource,
    item: usize,
) -> Result<ZapiRequest> {
    let mut path = op.path.to_string();
    let mut body = Map::new();

    for field in op.fields {
        let value = resolve_field(field, params, item)?;
        match field.target {
            Target::Body(key) => {
                body.insert(key.to_string(), value);
            }
            Target::Path => {
                let segment = match &value {
                    Value::String(s) => s.trim().to_string(),
                    other => other.to_string(),
                };
                path = path.replace(&format!("{{{}}}", field.param), &segment);
            }
        }
    }

    Ok(ZapiRequest::new(op.method, path).with_body(body))
}

/// Read one field, apply its default and normalize it.
fn resolve_field(field: &FieldSpec, params: &dyn ParameterSource, item: usize) -> Result<Value> {
    let raw = params.get(field.param, item).filter(|v| !is_blank(v));
    let raw = match (raw, field.default) {
        (Some(value), _) => value,
        (None, Some(default)) if !field.required => Value::String(default.to_string()),
        _ => return Err(ZapiError::validation(field.param, "is required")),
    };

    match field.kind {
        FieldKind::Text => Ok(Value::String(scalar(field, &raw)?)),
        FieldKind::Phone => Ok(Value::String(phone::normalize(&scalar(field, &raw)?))),
        FieldKind::PhoneList => {
            let phones = match &raw {
                Value::Array(items) => items
                    .iter()
                    .map(|v| scalar(field, v).map(|p| phone::normalize(p.trim())))
                    .collect::<Result<Vec<_>>>()?,
                other => phone::normalize_list(&scalar(field, other)?),
            };
            Ok(json!(phones))
        }
        FieldKind::List => {
            let entries = match &raw {
                Value::Array(items) => items
                    .iter()
                    .map(|v| scalar(field, v).map(|s| s.trim().to_string()))
                    .collect::<Result<Vec<_>>>()?,
                other => scalar(field, other)?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            };
            Ok(json!(entries))
        }
        FieldKind::Json => match raw {
            Value::String(text) => serde_json::from_str(&text)
                .map_err(|e| ZapiError::validation(field.param, format!("invalid JSON: {e}"))),
            structured => Ok(structured),
        },
        FieldKind::Choice(options) => {
            let value = scalar(field, &raw)?;
            if options.contains(&value.as_str()) {
                Ok(Value::String(value))
            } else {
                Err(ZapiError::validation(
                    field.param,
                    format!("`{value}` is not one of {}", options.join(", ")),
                ))
            }
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Render a scalar parameter as a string.
fn scalar(field: &FieldSpec, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ZapiError::validation(field.param, "expected a string")),
    }
}

// ---------------------------------------------------------------------------
// Batch execution
// ---------------------------------------------------------------------------

/// How a batch reacts to a failed item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Record `{ "error": message }` for a failed item and keep going
    /// instead of aborting the batch.
    pub continue_on_fail: bool,
}

/// A batch aborted at `item`.
///
/// `completed` holds the results of the items that ran before the failure.
#[derive(Debug, thiserror::Error)]
#[error("item {item} failed: {error}")]
pub struct BatchError {
    pub item: usize,
    pub completed: Vec<Value>,
    #[source]
    pub error: ZapiError,
}

/// Run one operation over every input item.
///
/// Items are processed strictly one after another; output order matches
/// input order.  Without `continue_on_fail`, the first failure stops the
/// batch and later items never run.
pub async fn execute_batch(
    dispatcher: &dyn Dispatch,
    params: &dyn ParameterSource,
    options: BatchOptions,
) -> std::result::Result<Vec<Value>, BatchError> {
    let op = select(params).map_err(|error| BatchError {
        item: 0,
        completed: Vec::new(),
        error,
    })?;

    let count = params.item_count();
    info!(
        resource = %op.resource,
        operation = op.operation,
        items = count,
        "executing Z-API batch"
    );

    let mut results = Vec::with_capacity(count);
    for item in 0..count {
        match execute_item(dispatcher, op, params, item).await {
            Ok(response) => results.push(response),
            Err(error) if options.continue_on_fail => {
                warn!(item, error = %error, "item failed, continuing");
                results.push(json!({ "error": error.to_string() }));
            }
            Err(error) => {
                warn!(item, error = %error, "item failed, aborting batch");
                return Err(BatchError {
                    item,
                    completed: results,
                    error,
                });
            }
        }
    }

    Ok(results)
}

/// Build and dispatch the request for a single item.
pub async fn execute_item(
    dispatcher: &dyn Dispatch,
    op: &OperationSpec,
    params: &dyn ParameterSource,
    item: usize,
) -> Result<Value> {
    let request = build_request(op, params, item)?;
    debug!(item, method = %request.method, path = %request.path, "routed item");
    dispatcher.send(&request).await
}
