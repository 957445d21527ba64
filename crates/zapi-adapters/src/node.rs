//! The Z-API node: operation table exposed through the [`Adapter`] trait.
//!
//! Each row of the operation table becomes one [`ToolDefinition`] whose
//! schema lists exactly the parameters active for that row.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::client::{Dispatch, ZapiClient};
use crate::credentials::Credentials;
use crate::error::{Result, ZapiError};
use crate::operations::{self, FieldKind, OperationSpec, OPERATIONS, Resource};
use crate::params::StaticParameters;
use crate::router;
use crate::traits::{Adapter, AuthRequirement, HealthStatus, ToolDefinition};

/// Z-API gateway adapter.
pub struct ZapiAdapter {
    id: String,
    connected: bool,
    dispatcher: Arc<dyn Dispatch>,
}

impl ZapiAdapter {
    /// Create an adapter backed by an HTTP client.
    pub fn new(id: impl Into<String>, client: ZapiClient) -> Self {
        Self::with_dispatcher(id, Arc::new(client))
    }

    /// Create an adapter backed by any dispatcher.
    pub fn with_dispatcher(id: impl Into<String>, dispatcher: Arc<dyn Dispatch>) -> Self {
        Self {
            id: id.into(),
            connected: false,
            dispatcher,
        }
    }

    /// Definitions for the operations of a single resource.
    pub fn tools_for(resource: Resource) -> Vec<ToolDefinition> {
        operations::for_resource(resource).map(tool_definition).collect()
    }
}

/// Tool name of an operation, e.g. `zapi_message_send_text`.
pub fn tool_name(op: &OperationSpec) -> String {
    format!("zapi_{}_{}", op.resource, snake_case(op.operation))
}

/// Find the operation a tool name refers to.
pub fn operation_for_tool(name: &str) -> Option<&'static OperationSpec> {
    OPERATIONS.iter().find(|op| tool_name(op) == name)
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Build the declarative definition of one operation.
pub fn tool_definition(op: &OperationSpec) -> ToolDefinition {
    let mut properties = Map::new();
    let mut required: Vec<&str> = Vec::new();

    for field in op.fields {
        if properties.contains_key(field.param) {
            continue;
        }
        let mut schema = match field.kind {
            FieldKind::Json => json!({ "type": ["string", "array", "object"] }),
            FieldKind::PhoneList | FieldKind::List => json!({ "type": ["string", "array"] }),
            FieldKind::Choice(options) => json!({ "type": "string", "enum": options }),
            FieldKind::Text | FieldKind::Phone => json!({ "type": "string" }),
        };
        schema["description"] = json!(operations::describe_param(field.param));
        if let Some(default) = field.default.filter(|d| !d.is_empty()) {
            schema["default"] = json!(default);
        }
        properties.insert(field.param.to_string(), schema);
        if field.required {
            required.push(field.param);
        }
    }

    ToolDefinition {
        name: tool_name(op),
        description: format!("{} ({} {})", op.description, op.method, op.path),
        parameters: json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    }
}

// ---------------------------------------------------------------------------
// Adapter trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl Adapter for ZapiAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    async fn connect(&mut self) -> Result<()> {
        self.dispatcher.send(&Credentials::test_request()).await?;
        info!(id = %self.id, "Z-API adapter connected");
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        info!(id = %self.id, "Z-API adapter disconnected");
        self.connected = false;
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus> {
        if !self.connected {
            return Ok(HealthStatus::Unhealthy);
        }
        match self.dispatcher.send(&Credentials::test_request()).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => {
                warn!(id = %self.id, error = %e, "Z-API connectivity test failed");
                Ok(HealthStatus::Degraded)
            }
        }
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        OPERATIONS.iter().map(tool_definition).collect()
    }

    async fn execute_tool(&self, name: &str, params: Value) -> Result<Value> {
        let op = operation_for_tool(name).ok_or_else(|| ZapiError::ToolNotFound {
            adapter_id: self.id.clone(),
            tool_name: name.to_string(),
        })?;

        if !self.connected {
            return Err(ZapiError::NotConnected {
                adapter_id: self.id.clone(),
            });
        }

        let params = StaticParameters::from_value(params);
        router::execute_item(self.dispatcher.as_ref(), op, &params, 0).await
    }

    fn required_auth(&self) -> Option<AuthRequirement> {
        Some(Credentials::requirement())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::request::ZapiRequest;

    /// Records every request and answers with a canned value.
    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<ZapiRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl Dispatch for Recorder {
        async fn send(&self, request: &ZapiRequest) -> Result<Value> {
            self.sent.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(ZapiError::RemoteApi {
                    status: 401,
                    message: "unauthorized".into(),
                });
            }
            Ok(json!({ "ok": true }))
        }
    }

    fn adapter(fail: bool) -> (ZapiAdapter, Arc<Recorder>) {
        let recorder = Arc::new(Recorder {
            fail,
            ..Recorder::default()
        });
        (ZapiAdapter::with_dispatcher("zapi", recorder.clone()), recorder)
    }

    #[test]
    fn snake_case_converts_camel_case() {
        assert_eq!(snake_case("sendText"), "send_text");
        assert_eq!(snake_case("getQrCode"), "get_qr_code");
        assert_eq!(snake_case("list"), "list");
    }

    #[test]
    fn one_tool_per_operation_with_unique_names() {
        let (adapter, _) = adapter(false);
        let tools = adapter.tools();
        assert_eq!(tools.len(), OPERATIONS.len());
        let mut names: Vec<_> = tools.iter().map(|t| t.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), OPERATIONS.len());
    }

    #[test]
    fn tool_names_resolve_back_to_operations() {
        for op in OPERATIONS {
            assert_eq!(operation_for_tool(&tool_name(op)), Some(op));
        }
        assert!(operation_for_tool("zapi_message_send_fax").is_none());
    }

    #[test]
    fn send_text_schema_lists_only_active_fields() {
        let op = operations::lookup(Resource::Message, "sendText").unwrap();
        let def = tool_definition(op);
        assert_eq!(def.name, "zapi_message_send_text");
        let props = def.parameters["properties"].as_object().unwrap();
        assert_eq!(props.len(), 2);
        assert!(props.contains_key("phone"));
        assert!(props.contains_key("message"));
        assert_eq!(def.parameters["required"], json!(["phone", "message"]));
    }

    #[test]
    fn send_link_schema_lists_link_url_once() {
        let op = operations::lookup(Resource::Message, "sendLink").unwrap();
        let def = tool_definition(op);
        assert_eq!(def.parameters["required"], json!(["phone", "linkUrl"]));
    }

    #[test]
    fn choice_fields_expose_enum_and_default() {
        let op = operations::lookup(Resource::Event, "respondEvent").unwrap();
        let def = tool_definition(op);
        let response = &def.parameters["properties"]["eventResponse"];
        assert_eq!(response["enum"], json!(["going", "not_going", "maybe"]));
        assert_eq!(response["default"], json!("going"));
    }

    #[test]
    fn tools_for_filters_by_resource() {
        let tools = ZapiAdapter::tools_for(Resource::Instance);
        assert_eq!(tools.len(), 5);
        assert!(tools.iter().all(|t| t.name.starts_with("zapi_instance_")));
    }

    #[test]
    fn required_auth_lists_credential_fields() {
        let (adapter, _) = adapter(false);
        let auth = adapter.required_auth().unwrap();
        assert_eq!(auth.provider, "z-api");
        assert_eq!(auth.scopes.len(), 3);
    }

    #[tokio::test]
    async fn connect_runs_connectivity_test() {
        let (mut adapter, recorder) = adapter(false);
        assert_eq!(adapter.health_check().await.unwrap(), HealthStatus::Unhealthy);
        adapter.connect().await.unwrap();
        assert_eq!(recorder.sent.lock().unwrap()[0].path, "/status");
        assert_eq!(adapter.health_check().await.unwrap(), HealthStatus::Healthy);
        adapter.disconnect().await.unwrap();
        assert_eq!(adapter.health_check().await.unwrap(), HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn connect_fails_on_rejected_credentials() {
        let (mut adapter, _) = adapter(true);
        let err = adapter.connect().await.unwrap_err();
        assert_eq!(err.to_string(), "Z-API error: unauthorized");
        assert_eq!(adapter.health_check().await.unwrap(), HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn execute_tool_requires_connection() {
        let (adapter, _) = adapter(false);
        let err = adapter
            .execute_tool("zapi_instance_get_status", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ZapiError::NotConnected { .. }));
    }

    #[tokio::test]
    async fn execute_tool_rejects_unknown_tool() {
        let (mut adapter, _) = adapter(false);
        adapter.connect().await.unwrap();
        let err = adapter.execute_tool("nonexistent", json!({})).await.unwrap_err();
        assert!(err.to_string().contains("tool not found"));
    }

    #[tokio::test]
    async fn execute_tool_routes_one_request() {
        let (mut adapter, recorder) = adapter(false);
        adapter.connect().await.unwrap();
        let out = adapter
            .execute_tool(
                "zapi_message_send_text",
                json!({ "phone": "+55 (11) 99999-9999", "message": "hi" }),
            )
            .await
            .unwrap();
        assert_eq!(out, json!({ "ok": true }));

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].path, "/send-text");
        assert_eq!(sent[1].body["phone"], json!("5511999999999"));
    }
}
