//! End-to-end tests for request dispatch and batch execution.
//!
//! A stub gateway runs on an OS-assigned port; the real [`ZapiClient`]
//! talks to it over HTTP so URLs, headers and bodies are checked on the
//! wire.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;

use zapi_adapters::{
    Adapter, BatchOptions, Credentials, HealthStatus, StaticParameters, ZapiAdapter, ZapiClient,
    ZapiError, execute_batch,
};

// ── stub gateway ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    client_token: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<Seen>>>);

impl Captured {
    fn all(&self) -> Vec<Seen> {
        self.0.lock().unwrap().clone()
    }
}

/// Phone the stub rejects with a 400.
const REJECTED_PHONE: &str = "999";

async fn record(
    State(captured): State<Captured>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let seen = Seen {
        method,
        path: uri.path().to_string(),
        client_token: headers
            .get("client-token")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    };
    let count = {
        let mut all = captured.0.lock().unwrap();
        all.push(seen);
        all.len()
    };

    if uri.path().ends_with("/status") {
        return axum::Json(json!({ "connected": true })).into_response();
    }

    let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    if parsed["phone"] == json!(REJECTED_PHONE) {
        return (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({ "message": "phone not registered" })),
        )
            .into_response();
    }

    axum::Json(json!({ "messageId": format!("M{count}") })).into_response()
}

/// Bind to 127.0.0.1:0 and serve the stub; return (base_url, captured).
async fn start_stub() -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .fallback(record)
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind to port 0");
    let addr: SocketAddr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    (format!("http://127.0.0.1:{}", addr.port()), captured)
}

fn credentials() -> Credentials {
    Credentials::new("inst", "tok", "secret")
}

fn client(base: &str) -> ZapiClient {
    ZapiClient::with_api_base(credentials(), base).expect("valid client")
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

/// Three `sendText` items whose middle one the stub rejects.
fn three_items() -> StaticParameters {
    StaticParameters::new(object(json!({
        "resource": "message",
        "operation": "sendText",
        "message": "hello"
    })))
    .push_item(object(json!({ "phone": "5511" })))
    .push_item(object(json!({ "phone": REJECTED_PHONE })))
    .push_item(object(json!({ "phone": "5522" })))
}

// ── dispatch ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn send_text_hits_instance_path_with_client_token() {
    let (base, captured) = start_stub().await;
    let params = StaticParameters::default()
        .set("phone", "+55 (11) 99999-9999")
        .set("message", "hi");

    let out = execute_batch(&client(&base), &params, BatchOptions::default())
        .await
        .expect("batch succeeds");
    assert_eq!(out, vec![json!({ "messageId": "M1" })]);

    let seen = captured.all();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].path, "/instances/inst/token/tok/send-text");
    assert_eq!(seen[0].client_token.as_deref(), Some("secret"));
    let body: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body, json!({ "phone": "5511999999999", "message": "hi" }));
}

#[tokio::test]
async fn get_operations_send_no_body() {
    let (base, captured) = start_stub().await;
    let params = StaticParameters::default()
        .set("resource", "instance")
        .set("operation", "getStatus");

    let out = execute_batch(&client(&base), &params, BatchOptions::default())
        .await
        .expect("batch succeeds");
    assert_eq!(out, vec![json!({ "connected": true })]);

    let seen = captured.all();
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].path, "/instances/inst/token/tok/status");
    assert!(seen[0].body.is_empty());
}

#[tokio::test]
async fn path_parameters_are_substituted() {
    let (base, captured) = start_stub().await;
    let params = StaticParameters::default()
        .set("resource", "group")
        .set("operation", "getMetadata")
        .set("groupId", " 120363019502650977-group ");

    execute_batch(&client(&base), &params, BatchOptions::default())
        .await
        .expect("batch succeeds");

    assert_eq!(
        captured.all()[0].path,
        "/instances/inst/token/tok/group-metadata/120363019502650977-group"
    );
}

#[tokio::test]
async fn remote_error_carries_gateway_message() {
    let (base, _) = start_stub().await;
    let params = StaticParameters::default()
        .set("phone", REJECTED_PHONE)
        .set("message", "hi");

    let err = execute_batch(&client(&base), &params, BatchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.item, 0);
    assert_eq!(err.error.to_string(), "Z-API error: phone not registered");
    assert!(matches!(err.error, ZapiError::RemoteApi { status: 400, .. }));
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let params = StaticParameters::default()
        .set("phone", "5511")
        .set("message", "hi");
    let err = execute_batch(
        &client(&format!("http://127.0.0.1:{port}")),
        &params,
        BatchOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err.error, ZapiError::Transport(_)));
}

#[tokio::test]
async fn transport_errors_never_expose_the_instance_token() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = ZapiClient::with_api_base(
        Credentials::new("inst", "SUPERSECRETTOKEN", "client"),
        format!("http://127.0.0.1:{port}"),
    )
    .unwrap();
    let params = StaticParameters::default()
        .set("phone", "5511")
        .set("message", "hi");

    let out = execute_batch(
        &client,
        &params,
        BatchOptions {
            continue_on_fail: true,
        },
    )
    .await
    .expect("batch completes");
    let message = out[0]["error"].as_str().expect("error string");
    assert!(message.starts_with("transport error"));
    assert!(!message.contains("SUPERSECRETTOKEN"));

    let err = execute_batch(&client, &params, BatchOptions::default())
        .await
        .unwrap_err();
    assert!(!err.to_string().contains("SUPERSECRETTOKEN"));
    assert!(!format!("{:?}", err.error).contains("SUPERSECRETTOKEN"));
}

#[tokio::test]
async fn validation_failure_sends_nothing() {
    let (base, captured) = start_stub().await;
    let params = StaticParameters::default().set("phone", "5511");

    let err = execute_batch(&client(&base), &params, BatchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err.error, ZapiError::Validation { .. }));
    assert!(captured.all().is_empty());
}

// ── batches ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_stops_at_first_failure() {
    let (base, captured) = start_stub().await;

    let err = execute_batch(&client(&base), &three_items(), BatchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.item, 1);
    assert_eq!(err.completed, vec![json!({ "messageId": "M1" })]);

    // The third item never ran.
    assert_eq!(captured.all().len(), 2);
}

#[tokio::test]
async fn batch_continues_on_failure_when_asked() {
    let (base, captured) = start_stub().await;

    let out = execute_batch(
        &client(&base),
        &three_items(),
        BatchOptions {
            continue_on_fail: true,
        },
    )
    .await
    .expect("batch completes");

    assert_eq!(
        out,
        vec![
            json!({ "messageId": "M1" }),
            json!({ "error": "Z-API error: phone not registered" }),
            json!({ "messageId": "M3" }),
        ]
    );

    let phones: Vec<Value> = captured
        .all()
        .iter()
        .map(|s| serde_json::from_str::<Value>(&s.body).unwrap()["phone"].clone())
        .collect();
    assert_eq!(phones, vec![json!("5511"), json!("999"), json!("5522")]);
}

#[tokio::test]
async fn empty_item_list_sends_nothing() {
    let (base, captured) = start_stub().await;
    let params = StaticParameters::with_items(
        object(json!({ "resource": "instance", "operation": "getStatus" })),
        Vec::new(),
    );

    let out = execute_batch(&client(&base), &params, BatchOptions::default())
        .await
        .expect("batch succeeds");
    assert!(out.is_empty());
    assert!(captured.all().is_empty());
}

#[tokio::test]
async fn mid_batch_validation_failure_stops_the_batch() {
    let (base, captured) = start_stub().await;
    let params = StaticParameters::new(object(json!({
        "resource": "message",
        "operation": "sendList",
        "listTitle": "Menu"
    })))
    .push_item(object(json!({ "phone": "5511", "listSections": "[]" })))
    .push_item(object(json!({ "phone": "5522", "listSections": "[{" })))
    .push_item(object(json!({ "phone": "5533", "listSections": "[]" })));

    let err = execute_batch(&client(&base), &params, BatchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.item, 1);
    assert!(matches!(err.error, ZapiError::Validation { .. }));
    assert_eq!(err.completed.len(), 1);

    // Only the first item reached the gateway.
    let seen = captured.all();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].path.ends_with("/send-option-list"));
}

// ── adapter ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn adapter_connects_and_executes_against_gateway() {
    let (base, captured) = start_stub().await;
    let mut adapter = ZapiAdapter::new("zapi", client(&base));

    adapter.connect().await.expect("connectivity test passes");
    assert_eq!(adapter.health_check().await.unwrap(), HealthStatus::Healthy);

    let out = adapter
        .execute_tool("zapi_chat_archive", json!({}))
        .await
        .expect("tool runs");
    assert!(out.get("messageId").is_some());

    let seen = captured.all();
    assert_eq!(seen[0].path, "/instances/inst/token/tok/status");
    assert_eq!(seen.last().unwrap().path, "/instances/inst/token/tok/archive-chat");
}
