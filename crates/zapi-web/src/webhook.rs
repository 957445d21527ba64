//! Webhook route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};
use tracing::debug;

use zapi_adapters::Decision;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST {path}
// ---------------------------------------------------------------------------

/// Accept one callback.
///
/// The gateway is acknowledged with `200 {"received": true}` whether or
/// not the callback passes the filter.
pub async fn receive(State(state): State<Arc<AppState>>, Json(payload): Json<Value>) -> Json<Value> {
    match state.trigger.handle(&payload) {
        Decision::Emit(event) => {
            state.counters.record(true);
            if state.events.send(event).is_err() {
                debug!("emitted webhook event has no subscribers");
            }
        }
        Decision::Drop(_) => state.counters.record(false),
    }
    Json(json!({ "received": true }))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "event": state.trigger.event.as_str(),
        "counters": state.counters.snapshot(),
    }))
}
