//! Webhook trigger: decide whether an inbound gateway event starts a workflow.
//!
//! The gateway posts loosely shaped JSON whose field names vary between
//! event kinds (`phone` vs `from` vs `chatId`, `messageId` vs `id.id` vs
//! `ids[0]`).  Every lookup here tolerates absence and follows a fixed
//! fallback order.  Empty strings, `false`, `0` and `null` count as absent.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{Result, ZapiError};
use crate::phone;

/// Key under which derived fields are attached to an emitted payload.
pub const METADATA_KEY: &str = "_metadata";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which gateway event kinds start the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSelector {
    #[default]
    #[serde(rename = "all")]
    All,
    ReceivedCallback,
    MessageStatusCallback,
    StatusInstanceCallback,
    PresenceChatCallback,
    DisconnectedCallback,
    ConnectedCallback,
}

impl EventSelector {
    pub const ALL: [EventSelector; 7] = [
        Self::All,
        Self::ReceivedCallback,
        Self::MessageStatusCallback,
        Self::StatusInstanceCallback,
        Self::PresenceChatCallback,
        Self::DisconnectedCallback,
        Self::ConnectedCallback,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ReceivedCallback => "ReceivedCallback",
            Self::MessageStatusCallback => "MessageStatusCallback",
            Self::StatusInstanceCallback => "StatusInstanceCallback",
            Self::PresenceChatCallback => "PresenceChatCallback",
            Self::DisconnectedCallback => "DisconnectedCallback",
            Self::ConnectedCallback => "ConnectedCallback",
        }
    }

    /// Whether an event named `event` passes this selector.
    pub fn matches(self, event: &str) -> bool {
        self == Self::All || self.as_str() == event
    }
}

impl fmt::Display for EventSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventSelector {
    type Err = ZapiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| ZapiError::Config(format!("unknown webhook event `{s}`")))
    }
}

/// User-chosen filters applied to every inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOptions {
    /// Only events whose phone contains these digits.
    pub filter_phone: Option<String>,
    /// Only group events.
    pub filter_group: bool,
    /// Drop status/story broadcasts.
    pub ignore_status: bool,
    /// Only text messages.
    pub only_text: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            filter_phone: None,
            filter_group: false,
            ignore_status: true,
            only_text: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Why an event was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The event type is not the selected one.
    EventMismatch { expected: EventSelector, actual: String },
    /// The event's phone does not contain the filter digits.
    PhoneMismatch,
    /// Group-only filter and the event is not from a group.
    NotGroup,
    /// The event is a status broadcast.
    StatusBroadcast,
    /// Text-only filter and the event is not a text message.
    NotText,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventMismatch { expected, actual } => {
                write!(f, "event `{actual}` does not match `{expected}`")
            }
            Self::PhoneMismatch => f.write_str("phone does not match filter"),
            Self::NotGroup => f.write_str("not a group message"),
            Self::StatusBroadcast => f.write_str("status broadcast"),
            Self::NotText => f.write_str("not a text message"),
        }
    }
}

/// Outcome of evaluating one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Start the workflow with this enriched payload.
    Emit(Value),
    Drop(DropReason),
}

impl Decision {
    pub fn is_emit(&self) -> bool {
        matches!(self, Self::Emit(_))
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Apply the filters to `payload`.
///
/// Rules run in a fixed order and the first failing one drops the event:
/// event type, phone, group, status broadcast, text.  An emitted payload is
/// the incoming object plus a `_metadata` object; a payload that is not a
/// JSON object has no fields to read and is emitted as `_metadata` alone.
pub fn evaluate(
    payload: &Value,
    selected: EventSelector,
    filters: &FilterOptions,
    received_at: DateTime<Utc>,
) -> Decision {
    let empty = Map::new();
    let body = payload.as_object().unwrap_or(&empty);

    let event = text(body, "event")
        .or_else(|| text(body, "type"))
        .unwrap_or_else(|| "unknown".to_string());
    if !selected.matches(&event) {
        return Decision::Drop(DropReason::EventMismatch {
            expected: selected,
            actual: event,
        });
    }

    if let Some(filter) = filters.filter_phone.as_deref().filter(|f| !f.is_empty()) {
        let candidate = text(body, "phone")
            .or_else(|| text(body, "from"))
            .or_else(|| text(body, "chatId"))
            .unwrap_or_default();
        if !candidate.contains(&phone::digits(filter)) {
            return Decision::Drop(DropReason::PhoneMismatch);
        }
    }

    let chat_id = text(body, "chatId").unwrap_or_default();
    let is_group = truthy(body.get("isGroup")) || chat_id.contains("@g.us");
    if filters.filter_group && !is_group {
        return Decision::Drop(DropReason::NotGroup);
    }

    if filters.ignore_status {
        let is_status = truthy(body.get("isStatusReply")) || chat_id.contains("status@");
        if is_status {
            return Decision::Drop(DropReason::StatusBroadcast);
        }
    }

    if filters.only_text {
        // `messageType` is consulted only when `type` is absent or falsy.
        let kind = text(body, "type")
            .or_else(|| text(body, "messageType"))
            .unwrap_or_default();
        if kind != "text" && kind != "chat" && !truthy(body.get("text")) {
            return Decision::Drop(DropReason::NotText);
        }
    }

    let phone = text(body, "phone")
        .or_else(|| text(body, "from"))
        .or_else(|| {
            chat_id
                .split('@')
                .next()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_default();

    let message_id = text(body, "messageId")
        .or_else(|| body.get("id").and_then(Value::as_object).and_then(|id| text(id, "id")))
        .or_else(|| {
            body.get("ids")
                .and_then(Value::as_array)
                .and_then(|ids| ids.first())
                .and_then(scalar_text)
        })
        .unwrap_or_default();

    let mut enriched = body.clone();
    enriched.insert(
        METADATA_KEY.to_string(),
        json!({
            "receivedAt": received_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            "eventType": event,
            "isGroup": is_group,
            "phone": phone,
            "messageId": message_id,
        }),
    );

    Decision::Emit(Value::Object(enriched))
}

/// Loose truthiness of an optional JSON value.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// A truthy scalar rendered as a string.
fn scalar_text(value: &Value) -> Option<String> {
    if !truthy(Some(value)) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text(body: &Map<String, Value>, key: &str) -> Option<String> {
    body.get(key).and_then(scalar_text)
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// A registered webhook trigger.
///
/// Subscriptions are managed in the gateway dashboard, so the registration
/// hooks never call the gateway and always report success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZapiTrigger {
    pub event: EventSelector,
    pub options: FilterOptions,
}

impl ZapiTrigger {
    pub fn new(event: EventSelector, options: FilterOptions) -> Self {
        Self { event, options }
    }

    pub async fn check_exists(&self) -> Result<bool> {
        Ok(true)
    }

    pub async fn create(&self) -> Result<bool> {
        debug!(event = %self.event, "webhook registration is managed in the Z-API dashboard");
        Ok(true)
    }

    pub async fn delete(&self) -> Result<bool> {
        debug!(event = %self.event, "webhook removal is managed in the Z-API dashboard");
        Ok(true)
    }

    /// Evaluate one inbound payload, stamped with the current time.
    pub fn handle(&self, payload: &Value) -> Decision {
        let decision = evaluate(payload, self.event, &self.options, Utc::now());
        match &decision {
            Decision::Emit(_) => debug!(event = %self.event, "webhook event emitted"),
            Decision::Drop(reason) => debug!(reason = %reason, "webhook event dropped"),
        }
        decision
    }
}
