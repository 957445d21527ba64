//! Request dispatch against the Z-API gateway.
//!
//! [`ZapiClient`] turns a [`ZapiRequest`] into exactly one HTTP call: no
//! retries, no backoff, no timeout override.  Retry policy belongs to the
//! workflow host.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::credentials::{Credentials, DEFAULT_API_BASE};
use crate::error::{Result, ZapiError};
use crate::request::ZapiRequest;

/// Longest raw response body quoted in an error message.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Something that can perform a gateway call.
///
/// The router depends on this trait only, so batches can be driven against
/// a recording fake in tests.
#[async_trait]
pub trait Dispatch: Send + Sync {
    /// Perform the call and return the parsed response body.
    async fn send(&self, request: &ZapiRequest) -> Result<Value>;
}

/// HTTP client bound to one gateway instance.
#[derive(Debug, Clone)]
pub struct ZapiClient {
    credentials: Credentials,
    api_base: String,
    http: reqwest::Client,
}

impl ZapiClient {
    /// Create a client for the public gateway.
    ///
    /// # Errors
    ///
    /// Returns [`ZapiError::Config`] if any credential field is empty.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_api_base(credentials, DEFAULT_API_BASE)
    }

    /// Create a client that talks to `api_base` instead of the public host.
    pub fn with_api_base(credentials: Credentials, api_base: impl Into<String>) -> Result<Self> {
        credentials.validate()?;

        let api_base = api_base.into();
        url::Url::parse(&api_base)
            .map_err(|e| ZapiError::Config(format!("invalid api base `{api_base}`: {e}")))?;

        Ok(Self {
            credentials,
            api_base,
            http: http_client()?,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Full URL for a path relative to the instance.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.credentials.base_url(&self.api_base), path)
    }

    /// Run the credential connectivity test (`GET /status`).
    pub async fn test_connection(&self) -> Result<Value> {
        self.send(&Credentials::test_request()).await
    }
}

#[async_trait]
impl Dispatch for ZapiClient {
    async fn send(&self, request: &ZapiRequest) -> Result<Value> {
        let url = self.url_for(&request.path);
        let (header, token) = self.credentials.auth_header();

        let mut builder = self
            .http
            .request(request.method.into(), &url)
            .header(header, token)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if !request.body.is_empty() {
            builder = builder.json(&request.body);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query_pairs());
        }

        debug!(
            method = %request.method,
            base = %self.credentials.redacted_base_url(&self.api_base),
            path = %request.path,
            has_body = !request.body.is_empty(),
            "dispatching Z-API request"
        );

        let response = builder.send().await.map_err(|e| {
            let err = ZapiError::from(e);
            warn!(method = %request.method, path = %request.path, error = %err, "Z-API request failed");
            err
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = remote_error(status, &text);
            warn!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                error = %err,
                "Z-API returned an error"
            );
            return Err(err);
        }

        debug!(path = %request.path, status = status.as_u16(), "Z-API request completed");
        Ok(parse_body(&text))
    }
}

/// Build the HTTP client shared by every request.
fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("zapi-adapters/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ZapiError::Config(format!("failed to build HTTP client: {e}")))
}

/// Parse a success body: JSON when possible, `null` when empty, otherwise
/// the raw text as a JSON string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Build a [`ZapiError::RemoteApi`] from an error response.
///
/// The message is the body's `message` field, else its `error` field, else
/// the raw body text, else the status line.
fn remote_error(status: StatusCode, text: &str) -> ZapiError {
    let parsed: Option<Value> = serde_json::from_str(text).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let message = field("message")
        .or_else(|| field("error"))
        .or_else(|| {
            let raw = text.trim();
            (!raw.is_empty()).then(|| raw.chars().take(MAX_ERROR_BODY_CHARS).collect())
        })
        .unwrap_or_else(|| status.to_string());

    ZapiError::RemoteApi {
        status: status.as_u16(),
        message,
    }
}
