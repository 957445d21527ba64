//! Webhook receiver for Z-API callbacks.
//!
//! The gateway POSTs every callback to a single URL.  [`WebhookServer`]
//! answers each one immediately, runs it through the configured
//! [`ZapiTrigger`](zapi_adapters::ZapiTrigger) and publishes emitted
//! payloads on a broadcast channel.
//!
//! Routes:
//!
//! - `POST {path}` (default `/webhook`) accepts any JSON body.
//! - `GET /health` reports liveness and decision counters.

pub mod error;
pub mod server;
pub mod state;
pub mod webhook;

pub use error::{Result, WebError};
pub use server::WebhookServer;
pub use state::{AppState, Counters};

use zapi_adapters::config::WebhookConfig;

/// Webhook server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
    /// Route the gateway posts callbacks to.
    pub path: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 5680,
            path: "/webhook".into(),
        }
    }
}

impl From<&WebhookConfig> for WebConfig {
    fn from(section: &WebhookConfig) -> Self {
        Self {
            bind_addr: section.bind.clone(),
            port: section.port,
            path: section.path.clone(),
        }
    }
}
