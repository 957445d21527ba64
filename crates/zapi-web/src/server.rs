//! Webhook server setup and startup.
//!
//! [`WebhookServer`] composes the Axum router and starts the HTTP
//! listener.  Emitted events are observed through [`WebhookServer::subscribe`].

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use zapi_adapters::ZapiTrigger;

use crate::WebConfig;
use crate::error::{Result, WebError};
use crate::state::AppState;
use crate::webhook;

/// Route reserved for the liveness probe.
pub const HEALTH_PATH: &str = "/health";

/// The webhook HTTP server.
pub struct WebhookServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebhookServer {
    /// Create a server that filters callbacks with `trigger`.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::InvalidPath`] if the configured path does not
    /// start with `/` or collides with the health route.
    pub fn new(config: WebConfig, trigger: ZapiTrigger) -> Result<Self> {
        if !config.path.starts_with('/') || config.path == HEALTH_PATH {
            return Err(WebError::InvalidPath(config.path));
        }
        Ok(Self {
            config,
            state: Arc::new(AppState::new(trigger)),
        })
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.bind_addr, self.config.port)
    }

    /// Receive every payload emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.state.events.subscribe()
    }

    /// Shared handler state.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Build the Axum router with all routes registered.
    pub fn router(&self) -> Router {
        Router::new()
            .route(&self.config.path, post(webhook::receive))
            .route(HEALTH_PATH, get(webhook::health))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.state))
    }

    /// Bind the configured address and serve until shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound.
    pub async fn start(self) -> Result<()> {
        let addr = self.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| WebError::Bind {
                addr: addr.clone(),
                source,
            })?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let router = self.router();
        let local = listener.local_addr()?;
        tracing::info!(
            addr = %local,
            path = %self.config.path,
            event = %self.state.trigger.event,
            "starting webhook server"
        );
        axum::serve(listener, router).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_relative_path() {
        let config = WebConfig {
            path: "webhook".into(),
            ..WebConfig::default()
        };
        assert!(matches!(
            WebhookServer::new(config, ZapiTrigger::default()),
            Err(WebError::InvalidPath(_))
        ));
    }

    #[test]
    fn rejects_health_path() {
        let config = WebConfig {
            path: HEALTH_PATH.into(),
            ..WebConfig::default()
        };
        assert!(WebhookServer::new(config, ZapiTrigger::default()).is_err());
    }

    #[test]
    fn addr_joins_host_and_port() {
        let server = WebhookServer::new(WebConfig::default(), ZapiTrigger::default()).unwrap();
        assert_eq!(server.addr(), "127.0.0.1:5680");
    }
}
