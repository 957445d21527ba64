//! Host-facing adapter trait and supporting types.
//!
//! A workflow host discovers what an adapter can do through
//! [`Adapter::tools`] (one declarative definition per operation) and runs
//! an operation through [`Adapter::execute_tool`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// The health status of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// The gateway answered the connectivity test.
    Healthy,
    /// The adapter is connected but the last connectivity test failed.
    Degraded,
    /// The adapter has not been connected.
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// A declarative operation definition the host can render and invoke.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Machine-readable name (e.g. `zapi_message_send_text`).
    pub name: String,
    /// Human-readable description of what the operation does.
    pub description: String,
    /// JSON Schema of the parameters active for this operation.
    pub parameters: serde_json::Value,
}

/// Credentials a host must collect before the adapter can run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequirement {
    /// The credential provider name.
    pub provider: String,
    /// The credential fields required.
    pub scopes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Core trait
// ---------------------------------------------------------------------------

/// The interface a workflow host drives.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Return the unique identifier for this adapter instance.
    fn id(&self) -> &str;

    /// Verify the credentials against the backing service.
    async fn connect(&mut self) -> Result<()>;

    /// Mark the adapter disconnected.
    async fn disconnect(&mut self) -> Result<()>;

    /// Check whether the adapter is healthy and operational.
    async fn health_check(&self) -> Result<HealthStatus>;

    /// Return the list of operations this adapter exposes.
    fn tools(&self) -> Vec<ToolDefinition>;

    /// Execute a named operation with the given JSON parameters.
    async fn execute_tool(
        &self,
        name: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value>;

    /// Return the authentication requirements for this adapter, if any.
    fn required_auth(&self) -> Option<AuthRequirement>;
}
