//! Adapter error types.
//!
//! Every failure inside the Z-API adapter surfaces as a [`ZapiError`].  The
//! three variants callers care most about mirror how a failed item is
//! reported back to the workflow:
//!
//! - [`ZapiError::RemoteApi`]: the gateway answered with an error body.
//! - [`ZapiError::Transport`]: the request never produced a response.
//! - [`ZapiError::Validation`]: the user-supplied parameters were unusable.

/// Unified error type for the Z-API adapter.
#[derive(Debug, thiserror::Error)]
pub enum ZapiError {
    /// The gateway returned a non-success status.  `message` is extracted
    /// from the response body.
    #[error("Z-API error: {message}")]
    RemoteApi { status: u16, message: String },

    /// The request failed before any response was received (DNS,
    /// connection refused, TLS, timeout).  The URL is stripped from the
    /// source because it embeds the instance token.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    /// A parameter supplied for an operation is missing or malformed.
    #[error("invalid parameter `{field}`: {reason}")]
    Validation { field: String, reason: String },

    /// The resource name is not one of the known categories.
    #[error("unknown resource `{0}`")]
    UnknownResource(String),

    /// The (resource, operation) pair is not part of the operation table.
    #[error("unknown operation `{operation}` for resource `{resource}`")]
    UnknownOperation { resource: String, operation: String },

    /// The requested tool does not exist on this adapter.
    #[error("tool not found: `{tool_name}` on adapter `{adapter_id}`")]
    ToolNotFound {
        adapter_id: String,
        tool_name: String,
    },

    /// A tool was invoked before [`crate::Adapter::connect`] succeeded.
    #[error("adapter `{adapter_id}` is not connected")]
    NotConnected { adapter_id: String },

    /// Configuration error (missing credentials, unreadable config file).
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ZapiError {
    /// Shorthand for a [`ZapiError::Validation`].
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for ZapiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

/// Convenience alias used throughout the adapters crate.
pub type Result<T> = std::result::Result<T, ZapiError>;
