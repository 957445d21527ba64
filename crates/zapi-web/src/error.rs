//! Webhook server errors.

/// Errors raised while starting or running the webhook server.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// The configured route is unusable.
    #[error("invalid webhook path `{0}`: must start with `/` and differ from `/health`")]
    InvalidPath(String),

    /// The TCP listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Convenience alias used throughout the web crate.
pub type Result<T> = std::result::Result<T, WebError>;
