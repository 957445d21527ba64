//! Gateway credentials.
//!
//! An instance is addressed by its ID and token, both embedded in the URL;
//! the account-level client token travels in a header on every request.

use std::fmt;

use serde::Deserialize;

use crate::error::{Result, ZapiError};
use crate::operations::HttpMethod;
use crate::request::ZapiRequest;
use crate::traits::AuthRequirement;

/// Default public gateway host.
pub const DEFAULT_API_BASE: &str = "https://api.z-api.io";

/// Header carrying the account-level client token.
pub const CLIENT_TOKEN_HEADER: &str = "Client-Token";

/// The three secrets that authorize calls against one instance.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub instance_id: String,
    pub instance_token: String,
    pub client_token: String,
}

impl Credentials {
    pub fn new(
        instance_id: impl Into<String>,
        instance_token: impl Into<String>,
        client_token: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            instance_token: instance_token.into(),
            client_token: client_token.into(),
        }
    }

    /// Read `ZAPI_INSTANCE_ID`, `ZAPI_INSTANCE_TOKEN` and `ZAPI_CLIENT_TOKEN`.
    ///
    /// Unset variables become empty strings; call [`Credentials::validate`]
    /// before use.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Self {
            instance_id: var("ZAPI_INSTANCE_ID"),
            instance_token: var("ZAPI_INSTANCE_TOKEN"),
            client_token: var("ZAPI_CLIENT_TOKEN"),
        }
    }

    /// Fail with [`ZapiError::Config`] naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("instance_id", &self.instance_id),
            ("instance_token", &self.instance_token),
            ("client_token", &self.client_token),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ZapiError::Config(format!("missing credential `{name}`")));
            }
        }
        Ok(())
    }

    /// The per-instance base URL every operation path is appended to.
    pub fn base_url(&self, api_base: &str) -> String {
        format!(
            "{}/instances/{}/token/{}",
            api_base.trim_end_matches('/'),
            self.instance_id,
            self.instance_token
        )
    }

    /// Same as [`Credentials::base_url`] with the instance token masked, for logs.
    pub fn redacted_base_url(&self, api_base: &str) -> String {
        format!(
            "{}/instances/{}/token/***",
            api_base.trim_end_matches('/'),
            self.instance_id
        )
    }

    /// The header that authenticates every outbound request.
    pub fn auth_header(&self) -> (&'static str, &str) {
        (CLIENT_TOKEN_HEADER, &self.client_token)
    }

    /// The connectivity test: any non-error answer to `GET /status`.
    pub fn test_request() -> ZapiRequest {
        ZapiRequest::new(HttpMethod::Get, "/status")
    }

    /// Describe what a host must collect before this adapter can run.
    pub fn requirement() -> AuthRequirement {
        AuthRequirement {
            provider: "z-api".into(),
            scopes: vec![
                "instance_id".into(),
                "instance_token".into(),
                "client_token".into(),
            ],
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("instance_id", &self.instance_id)
            .field("instance_token", &"***")
            .field("client_token", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("3C0FFEE", "inst-secret", "client-secret")
    }

    #[test]
    fn base_url_interpolates_instance() {
        assert_eq!(
            creds().base_url(DEFAULT_API_BASE),
            "https://api.z-api.io/instances/3C0FFEE/token/inst-secret"
        );
    }

    #[test]
    fn base_url_tolerates_trailing_slash() {
        assert_eq!(
            creds().base_url("http://127.0.0.1:9000/"),
            "http://127.0.0.1:9000/instances/3C0FFEE/token/inst-secret"
        );
    }

    #[test]
    fn debug_never_prints_secrets() {
        let rendered = format!("{:?}", creds());
        assert!(rendered.contains("3C0FFEE"));
        assert!(!rendered.contains("inst-secret"));
        assert!(!rendered.contains("client-secret"));
        assert!(!creds().redacted_base_url(DEFAULT_API_BASE).contains("inst-secret"));
    }

    #[test]
    fn auth_header_uses_client_token() {
        assert_eq!(creds().auth_header(), ("Client-Token", "client-secret"));
    }

    #[test]
    fn validate_names_missing_field() {
        let err = Credentials::new("id", "", "client").validate().unwrap_err();
        assert!(err.to_string().contains("instance_token"));
        assert!(creds().validate().is_ok());
    }

    #[test]
    fn test_request_is_get_status() {
        let req = Credentials::test_request();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "/status");
        assert!(req.body.is_empty());
    }
}
