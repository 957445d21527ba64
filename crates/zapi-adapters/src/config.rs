//! Configuration loading.
//!
//! Settings come from `config/default.toml` (optional) and are then
//! overridden by `ZAPI_*` environment variables:
//!
//! ```toml
//! [zapi]
//! instance_id = "3C0FFEE..."
//! instance_token = "..."
//! client_token = "..."
//! api_base = "https://api.z-api.io"
//!
//! [webhook]
//! bind = "0.0.0.0"
//! port = 5680
//! path = "/webhook"
//! event = "ReceivedCallback"
//! filter_phone = "5511"
//! filter_group = false
//! ignore_status = true
//! only_text = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::client::ZapiClient;
use crate::credentials::{Credentials, DEFAULT_API_BASE};
use crate::error::{Result, ZapiError};
use crate::trigger::{EventSelector, FilterOptions, ZapiTrigger};

/// Config file read when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub zapi: GatewayConfig,
    pub webhook: WebhookConfig,
}

/// The `[zapi]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub api_base: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// The `[webhook]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub bind: String,
    pub port: u16,
    pub path: String,
    pub event: EventSelector,
    pub filter_phone: Option<String>,
    pub filter_group: bool,
    pub ignore_status: bool,
    pub only_text: bool,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 5680,
            path: "/webhook".into(),
            event: EventSelector::All,
            filter_phone: None,
            filter_group: false,
            ignore_status: true,
            only_text: false,
        }
    }
}

impl WebhookConfig {
    /// The trigger this section describes.
    pub fn trigger(&self) -> ZapiTrigger {
        ZapiTrigger::new(
            self.event,
            FilterOptions {
                filter_phone: self.filter_phone.clone().filter(|p| !p.is_empty()),
                filter_group: self.filter_group,
                ignore_status: self.ignore_status,
                only_text: self.only_text,
            },
        )
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ZapiError::Config(format!("invalid config: {e}")))
    }

    /// Load configuration and apply environment overrides.
    ///
    /// An explicit `path` must exist.  Without one, [`DEFAULT_CONFIG_PATH`]
    /// is read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        let mut config = match std::fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), "loaded config file");
                Self::from_toml(&text)?
            }
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Override gateway settings from the environment.
    ///
    /// Takes a lookup function so tests need not touch the process
    /// environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let overrides: [(&str, &mut String); 4] = [
            ("ZAPI_INSTANCE_ID", &mut self.zapi.credentials.instance_id),
            ("ZAPI_INSTANCE_TOKEN", &mut self.zapi.credentials.instance_token),
            ("ZAPI_CLIENT_TOKEN", &mut self.zapi.credentials.client_token),
            ("ZAPI_API_BASE", &mut self.zapi.api_base),
        ];
        for (name, slot) in overrides {
            if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
                *slot = value;
            }
        }
    }

    /// Build a dispatcher from the `[zapi]` section.
    pub fn client(&self) -> Result<ZapiClient> {
        ZapiClient::with_api_base(self.zapi.credentials.clone(), &self.zapi.api_base)
    }
}
