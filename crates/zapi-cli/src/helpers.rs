//! Shared helpers for the CLI subcommands.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use zapi_adapters::EventSelector;
use zapi_adapters::config::WebhookConfig;

use crate::cli::ServeArgs;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber.
///
/// Logs go to stderr; stdout carries command output only.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Split a `name=value` argument.  The value may itself contain `=`.
pub fn parse_param(raw: &str) -> Result<(String, Value)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("invalid --param `{raw}`: expected NAME=VALUE");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("invalid --param `{raw}`: empty name");
    }
    Ok((name.to_string(), Value::String(value.to_string())))
}

/// Read a JSON array of per-item parameter objects.
pub fn load_items(path: &Path) -> Result<Vec<Map<String, Value>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read items file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} must hold a JSON array of objects", path.display()))
}

// ---------------------------------------------------------------------------
// serve
// ---------------------------------------------------------------------------

/// Let command-line flags override the `[webhook]` section.
pub fn apply_serve_args(section: &mut WebhookConfig, args: ServeArgs) -> Result<()> {
    if let Some(bind) = args.bind {
        section.bind = bind;
    }
    if let Some(port) = args.port {
        section.port = port;
    }
    if let Some(path) = args.path {
        section.path = path;
    }
    if let Some(event) = args.event {
        section.event = event.parse::<EventSelector>()?;
    }
    if let Some(phone) = args.filter_phone {
        section.filter_phone = Some(phone);
    }
    section.filter_group |= args.filter_group;
    section.only_text |= args.only_text;
    if args.include_status {
        section.ignore_status = false;
    }
    Ok(())
}
