//! CLI entry point for the Z-API adapter.
//!
//! This binary provides the `zapi` command with subcommands for checking
//! credentials, listing operations, executing operations and running the
//! webhook receiver.

mod cli;
mod helpers;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use zapi_adapters::config::Config;
use zapi_adapters::operations::{OPERATIONS, Resource};
use zapi_adapters::{BatchOptions, StaticParameters, ZapiAdapter, execute_batch, node};
use zapi_web::{WebConfig, WebhookServer};

use crate::cli::{Cli, Commands, RunArgs, ServeArgs};
use crate::helpers::{apply_serve_args, init_tracing, load_items, parse_param};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("info");

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Test => cmd_test(&config).await,
        Commands::Describe { resource } => cmd_describe(resource.as_deref()),
        Commands::Run(args) => cmd_run(&config, args).await,
        Commands::Serve(args) => cmd_serve(config, args).await,
    }
}

// ---------------------------------------------------------------------------
// Subcommand: test
// ---------------------------------------------------------------------------

async fn cmd_test(config: &Config) -> Result<()> {
    let client = config.client().context("invalid Z-API credentials")?;
    let status = client
        .test_connection()
        .await
        .context("connectivity test failed")?;
    info!(instance = %client.credentials().instance_id, "credentials accepted");
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: describe
// ---------------------------------------------------------------------------

fn cmd_describe(resource: Option<&str>) -> Result<()> {
    let tools = match resource {
        Some(name) => ZapiAdapter::tools_for(name.parse::<Resource>()?),
        None => OPERATIONS.iter().map(node::tool_definition).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: run
// ---------------------------------------------------------------------------

async fn cmd_run(config: &Config, args: RunArgs) -> Result<()> {
    let client = config.client().context("invalid Z-API credentials")?;

    let mut node_params = Map::new();
    node_params.insert("resource".into(), Value::String(args.resource));
    if let Some(operation) = args.operation {
        node_params.insert("operation".into(), Value::String(operation));
    }
    for raw in &args.params {
        let (name, value) = parse_param(raw)?;
        node_params.insert(name, value);
    }

    let params = match &args.items {
        Some(path) => StaticParameters::with_items(node_params, load_items(path)?),
        None => StaticParameters::new(node_params),
    };

    let options = BatchOptions {
        continue_on_fail: args.continue_on_fail,
    };
    match execute_batch(&client, &params, options).await {
        Ok(results) => {
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
        Err(err) => {
            if !err.completed.is_empty() {
                println!("{}", serde_json::to_string_pretty(&err.completed)?);
            }
            Err(err.into())
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(mut config: Config, args: ServeArgs) -> Result<()> {
    apply_serve_args(&mut config.webhook, args)?;

    let server = WebhookServer::new(WebConfig::from(&config.webhook), config.webhook.trigger())?;
    let mut events = server.subscribe();
    let mut task = tokio::spawn(server.start());

    loop {
        tokio::select! {
            finished = &mut task => {
                finished.context("webhook server task failed")??;
                break;
            }
            event = events.recv() => match event {
                Ok(event) => println!("{}", serde_json::to_string(&event)?),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "output fell behind, events skipped");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down webhook server");
                task.abort();
                break;
            }
        }
    }

    Ok(())
}
