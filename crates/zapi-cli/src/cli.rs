//! CLI argument definitions.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Drive a Z-API WhatsApp instance from the command line.
#[derive(Parser)]
#[command(
    name = "zapi",
    version,
    about = "Z-API WhatsApp gateway adapter",
    long_about = "Send messages and manage a Z-API instance, or run a webhook receiver \
                  that filters gateway callbacks and prints them as JSON lines."
)]
pub struct Cli {
    /// Config file (defaults to config/default.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the credential connectivity test and print the instance status.
    Test,

    /// Print operation definitions as JSON.
    Describe {
        /// Only list operations of this resource.
        #[arg(long, short)]
        resource: Option<String>,
    },

    /// Execute one operation over one or more items.
    Run(RunArgs),

    /// Start the webhook receiver.
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Resource, e.g. `message` or `group`.
    #[arg(long, short, default_value = "message")]
    pub resource: String,

    /// Operation within the resource; defaults to the resource's default.
    #[arg(long, short)]
    pub operation: Option<String>,

    /// Node-level parameter as `name=value`.  Repeatable.
    #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// JSON file holding an array of per-item parameter objects.
    #[arg(long)]
    pub items: Option<PathBuf>,

    /// Record failed items as `{"error": ...}` instead of aborting.
    #[arg(long)]
    pub continue_on_fail: bool,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to.
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on.
    #[arg(long)]
    pub port: Option<u16>,

    /// Route the gateway posts callbacks to.
    #[arg(long)]
    pub path: Option<String>,

    /// Event kind to accept, or `all`.
    #[arg(long)]
    pub event: Option<String>,

    /// Only emit events whose phone contains these digits.
    #[arg(long)]
    pub filter_phone: Option<String>,

    /// Only emit group events.
    #[arg(long)]
    pub filter_group: bool,

    /// Emit status broadcasts too.
    #[arg(long)]
    pub include_status: bool,

    /// Only emit text messages.
    #[arg(long)]
    pub only_text: bool,
}
