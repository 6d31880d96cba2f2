//! Command-line argument structures.
//!
//! Isolates clap derivations from the runtime flow in `main.rs`. Provider
//! settings given here are the top layer of configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "ovh-client-request",
    version,
    about = "Perform authenticated requests against the OVH API"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a signed GET and print the resulting state as JSON
    Request(RequestArgs),
    /// Print the data source type name and attribute schema as JSON
    Schema(SchemaArgs),
}

/// Provider options that apply to every sub-command.
///
/// Unset options serialise to nothing so they never override lower
/// configuration layers.
#[derive(Args, Serialize, Default, Debug, Clone)]
pub struct GlobalArgs {
    /// Read provider settings from this TOML file
    #[arg(long, value_name = "PATH", global = true)]
    #[serde(skip)]
    pub config: Option<PathBuf>,
    /// API region name (e.g. `ovh-eu`) or base URL
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// OVH application key
    #[arg(long, value_name = "KEY", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_key: Option<String>,
    /// OVH application secret
    #[arg(long, value_name = "SECRET", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_secret: Option<String>,
    /// OVH consumer key
    #[arg(long, value_name = "KEY", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_key: Option<String>,
    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Parameters accepted by the `request` sub-command.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// API path to request, for example `/auth/details`
    #[arg(value_name = "ENDPOINT")]
    pub path: String,
}

/// Parameters accepted by the `schema` sub-command.
#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Provider type name prefixed to the data source name
    #[arg(long, default_value = "ovh")]
    pub provider: String,
}
