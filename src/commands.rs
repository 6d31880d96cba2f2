//! Command execution helpers.
//!
//! Owns the runtime flow of each sub-command: configuration loading, client
//! setup, running the data source and rendering its output as JSON.

use std::io::Write;

use anyhow::bail;
use log::warn;
use ovh_client_request::cli_args::{GlobalArgs, RequestArgs, SchemaArgs};
use ovh_client_request::{ClientRequestConfig, ClientRequestDataSource, ReadResponse, config};
use serde::Serialize;
use serde_json::json;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancel `cancel` when the process receives Ctrl-C.
fn cancel_on_interrupt(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling the in-flight request");
            cancel.cancel();
        }
    })
}

fn write_json(value: &impl Serialize) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Log warnings, then print the state or fail with the error diagnostics.
fn report(response: ReadResponse) -> anyhow::Result<()> {
    for diag in response.diagnostics.warnings() {
        warn!("{}: {}", diag.summary, diag.detail);
    }
    let Some(state) = response.state else {
        let message = response
            .diagnostics
            .errors()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{message}");
    };
    write_json(&state)
}

pub async fn run_request(args: RequestArgs, global: &GlobalArgs) -> anyhow::Result<()> {
    let client = config::load(global)?.build_client()?;
    let cancel = CancellationToken::new();
    let interrupt = cancel_on_interrupt(cancel.clone());
    let response = ClientRequestDataSource
        .read(&client, &ClientRequestConfig::new(args.path), &cancel)
        .await;
    interrupt.abort();
    report(response)
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "sub-command handlers take their arguments by value"
)]
pub fn run_schema(args: SchemaArgs) -> anyhow::Result<()> {
    let data_source = ClientRequestDataSource;
    write_json(&json!({
        "type_name": data_source.type_name(&args.provider),
        "schema": data_source.schema(),
    }))
}
