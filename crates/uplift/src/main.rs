//! Entry point: logging setup, flag parsing, and exit-code mapping.
//! Everything fallible below this file returns typed errors.

use std::process::exit;

use clap::Parser;
use clap::error::ErrorKind;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::UpdateRequest;

mod cli;
mod config;
mod error;
mod pipeline;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => error::EXIT_OK,
                _ => error::EXIT_CONFIG,
            };
            let _ = e.print();
            exit(code);
        }
    };

    let request = match UpdateRequest::try_from(cli) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            exit(error::EXIT_CONFIG);
        }
    };

    info!(
        url = %request.source_url,
        live = %request.live_path.display(),
        "starting update"
    );

    match pipeline::run(uplift_fetch::ReqwestClient::new(), &request).await {
        Ok(outcome) => {
            info!(
                payload = %outcome.payload.display(),
                backup = %outcome.backup.display(),
                "update committed"
            );
        }
        Err(e) => {
            error!(stage = e.stage(), error = %e, "update failed");
            let mut cause = std::error::Error::source(&e);
            while let Some(err) = cause {
                error!("caused by: {err}");
                cause = err.source();
            }
            exit(e.exit_code());
        }
    }
}
