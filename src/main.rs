use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod config;
use config::{
    app_config::{load_config, setup_http_client, setup_resolver, setup_tls_connector},
    cli::Cli,
};
pub mod diagnose;
use diagnose::{DiagnoseOptions, diagnose_all};
pub mod error;
pub mod probe;
use probe::prelude::*;
pub mod report;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app_config = load_config(cli)?;

    let client = setup_http_client().context("Failed to create HTTP client")?;
    let connector = setup_tls_connector()?;
    let resolver = setup_resolver(&app_config.dns_hosts)?;
    let prober = Arc::new(SystemProber::new(client, connector, resolver));

    let opts = DiagnoseOptions {
        timeout: app_config.timeout,
        retries: app_config.retries,
    };
    log::info!(
        "Diagnosing {} targets (timeout {:?}, {} attempts)",
        app_config.urls.len(),
        opts.timeout,
        opts.retries
    );

    let results = diagnose_all(prober, &app_config.urls, opts).await;

    report::write_report(&app_config.report_path, &results)?;
    report::print_summary(&results, &app_config.report_path);

    Ok(ExitCode::from(report::exit_status(&results)))
}
