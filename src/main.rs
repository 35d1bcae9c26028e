//! CLI entry point for the travelynx i3bar helper.
//!
//! Prints one i3bar block describing the current check-in and exits.
//! Meant to be called periodically from whatever feeds the bar.

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsStr;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use travelynx_i3bar::{
    fetch::BasicClient,
    infra::{keys::ApiKeyFile, marudor, marudor::DetailsClient, travelynx, travelynx::TravelynxClient},
    output::render_line,
    status::collect,
};

#[derive(Parser)]
#[command(name = "travelynx_i3bar")]
#[command(about = "Print the current travelynx check-in as an i3bar block", long_about = None)]
#[command(version)]
struct Cli {
    /// File holding the travelynx API key [default: <config dir>/travelynx.conf]
    #[arg(long, env = "TRAVELYNX_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the travelynx instance
    #[arg(long, env = "TRAVELYNX_URL", default_value = travelynx::DEFAULT_BASE_URL)]
    travelynx_url: String,

    /// Base URL of the journey-details service
    #[arg(long, env = "TRAVELYNX_DETAILS_URL", default_value = marudor::DEFAULT_BASE_URL)]
    details_url: String,

    /// Skip the next-stop lookup
    #[arg(long, default_value_t = false)]
    no_details: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging();

    let cli = Cli::parse();

    let key_file = match cli.config {
        Some(path) => ApiKeyFile::new(path),
        None => ApiKeyFile::default_location()?,
    };
    let api_key = key_file.load()?;

    let http = BasicClient::new();
    let tracker = TravelynxClient::new(http.clone(), cli.travelynx_url, api_key);
    let details = (!cli.no_details).then(|| DetailsClient::new(http, cli.details_url));

    let block = collect(&tracker, details.as_ref())
        .await
        .context("Failed to query travelynx")?;

    if let Some(block) = block {
        println!("{}", render_line(&block)?);
    }

    Ok(())
}

/// Logging setup: stderr (stdout belongs to the bar) + optional JSON rolling
/// log file when `LOG_FILE_PATH` is set.
fn init_logging() -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("RUST_LOG")
                .from_env_lossy(),
        );

    let (json_layer, guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let log_path = Path::new(&log_file_path);
            let log_dir = log_path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let log_file_name = log_path
                .file_name()
                .unwrap_or(OsStr::new("travelynx_i3bar.log"));

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(LevelFilter::DEBUG.into())
                        .with_env_var("RUST_LOG_JSON")
                        .from_env_lossy(),
                );
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}
