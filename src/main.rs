use anyhow::{Context, Result};
use clap::Parser;
use hiresignal_client::app_log;
use hiresignal_client::cli::{handle_command, Cli};
use hiresignal_client::environment::ClientConfig;
use std::fs::{File, OpenOptions};
use std::path::Path;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file is cleared on startup
fn open_log_file(log_path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))
}

fn init_logging(log_path: &Path) -> Result<()> {
    let file = open_log_file(log_path)?;

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::load()?;

    if let Err(e) = init_logging(&config.log_path) {
        eprintln!("warning: logging disabled: {:#}", e);
    }
    app_log!(info, "Job service at {}", config.api_base);

    handle_command(cli, config).await
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        app_log!(error, "Command failed: {:#}", e);
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}
