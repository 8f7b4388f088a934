//! Showcase CLI
//!
//! Command-line interface for the portfolio reachability and activity service.

use std::path::PathBuf;

use clap::Parser;
use showcase::{load_config, Config, Mode};
use tracing::Level;

#[derive(Parser)]
#[command(name = "showcase")]
#[command(about = "Portfolio deployment reachability and GitHub activity")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve the dashboard instead of printing once
    #[arg(long, conflicts_with = "json")]
    serve: bool,

    /// Print the settled snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// GitHub account whose activity is shown (overrides config file)
    #[arg(long)]
    account: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, serve={}, json={}, port={:?}, account={:?}, log_level={:?}",
        args.config,
        args.serve,
        args.json,
        args.port,
        args.account,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(port) = args.port {
        config.dashboard.port = port;
    }
    if let Some(account) = args.account {
        config.activity.account = account;
    }
    config.validate()?;

    let mode = if args.serve {
        Mode::Serve
    } else if args.json {
        Mode::Json
    } else {
        Mode::Text
    };

    tracing::info!("Starting showcase ({:?})", mode);
    tracing::debug!(
        "Targets: {}, account: {}",
        config.targets.len(),
        config.activity.account
    );

    showcase::run(config, mode).await?;

    Ok(())
}
