//! Earth Care Network access decision service
//!
//! Serves role, navigation and plan-gating decisions over HTTP.

use clap::Parser;
use earthcare_access::{
    config::{LogFormat, load_config},
    server::{AppState, run_server},
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Earth Care Network access decision service
#[derive(Parser, Debug)]
#[command(name = "earthcare-access")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "EARTHCARE_ACCESS_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides logging.level
    #[arg(long, env = "EARTHCARE_ACCESS_LOG_LEVEL")]
    log_level: Option<String>,

    /// HTTP server host; overrides server.host
    #[arg(long, env = "EARTHCARE_ACCESS_HOST")]
    host: Option<String>,

    /// HTTP server port; overrides server.port
    #[arg(long, env = "EARTHCARE_ACCESS_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before reading any configuration
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;

    // Initialize logging
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match config.logging.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        member_menu = ?config.navigation.member_menu,
        crm_link = ?config.navigation.crm_link,
        "Starting access decision service"
    );

    let state = AppState::from_config(&config)
        .inspect_err(|e| error!(error = %e, "Failed to initialize service state"))?;

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    run_server(&host, port, state)
        .await
        .inspect_err(|e| error!(error = %e, "Server error"))?;

    Ok(())
}
