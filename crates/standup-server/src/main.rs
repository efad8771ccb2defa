//! standup-server: leave endpoint and password gate.

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use standup_common::init_logging;
use standup_config::env::{default_dotenv_candidates, load_dotenv};
use standup_room::PostgrestClient;
use standup_server::state::AppState;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "standup-server", version, about = "Leave endpoint and password gate for the standup helper")]
struct Args {
    /// Config file path override.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides `server.port`).
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let dotenv = load_dotenv(&default_dotenv_candidates(args.config.as_deref()));

    let mut config = match standup_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("standup-server: {e}");
            return ExitCode::FAILURE;
        }
    };

    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.as_directive().to_string());
    init_logging(&directive, config.logging.json);

    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Err(e) = standup_config::validation::validate_connection(&config) {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }
    tracing::debug!(config = %standup_config::config_to_json(&config), "Effective config");

    let store = match PostgrestClient::new(&config.supabase) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to build REST client: {e}");
            return ExitCode::FAILURE;
        }
    };
    let state = AppState::new(store.clone(), store, config.gate.clone());

    let address = config.server.listen_addr();
    tracing::info!("Binding to {address}");
    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {address}: {e}");
            return ExitCode::FAILURE;
        }
    };

    match standup_server::serve(listener, state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server error: {e}");
            ExitCode::FAILURE
        }
    }
}
