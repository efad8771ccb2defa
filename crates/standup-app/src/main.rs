mod cli;
mod commands;
mod gate;
mod render;
mod session;

use std::process::ExitCode;
use std::time::Duration;

use standup_common::{init_logging, StandupError};
use standup_config::env::{default_dotenv_candidates, load_dotenv};
use standup_config::StandupConfig;
use standup_room::realtime::RealtimeConfig;
use standup_room::{LeaveBeacon, PostgrestClient, RealtimeFeed, Reconciler};
use tokio::io::{AsyncBufReadExt, BufReader};

const ENV_PASSWORD: &str = "STANDUP_PASSWORD";

/// REST store, leave beacon and change feed for the configured backend.
fn build_clients(
    config: &StandupConfig,
) -> standup_common::Result<(PostgrestClient, LeaveBeacon, RealtimeFeed)> {
    let store = PostgrestClient::new(&config.supabase)
        .map_err(|e| StandupError::Remote(format!("REST client: {e}")))?;
    let beacon = LeaveBeacon::new(&config.server.public_url)
        .map_err(|e| StandupError::Remote(format!("leave beacon: {e}")))?;
    let feed = RealtimeFeed::new(
        RealtimeConfig::from_settings(&config.supabase, &config.realtime),
        config.supabase.schema.clone(),
    );
    Ok((store, beacon, feed))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    let dotenv = load_dotenv(&default_dotenv_candidates(args.config.as_deref()));

    let mut config = match standup_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("standup: {}", StandupError::from(e));
            return ExitCode::FAILURE;
        }
    };

    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.as_directive().to_string());
    init_logging(&directive, config.logging.json);
    tracing::info!("standup v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    if let Some(server) = args.server {
        config.server.public_url = server;
    }
    if let Err(e) = standup_config::validation::validate_connection(&config) {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    // Gate
    let password = match gate::preset_password(args.password, std::env::var(ENV_PASSWORD).ok()) {
        Some(password) => password,
        None => {
            print!("Meeting password: ");
            let _ = std::io::Write::flush(&mut std::io::stdout());
            match input.next_line().await {
                Ok(Some(line)) => gate::normalize_password(&line),
                _ => {
                    eprintln!("No password given.");
                    return ExitCode::FAILURE;
                }
            }
        }
    };
    let welcome = match gate::unlock(&config.server.public_url, &password).await {
        Ok(welcome) => welcome,
        Err(e) => {
            eprintln!("{}", StandupError::Gate(e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    // Room
    let (store, beacon, feed) = match build_clients(&config) {
        Ok(clients) => clients,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut room = Reconciler::new(store, config.supabase.participants_table.clone(), &config.room);
    room.notifications().push(welcome);
    let subscription = match room.initialize(&feed).await {
        Ok(subscription) => subscription,
        Err(e) => {
            tracing::error!("{}", StandupError::Realtime(e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let mut stdout = std::io::stdout();
    let result = session::run(&mut room, subscription, &mut input, &mut stdout, &beacon, shutdown).await;

    beacon
        .settle(Duration::from_millis(u64::from(config.room.leave_grace_ms)))
        .await;
    println!("\nYou left the meeting. See ya next time!");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", StandupError::from(e));
            ExitCode::FAILURE
        }
    }
}
