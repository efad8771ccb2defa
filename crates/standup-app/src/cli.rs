use std::path::PathBuf;

use clap::Parser;

/// Standup helper: join the room, mark yourself done or raise an issue.
#[derive(Parser, Debug)]
#[command(name = "standup", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Meeting password. Falls back to `STANDUP_PASSWORD`, then a prompt.
    #[arg(short, long)]
    pub password: Option<String>,

    /// Base URL of the standup server (overrides `server.public_url`).
    #[arg(short, long)]
    pub server: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
