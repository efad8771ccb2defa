//! Environment-based configuration: `.env` loading and variable overrides.

use std::path::{Path, PathBuf};

use crate::schema::StandupConfig;

/// Supabase project URL.
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
/// Supabase anon key.
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
/// Public URL of the standup server (leave beacon, gate).
pub const ENV_SERVER_URL: &str = "STANDUP_SERVER_URL";

/// Load environment variables from a `.env` file (KEY=VALUE lines).
///
/// Existing variables are never overwritten. Returns the file that was
/// loaded, if any.
pub fn load_dotenv(candidates: &[PathBuf]) -> Option<PathBuf> {
    for path in candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for (key, value) in parse_dotenv(&contents) {
                if std::env::var(&key).is_err() {
                    std::env::set_var(key, value);
                }
            }
            return Some(path.clone());
        }
    }
    None
}

/// Default `.env` locations: the working directory, then next to the config file.
pub fn default_dotenv_candidates(config_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Some(dir) = config_path.and_then(Path::parent) {
        candidates.push(dir.join(".env"));
    }
    candidates
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let key = key.trim().trim_start_matches("export ").trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.to_string(), value.to_string())
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut StandupConfig) {
    apply_overrides_with(config, |key| std::env::var(key).ok());
}

/// Apply overrides using an arbitrary lookup (the process environment in
/// production, a map in tests). Empty values are ignored.
pub fn apply_overrides_with<F>(config: &mut StandupConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_SUPABASE_URL) {
        tracing::debug!("supabase.url overridden from {ENV_SUPABASE_URL}");
        config.supabase.url = url;
    }
    if let Some(key) = get(ENV_SUPABASE_ANON_KEY) {
        tracing::debug!("supabase.api_key overridden from {ENV_SUPABASE_ANON_KEY}");
        config.supabase.api_key = key;
    }
    if let Some(url) = get(ENV_SERVER_URL) {
        tracing::debug!("server.public_url overridden from {ENV_SERVER_URL}");
        config.server.public_url = url;
    }
}
