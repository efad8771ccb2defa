//! Standup helper configuration system.
//!
//! TOML-based configuration with validation and environment overrides.
//! All sections use sensible defaults so partial configs work out of the
//! box; only the Supabase URL and key must be provided.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use standup_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{StandupConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use standup_common::ConfigError;

/// Load config from `path` (or the platform default when `None`), apply
/// environment overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<StandupConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    env::apply_env_overrides(&mut config);

    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string with the API key redacted.
pub fn config_to_json(config: &StandupConfig) -> String {
    let mut redacted = config.clone();
    if !redacted.supabase.api_key.is_empty() {
        redacted.supabase.api_key = "[REDACTED]".into();
    }
    serde_json::to_string_pretty(&redacted)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
