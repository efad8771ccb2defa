//! Full configuration validation.
//!
//! Range checks for every numeric setting plus the gate's length bounds.
//! Each section has its own function; this orchestrator calls them all and
//! collects errors into a single `ConfigError`.

mod helpers;
mod sections;

#[cfg(test)]
mod tests;

use crate::schema::StandupConfig;
use standup_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &StandupConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_supabase(&mut errors, config);
    sections::validate_realtime(&mut errors, config);
    sections::validate_server(&mut errors, config);
    sections::validate_gate(&mut errors, config);
    sections::validate_room(&mut errors, config);

    into_result(errors)
}

/// Check that the backend connection is actually configured.
///
/// Kept separate from [`validate`] because the default config is valid but
/// not connectable.
pub fn validate_connection(config: &StandupConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    helpers::require_non_empty(&mut errors, "supabase.url", &config.supabase.url);
    helpers::require_non_empty(&mut errors, "supabase.api_key", &config.supabase.api_key);
    if !config.supabase.url.is_empty()
        && !config.supabase.url.starts_with("http://")
        && !config.supabase.url.starts_with("https://")
    {
        errors.push(format!(
            "supabase.url = {} must start with http:// or https://",
            config.supabase.url
        ));
    }

    into_result(errors)
}

fn into_result(errors: Vec<String>) -> Result<(), ConfigError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
