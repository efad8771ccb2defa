//! Configuration schema types for the standup helper.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod gate;
mod realtime;
mod room;
mod server;
mod supabase;
mod system;

pub use gate::*;
pub use realtime::*;
pub use room::*;
pub use server::*;
pub use supabase::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only the Supabase URL and key have no usable default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct StandupConfig {
    pub supabase: SupabaseConfig,
    pub realtime: RealtimeSettings,
    pub server: ServerConfig,
    pub gate: GateConfig,
    pub room: RoomConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_correct_supabase() {
        let config = StandupConfig::default();
        assert!(config.supabase.url.is_empty());
        assert!(config.supabase.api_key.is_empty());
        assert_eq!(config.supabase.schema, "public");
        assert_eq!(config.supabase.participants_table, "people");
        assert_eq!(config.supabase.config_table, "config");
        assert_eq!(config.supabase.request_timeout, 30);
    }

    #[test]
    fn default_config_has_correct_realtime() {
        let config = StandupConfig::default();
        assert_eq!(config.realtime.heartbeat_interval, 25);
        assert_eq!(config.realtime.reconnect_delay, 1);
        assert_eq!(config.realtime.max_reconnect_delay, 30);
    }

    #[test]
    fn default_config_has_correct_server() {
        let config = StandupConfig::default();
        assert_eq!(config.server.listen_addr(), "0.0.0.0:3000");
        assert_eq!(config.server.public_url, "http://localhost:3000");
    }

    #[test]
    fn default_config_has_correct_gate() {
        let config = StandupConfig::default();
        assert_eq!(config.gate.cookie_name, "is_authenticated");
        assert_eq!(config.gate.password_key, "password");
        assert_eq!(config.gate.min_password_length, 8);
        assert_eq!(config.gate.max_password_length, 100);
    }

    #[test]
    fn default_config_has_correct_room() {
        let config = StandupConfig::default();
        assert_eq!(config.room.placeholder_prefix, "John Doe");
        assert_eq!(config.room.leave_grace_ms, 500);
        assert_eq!(config.room.notification_capacity, 8);
    }

    #[test]
    fn default_config_has_correct_logging() {
        let config = StandupConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.level.as_directive(), "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn supabase_debug_redacts_key() {
        let mut config = StandupConfig::default();
        config.supabase.api_key = "super-secret".into();
        let debug = format!("{:?}", config.supabase);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: StandupConfig = toml::from_str(
            r#"
[supabase]
url = "http://localhost:54321"

[logging]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.supabase.url, "http://localhost:54321");
        assert_eq!(config.supabase.participants_table, "people");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.server.port, 3000);
    }
}
