//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = StandupConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn default_config_is_not_connectable() {
    let config = StandupConfig::default();
    let err = validate_connection(&config).unwrap_err().to_string();
    assert!(err.contains("supabase.url"));
    assert!(err.contains("supabase.api_key"));
}

#[test]
fn connection_requires_http_scheme() {
    let mut config = StandupConfig::default();
    config.supabase.url = "abcd.supabase.co".into();
    config.supabase.api_key = "anon".into();
    let err = validate_connection(&config).unwrap_err().to_string();
    assert!(err.contains("http:// or https://"));

    config.supabase.url = "https://abcd.supabase.co".into();
    assert!(validate_connection(&config).is_ok());
}

#[test]
fn catches_heartbeat_too_small() {
    let mut config = StandupConfig::default();
    config.realtime.heartbeat_interval = 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("realtime.heartbeat_interval"));
}

#[test]
fn catches_inverted_reconnect_delays() {
    let mut config = StandupConfig::default();
    config.realtime.reconnect_delay = 10;
    config.realtime.max_reconnect_delay = 5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("realtime.max_reconnect_delay"));
}

#[test]
fn catches_port_zero() {
    let mut config = StandupConfig::default();
    config.server.port = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("server.port"));
}

#[test]
fn catches_inverted_password_bounds() {
    let mut config = StandupConfig::default();
    config.gate.min_password_length = 50;
    config.gate.max_password_length = 10;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("gate.max_password_length"));
}

#[test]
fn catches_long_placeholder_prefix() {
    let mut config = StandupConfig::default();
    config.room.placeholder_prefix = "A very long placeholder prefix".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("room.placeholder_prefix"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = StandupConfig::default();
    config.supabase.request_timeout = 0;
    config.room.notification_capacity = 0;
    config.gate.cookie_name = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("supabase.request_timeout"));
    assert!(err.contains("room.notification_capacity"));
    assert!(err.contains("gate.cookie_name"));
}
