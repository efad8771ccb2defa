//! Per-section validators.

use crate::schema::StandupConfig;

use super::helpers::{require_non_empty, validate_range};

pub(crate) fn validate_supabase(errors: &mut Vec<String>, config: &StandupConfig) {
    require_non_empty(errors, "supabase.schema", &config.supabase.schema);
    require_non_empty(
        errors,
        "supabase.participants_table",
        &config.supabase.participants_table,
    );
    require_non_empty(errors, "supabase.config_table", &config.supabase.config_table);
    validate_range(
        errors,
        "supabase.request_timeout",
        config.supabase.request_timeout,
        1,
        300,
    );
}

pub(crate) fn validate_realtime(errors: &mut Vec<String>, config: &StandupConfig) {
    let rt = &config.realtime;
    validate_range(errors, "realtime.heartbeat_interval", rt.heartbeat_interval, 5, 120);
    validate_range(errors, "realtime.reconnect_delay", rt.reconnect_delay, 1, 60);
    validate_range(
        errors,
        "realtime.max_reconnect_delay",
        rt.max_reconnect_delay,
        1,
        600,
    );
    if rt.max_reconnect_delay < rt.reconnect_delay {
        errors.push(format!(
            "realtime.max_reconnect_delay = {} is below realtime.reconnect_delay = {}",
            rt.max_reconnect_delay, rt.reconnect_delay
        ));
    }
}

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &StandupConfig) {
    require_non_empty(errors, "server.bind", &config.server.bind);
    if config.server.port == 0 {
        errors.push("server.port must not be 0".to_string());
    }
    require_non_empty(errors, "server.public_url", &config.server.public_url);
}

pub(crate) fn validate_gate(errors: &mut Vec<String>, config: &StandupConfig) {
    let gate = &config.gate;
    require_non_empty(errors, "gate.cookie_name", &gate.cookie_name);
    require_non_empty(errors, "gate.password_key", &gate.password_key);
    validate_range(
        errors,
        "gate.min_password_length",
        gate.min_password_length,
        1,
        100,
    );
    validate_range(
        errors,
        "gate.max_password_length",
        gate.max_password_length,
        1,
        1000,
    );
    if gate.max_password_length < gate.min_password_length {
        errors.push(format!(
            "gate.max_password_length = {} is below gate.min_password_length = {}",
            gate.max_password_length, gate.min_password_length
        ));
    }
}

pub(crate) fn validate_room(errors: &mut Vec<String>, config: &StandupConfig) {
    // Placeholder plus a space and a 5-char suffix must still be a valid name.
    let prefix_len = config.room.placeholder_prefix.chars().count() as u32;
    validate_range(errors, "room.placeholder_prefix length", prefix_len, 1, 24);
    validate_range(errors, "room.leave_grace_ms", config.room.leave_grace_ms, 0, 10_000);
    validate_range(
        errors,
        "room.notification_capacity",
        config.room.notification_capacity,
        1,
        64,
    );
}
