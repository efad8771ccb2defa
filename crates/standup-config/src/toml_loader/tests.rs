//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_standup_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, standup_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[supabase]
url = "https://abcd.supabase.co"
api_key = "anon"

[server]
port = 8080
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.supabase.url, "https://abcd.supabase.co");
    assert_eq!(config.supabase.api_key, "anon");
    assert_eq!(config.server.port, 8080);
    // Defaults preserved
    assert_eq!(config.supabase.participants_table, "people");
    assert_eq!(config.gate.cookie_name, "is_authenticated");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, standup_common::ConfigError::ParseError(_)));
}

#[test]
fn load_config_with_invalid_values_is_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[realtime]
heartbeat_interval = 1
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.realtime.heartbeat_interval, 1);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("standup").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert!(config.supabase.url.is_empty());
    assert_eq!(config.server.port, 3000);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::StandupConfig;

    let config: StandupConfig = toml::from_str(&default_config_toml()).unwrap();
    assert_eq!(config.room.placeholder_prefix, "John Doe");
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("standup"));
        assert!(path_str.ends_with("config.toml"));
    }
}
