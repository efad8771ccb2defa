use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StandupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("remote error: {0}")]
    Remote(String),

    #[error("realtime error: {0}")]
    Realtime(String),

    #[error("gate error: {0}")]
    Gate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("supabase.url is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: supabase.url is empty"
        );
    }

    #[test]
    fn standup_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: StandupError = config_err.into();
        assert!(matches!(err, StandupError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn standup_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: StandupError = io_err.into();
        assert!(matches!(err, StandupError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn standup_error_other_variants() {
        let err = StandupError::Remote("JWT expired".into());
        assert_eq!(err.to_string(), "remote error: JWT expired");

        let err = StandupError::Realtime("socket closed".into());
        assert_eq!(err.to_string(), "realtime error: socket closed");

        let err = StandupError::Gate("invalid password".into());
        assert_eq!(err.to_string(), "gate error: invalid password");
    }
}
