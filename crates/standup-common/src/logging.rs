//! Subscriber setup shared by the binaries.

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` plus one extra directive. An unparsable directive falls back
/// to `info`.
pub fn env_filter(directive: &str) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match directive.parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(e) => {
            eprintln!("Ignoring invalid log directive {directive:?}: {e}");
            filter.add_directive(LevelFilter::INFO.into())
        }
    }
}

/// Install the global fmt subscriber on stderr, JSON lines when `json` is set.
pub fn init_logging(directive: &str, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(directive))
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("Logging already initialized: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_is_added() {
        let filter = env_filter("standup_room=debug");
        assert!(filter.to_string().contains("standup_room=debug"));
    }

    #[test]
    fn invalid_directive_falls_back_to_info() {
        let filter = env_filter("standup_room=loud");
        assert!(filter.to_string().contains("info"));
    }
}
