//! Tracing setup for binaries embedding the database.
//!
//! `RUST_LOG` wins over the configured filter. Logs go to stderr.

use tagdb_config::LoggingConfig;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(config))
        .with_target(config.with_target)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()
}

fn filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let config = tagdb_config::load_defaults().unwrap().logging;
        let _ = init(&config);
        assert!(init(&config).is_err());
    }
}
