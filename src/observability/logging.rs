//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, overridable via `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level when set

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default filter directives for a log level.
pub fn default_directives(level: &str) -> String {
    format!("vhost={level},tower_http={level}")
}

/// Install the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(&config.log_level).into());

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if let Err(e) = result {
        tracing::warn!(error = %e, "Logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives("debug"), "vhost=debug,tower_http=debug");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let config = ObservabilityConfig::default();
        init_logging(&config);
        init_logging(&config);
    }
}
