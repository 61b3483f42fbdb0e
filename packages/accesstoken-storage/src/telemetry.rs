//! Tracing setup
//!
//! `RUST_LOG` wins over the configured filter when it is set.

use tracing_subscriber::EnvFilter;

use crate::config::StorageConfig;

/// Install a global fmt subscriber. Returns `false` when one was already set.
pub fn init_tracing(config: &StorageConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = StorageConfig::default().with_log_filter("debug");
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
