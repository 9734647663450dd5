//! Process-wide `tracing` setup for programs embedding the checker.

use crate::Config;
use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber using `config.log_filter`. Binaries embedding the
/// checker call this once at startup, before running any session. The `RUST_LOG` environment
/// variable, when set, takes precedence. Calling this more than once is harmless; only the first
/// call installs a subscriber.
pub fn init(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
