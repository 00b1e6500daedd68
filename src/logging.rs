//! Logging init: timestamped lines on stdout.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stdout. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();
}
