//! Logging setup. Library code only emits `tracing` events; binaries call [init_logging] once.

use tracing_subscriber::EnvFilter;

/// Installs a stderr log subscriber. `RUST_LOG` takes precedence over `filter` when set. Calling
/// this more than once is harmless; later calls keep the first subscriber.
pub fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
