//! Console logging setup.

use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr. `RUST_LOG` takes precedence over `verbose`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wavewall={},warn", default_level)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr) // Use stderr for logs, stdout for CLI output
        .with_target(false);

    // A second init (e.g. from tests) is harmless
    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
    {
        eprintln!("Warning: logging already initialized: {}", e);
    }
}
