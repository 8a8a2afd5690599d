use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Log filter used when `RUST_LOG` is not set
fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        // Release builds default to INFO to avoid excessive logs.
        "info"
    }
}

/// Initialize logging to stderr, keeping stdout for the rendered view
pub fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter()));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);
    let registry = tracing_subscriber::registry().with(fmt_layer);
    if registry.try_init().is_err() {
        tracing::debug!("Logging was already initialized");
        return;
    }

    tracing::debug!("Logging initialized (default filter: {})", default_filter());
}
