//! Development tracing for the `moot` CLI.
//!
//! Reads `RUST_LOG`; defaults to `warn`. Output goes to stderr in compact
//! form so stdout stays reserved for command output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber.
///
/// ```bash
/// RUST_LOG=moot=debug moot submit --exercise 2 --video argument.mp4 --description "..."
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
