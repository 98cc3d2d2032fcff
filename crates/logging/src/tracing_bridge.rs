//! crates/logging/src/tracing_bridge.rs
//! Mirrors logger records into the `tracing` ecosystem.
//!
//! The [`Logger`](crate::Logger) stays the source of truth for console and
//! log file output. Each record is additionally emitted as a `tracing` event
//! with target `backup`, which lets `RUST_LOG=backup=debug` expose the full
//! record stream on standard error without touching the run's verbosity.

use std::env;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::levels::Level;

/// Environment variable consulted by [`init_tracing`].
const FILTER_ENV: &str = "RUST_LOG";

/// Installs a global `tracing` subscriber writing to standard error.
///
/// Nothing is installed unless `RUST_LOG` is set, so regular runs only
/// produce the logger's own output. Returns `true` when a subscriber was
/// installed by this call; a second call (or a subscriber installed
/// elsewhere) leaves the existing one in place.
pub fn init_tracing() -> bool {
    if env::var_os(FILTER_ENV).is_none() {
        return false;
    }

    let filter = EnvFilter::from_default_env();
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
}

pub(crate) fn emit(level: Level, message: &str) {
    match level {
        Level::Error => tracing::error!(target: "backup", "{message}"),
        Level::Warning => tracing::warn!(target: "backup", "{message}"),
        Level::Info => tracing::info!(target: "backup", "{message}"),
        Level::Debug => tracing::debug!(target: "backup", "{message}"),
    }
}
