//! Logging setup
//!
//! Diagnostics go to stderr so stdout stays a clean report stream.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "gpsd={},gpsd_core={},gpsd_watch={}",
            level, level, level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}
