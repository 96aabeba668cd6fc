//! tracing subscriber bootstrap

use std::str::FromStr;
use tracing::Level as TraceLevel;

use crate::{PlogError, Result, TracingConfig};

/// Install a fmt subscriber at the configured max level.
///
/// A subscriber that is already installed is left in place.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let level = TraceLevel::from_str(&config.level)
        .map_err(|_| PlogError::Configuration(format!("unknown tracing level {:?}", config.level)))?;

    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(level = %level, "tracing initialized");
    }
    Ok(())
}
