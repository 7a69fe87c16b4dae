//! Console logging setup.
//!
//! Installs a `tracing-subscriber` fmt subscriber writing
//! `timestamp - target - level - message` style lines to the console.
//! Initialization is process-wide and happens once; embedders that already
//! installed a subscriber should skip this or use [`try_init`].

use crate::core::{Result, SqliteKitError};
use tracing::Level;

/// Installs the console subscriber, panicking if one is already set.
pub fn init() {
    tracing_subscriber::fmt::init();
}

/// Installs the console subscriber, returning an error instead of panicking
/// if one is already set.
pub fn try_init() -> Result<()> {
    tracing_subscriber::fmt::try_init()
        .map_err(|e| SqliteKitError::Config(format!("failed to install subscriber: {}", e)))
}

/// Installs the console subscriber with an explicit maximum level.
pub fn init_with_level(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}
