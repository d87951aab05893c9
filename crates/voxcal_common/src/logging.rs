// --- File: crates/voxcal_common/src/logging.rs ---
//! Logging utilities for the VoxCal application.
//!
//! This module provides a standardized approach to logging across all
//! crates. It configures the tracing subscriber once, at process start.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with the default log level (INFO).
///
/// This function should be called at the start of the application to set up
/// logging. `RUST_LOG` directives still take precedence over the default.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("voxcal={}", level).parse().expect("valid directive"));

    // Use try_init to handle the case where a global default subscriber
    // has already been set (e.g., in tests).
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_file(true).with_line_number(true))
        .with(filter)
        .try_init();
}
