//! `luckymart-scripts` library crate.
//!
//! Shared configuration, logging setup, and report rendering for the
//! operational binaries in `src/bin/`. Re-exported for integration testing.

pub mod config;
pub mod logging;
pub mod report;

/// Exit code for failures before any operation ran (bad arguments or config).
pub const EXIT_STARTUP_FAILURE: i32 = 2;
