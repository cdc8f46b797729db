#![deny(missing_docs)]
//! Shared logging utilities for the taskview workspace.
//!
//! This crate provides the `view_*` logging macros used across the codebase,
//! a per-thread reconciliation pass counter, and a minimal test initializer
//! for the global logger.

use std::cell::Cell;

thread_local! {
    /// Thread-local count of reconciliation passes run on this thread.
    static PASS_TICK: Cell<u64> = const { Cell::new(0) };
}

/// Advances the reconciliation pass counter for the current thread and
/// returns the new value. Called once per pass by the owning thread.
pub fn next_pass_tick() -> u64 {
    PASS_TICK.with(|v| {
        let next = v.get() + 1;
        v.set(next);
        next
    })
}

/// Retrieves the reconciliation pass counter for the current thread.
/// Returns 0 if no pass has run yet.
pub fn get_pass_tick() -> u64 {
    PASS_TICK.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! view_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! view_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! view_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! view_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! view_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
