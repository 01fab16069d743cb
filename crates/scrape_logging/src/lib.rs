#![deny(missing_docs)]
//! Shared logging utilities for the replies harvester workspace.
//!
//! This crate provides the `scrape_*` logging macros used across the codebase,
//! a thread-local poll tick counter that the collection loop keeps current, and
//! a minimal test initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Number of polling ticks processed by the active run on this thread.
    static POLL_TICK: Cell<u64> = const { Cell::new(0) };
}

/// Records the poll tick count for the current thread.
/// The collection loop calls this once per processed tick and resets it to 0
/// when a new run starts.
pub fn set_poll_tick(tick: u64) {
    POLL_TICK.with(|v| v.set(tick));
}

/// Returns the poll tick count for the current thread, or 0 outside a run.
pub fn poll_tick() -> u64 {
    POLL_TICK.with(|v| v.get())
}

/// Logs a trace-level message prefixed with the current poll tick.
#[macro_export]
macro_rules! scrape_trace {
    ($($arg:tt)*) => {{
        log::trace!("[tick {}] {}", $crate::poll_tick(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message prefixed with the current poll tick.
#[macro_export]
macro_rules! scrape_debug {
    ($($arg:tt)*) => {{
        log::debug!("[tick {}] {}", $crate::poll_tick(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! scrape_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have installed the logger already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::{poll_tick, set_poll_tick};

    #[test]
    fn poll_tick_is_per_thread() {
        set_poll_tick(7);
        assert_eq!(poll_tick(), 7);
        let other = std::thread::spawn(poll_tick).join().unwrap();
        assert_eq!(other, 0);
        set_poll_tick(0);
    }
}
