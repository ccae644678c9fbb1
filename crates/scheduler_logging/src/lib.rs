#![deny(missing_docs)]
//! Shared logging utilities for the scheduler workspace.
//!
//! Every `sched_*` macro forwards to the `log` facade and prefixes the
//! message with the term currently being synchronized, so log lines from
//! consecutive page loads of the same sync can be grepped together.

use std::cell::RefCell;

thread_local! {
    /// Label of the term whose sync is running on this thread, if any.
    static TERM_CONTEXT: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Sets (or clears, with `None`) the term label attached to log lines
/// emitted from the current thread.
pub fn set_term_context(label: Option<&str>) {
    TERM_CONTEXT.with(|ctx| *ctx.borrow_mut() = label.map(str::to_owned));
}

/// Returns the term label attached to the current thread, if any.
pub fn term_context() -> Option<String> {
    TERM_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Prefix used by the logging macros: `"[Spring25] "` or an empty string.
#[doc(hidden)]
pub fn context_prefix() -> String {
    TERM_CONTEXT.with(|ctx| match ctx.borrow().as_deref() {
        Some(label) => format!("[{label}] "),
        None => String::new(),
    })
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! sched_trace {
    ($($arg:tt)*) => {{
        log::trace!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! sched_debug {
    ($($arg:tt)*) => {{
        log::debug!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! sched_info {
    ($($arg:tt)*) => {{
        log::info!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! sched_warn {
    ($($arg:tt)*) => {{
        log::warn!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! sched_error {
    ($($arg:tt)*) => {{
        log::error!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a terminal logger for tests.
///
/// Safe to call from every test: it no-ops once a logger is installed.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
