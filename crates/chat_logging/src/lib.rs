#![deny(missing_docs)]
//! Shared logging utilities for the chat widget workspace.
//!
//! This crate provides the `chat_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line logged
//! through the macros is prefixed with the request context of the current
//! thread, if one is set.

use std::cell::Cell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Thread-local storage for the request currently being handled.
    static REQUEST_CONTEXT: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Sets the request id for the current thread.
/// Pass `None` once the request is finished.
pub fn set_request_context(request: Option<u64>) {
    REQUEST_CONTEXT.with(|v| v.set(request));
}

/// Retrieves the request id for the current thread, if any.
pub fn request_context() -> Option<u64> {
    REQUEST_CONTEXT.with(|v| v.get())
}

/// Runs `f` with `request` as the current thread's request context, then
/// restores whatever context was set before.
///
/// Async code must not hold the context across an `.await`: the task may
/// resume on another worker thread. Wrap the synchronous logging section
/// instead.
pub fn with_request_context<R>(request: u64, f: impl FnOnce() -> R) -> R {
    let previous = REQUEST_CONTEXT.with(|v| v.replace(Some(request)));
    let result = f();
    REQUEST_CONTEXT.with(|v| v.set(previous));
    result
}

/// Renders the prefix the logging macros put in front of every line.
#[doc(hidden)]
pub fn context_prefix() -> String {
    match request_context() {
        Some(request) => format!("[req {request}] "),
        None => String::new(),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! chat_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! chat_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! chat_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! chat_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! chat_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
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
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]);
}
