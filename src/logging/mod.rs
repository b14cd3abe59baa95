//! This module contains the logging infrastructure for the application.
//!
//! The server logs to the console. The dashboard owns the terminal, so it
//! collects its events into a `DiagnosticBuffer` and shows them in the
//! status line.
pub mod buffer;
pub mod collector;

pub use buffer::DiagnosticBuffer;
pub use collector::DashboardLogCollector;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "info,looplog=debug";

pub(crate) fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Installs a console subscriber for `looplog serve`.
pub fn init_console_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_target(true)
        .init();
}
