//! Logging infrastructure for youtube-to-m4a.
//!
//! This module provides:
//! - A per-video `JobLogger` for the user-facing progress lines
//! - Compact mode with progress filtering
//! - Tail buffer of tool output for error diagnosis
//! - Integration with the `tracing` ecosystem for diagnostics
//!
//! # Example
//!
//! ```no_run
//! use ytm4a_core::logging::{JobLogger, LogConfig};
//!
//! let logger = JobLogger::new(
//!     "dQw4w9WgXcQ",
//!     None,
//!     LogConfig::default(),
//!     Some(Box::new(|line| println!("{}", line))),
//! ).unwrap();
//!
//! logger.info("Thumbnail 'dQw4w9WgXcQ.jpg' cropped.");
//! logger.command("yt-dlp https://youtu.be/dQw4w9WgXcQ -x");
//! logger.success("Pipeline completed");
//! ```

mod job_logger;
mod types;

pub use job_logger::JobLogger;
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for diagnostics.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .with(filter)
        .init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_to_filter_works() {
        assert_eq!(level_to_filter_str(LogLevel::Debug), "debug");
        assert_eq!(level_to_filter_str(LogLevel::Info), "info");
    }
}
