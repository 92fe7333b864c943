//! Logging for blunderbook
//!
//! Logs go to `~/.local/state/blunderbook/blunderbook.log.<date>` (XDG state
//! dir), never to stdout, so CLI output and JSON exports stay clean.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose events the configured level applies to. Everything else
/// stays at `warn`.
const OWN_TARGETS: [&str; 2] = ["blunderbook", "blunderbook_core"];

/// Filter directive for a configured level, e.g. `"debug"` becomes
/// `warn,blunderbook=debug,blunderbook_core=debug`.
fn filter_directive(level: &str) -> String {
    let mut directive = String::from("warn");
    for target in OWN_TARGETS {
        directive.push_str(&format!(",{}={}", target, level));
    }
    directive
}

/// Install the file subscriber. `RUST_LOG` overrides the configured level.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes pending writes.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("blunderbook.log")
        .max_log_files(config.max_files.max(1))
        .build(&log_dir)
        .map_err(|e| Error::Config(format!("failed to create log file appender: {}", e)))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(&config.level)))
        .map_err(|e| Error::Config(format!("invalid log level '{}': {}", config.level, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Keeps the non-blocking log writer alive.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}
