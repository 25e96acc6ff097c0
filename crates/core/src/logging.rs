//! Tracing setup shared by the binaries.
//!
//! Logs always go to a daily-rolling file; stderr mirroring is optional.
//! `RUST_LOG` overrides the default level.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable that overrides the log directory.
pub const LOG_DIR_ENV: &str = "ARCHVIEW_LOG_DIR";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// File name prefix, e.g. `cli` for `cli.2024-01-21`.
    pub component: String,
    pub to_stderr: bool,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
    pub dir: PathBuf,
}

impl LoggingConfig {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            to_stderr: false,
            default_filter: "info".to_string(),
            dir: default_log_dir(),
        }
    }

    pub fn with_stderr(mut self, to_stderr: bool) -> Self {
        self.to_stderr = to_stderr;
        self
    }

    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }
}

/// `$ARCHVIEW_LOG_DIR`, falling back to `~/.archview/logs`.
pub fn default_log_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".archview")
        .join("logs")
}

/// Install the global subscriber. Keep the returned guard alive for the
/// life of the process, or buffered file output is lost.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let _ = std::fs::create_dir_all(&config.dir);

    let file_appender = tracing_appender::rolling::daily(&config.dir, &config.component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let stderr_layer = config.to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    // A subscriber may already be installed (tests, embedding hosts).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    guard
}
