//! Log subscriber setup
//!
//! Events go to stderr and, unless disabled, to a log file opened in append
//! mode. Stdout is left to the binary's reports. Both outputs share one
//! [`EnvFilter`]: `RUST_LOG` wins when set, otherwise `info` (or `debug`
//! when verbose).

use crate::error::{Result, SyncError};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default log file name, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "sync_log.txt";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Where and how much to log
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Log file to append to; `None` logs to the console only
    pub log_file: Option<PathBuf>,
    /// Lower the default level to `debug`
    pub verbose: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            verbose: false,
        }
    }
}

impl LogOptions {
    fn default_directive(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Install the global subscriber
///
/// # Errors
///
/// - [`SyncError::IoAt`] if the log file cannot be opened
/// - [`SyncError::Internal`] if a global subscriber is already installed
pub fn init_logging(options: &LogOptions) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_directive()));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()));

    let file = match &options.log_file {
        Some(path) => {
            let handle = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| SyncError::io_at(path, e))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
                    .with_writer(Mutex::new(handle)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| SyncError::internal(format!("failed to install log subscriber: {}", e)))
}
