//! Logging configuration using tracing
//!
//! The terminal belongs to the UI, so everything goes to a daily rolling file.

use std::io;
use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "FLIGHTLIST_LOG";
const LOG_FILENAME: &str = "flightlist.log";

/// Initialize the logging subsystem
///
/// Logs are written to `<local data dir>/flightlist/logs/`.
/// Log level is controlled by the `FLIGHTLIST_LOG` environment variable.
///
/// ```bash
/// FLIGHTLIST_LOG=debug flightlist --from LON
/// ```
pub fn init() -> io::Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILENAME);

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("flightlist=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(io::Error::other)?;

    tracing::info!("flightlist starting, logging to {}", log_dir.display());

    Ok(log_dir)
}

fn log_directory() -> PathBuf {
    let base = dirs_next::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("flightlist").join("logs")
}
