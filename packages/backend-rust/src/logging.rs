use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "lexis";

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("cannot create log directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot open rolling log file: {0}")]
    Appender(#[from] InitError),
}

/// Install the global subscriber: stdout always, plus a daily rolling file
/// under `file_dir` when given. The returned guard flushes the file writer
/// on drop and must outlive the server.
pub fn init_tracing(level: &str, file_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, guard) = match file_dir.map(open_log_file) {
        Some(Ok((writer, guard))) => (Some(writer), Some(guard)),
        Some(Err(err)) => {
            eprintln!("file logging disabled: {err}");
            (None, None)
        }
        None => (None, None),
    };

    let file_layer = writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    guard
}

fn open_log_file(dir: &Path) -> Result<(NonBlocking, WorkerGuard), LogInitError> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(dir)?;
    Ok(tracing_appender::non_blocking(appender))
}
