//! Tracing setup.
//!
//! Every launch gets its own `mlscope_<timestamp>.log` in the app's `logs`
//! folder next to stdout output. Timestamped names sort chronologically, so
//! pruning keeps the lexically last [`KEEP_LOG_FILES`] files.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{AppDirError, AppDirs};

pub const KEEP_LOG_FILES: usize = 10;
const FILE_PREFIX: &str = "mlscope_";
const FILE_SUFFIX: &str = ".log";
const DEFAULT_FILTER: &str = "info,mlscope=debug";

static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error(transparent)]
    Dirs(#[from] AppDirError),
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log file timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("A global tracing subscriber is already installed: {0}")]
    AlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Log stdout plus a fresh per-launch file. Calling it again is a no-op.
pub fn init() -> Result<(), LoggingError> {
    if FILE_WRITER_GUARD.get().is_some() {
        return Ok(());
    }
    let dir = AppDirs::resolve()?.logs()?;
    let path = create_log_file(&dir, now())?;
    let file = OpenOptions::new()
        .append(true)
        .open(&path)
        .map_err(io_error("open", &path))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    install(Some(writer))?;
    let _ = FILE_WRITER_GUARD.set(guard);

    let removed = prune_logs(&dir, KEEP_LOG_FILES)?;
    tracing::info!(
        "Logging to {} ({removed} old log files removed)",
        path.display()
    );
    Ok(())
}

/// Log to stdout only; the fallback when the log folder is unusable.
pub fn init_stdout_only() -> Result<(), LoggingError> {
    install(None)
}

fn install(file: Option<NonBlocking>) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let timer = local_timer();
    let file_layer = file.map(|writer| {
        fmt::layer()
            .with_ansi(false)
            .with_timer(timer.clone())
            .with_writer(writer)
    });
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_timer(timer).with_writer(std::io::stdout))
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn create_log_file(dir: &Path, started: OffsetDateTime) -> Result<PathBuf, LoggingError> {
    let path = dir.join(log_file_name(started)?);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(io_error("create", &path))?;
    Ok(path)
}

fn log_file_name(started: OffsetDateTime) -> Result<String, LoggingError> {
    const STAMP: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    Ok(format!("{FILE_PREFIX}{}{FILE_SUFFIX}", started.format(STAMP)?))
}

/// Delete all but the newest `keep` mlscope logs. Other files are left alone.
fn prune_logs(dir: &Path, keep: usize) -> Result<usize, LoggingError> {
    let mut logs: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_error("list", dir))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && is_log_file(path))
        .collect();
    if logs.len() <= keep {
        return Ok(0);
    }
    logs.sort();
    let excess = logs.len() - keep;
    for path in &logs[..excess] {
        fs::remove_file(path).map_err(io_error("remove", path))?;
    }
    Ok(excess)
}

fn is_log_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX))
}

fn io_error(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> LoggingError {
    let path = path.to_path_buf();
    move |source| LoggingError::Io {
        action,
        path,
        source,
    }
}

fn local_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY.into())
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
