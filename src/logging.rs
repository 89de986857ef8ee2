//! Tracing setup shared by the server and the CLI.
//!
//! Console output always goes to stderr so summaries printed on stdout stay pipeable. The server
//! additionally keeps a log file: `PATSUM_LOG_FILE` when set, `logs/patsum.log` otherwise.
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_FILE_ENV: &str = "PATSUM_LOG_FILE";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE_NAME: &str = "patsum.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where log events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    /// Stderr only; used by one-shot CLI runs.
    Console,
    /// Stderr plus an append-only log file; used by the long-running server.
    ConsoleAndFile,
}

/// Install the global subscriber. `RUST_LOG` controls filtering (default `info`).
pub fn init_tracing(sink: LogSink) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    let file_layer = match sink {
        LogSink::Console => None,
        LogSink::ConsoleAndFile => file_writer().map(|writer| {
            fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact()
        }),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Split the configured log path into the directory and file name the appender expects.
fn log_file_location(configured: Option<&str>) -> (PathBuf, String) {
    let Some(path) = configured.map(str::trim).filter(|path| !path.is_empty()) else {
        return (
            PathBuf::from(DEFAULT_LOG_DIR),
            DEFAULT_LOG_FILE_NAME.to_string(),
        );
    };
    let path = Path::new(path);
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string());
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (directory, file_name)
}

/// Returns `None` (after reporting on stderr) when the log file cannot be opened.
fn file_writer() -> Option<NonBlocking> {
    let configured = std::env::var(LOG_FILE_ENV).ok();
    let (directory, file_name) = log_file_location(configured.as_deref());
    match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&file_name)
        .build(&directory)
    {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        Err(err) => {
            eprintln!(
                "Failed to open log file {}: {err}",
                directory.join(&file_name).display()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_blank_path_uses_default_location() {
        let expected = (PathBuf::from("logs"), "patsum.log".to_string());
        assert_eq!(log_file_location(None), expected);
        assert_eq!(log_file_location(Some("  ")), expected);
    }

    #[test]
    fn configured_path_is_split_into_directory_and_name() {
        assert_eq!(
            log_file_location(Some("/var/log/patsum/server.log")),
            (PathBuf::from("/var/log/patsum"), "server.log".to_string())
        );
        assert_eq!(
            log_file_location(Some("server.log")),
            (PathBuf::from("."), "server.log".to_string())
        );
    }
}
