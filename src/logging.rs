//! Tracing setup.
//!
//! The explorer owns the terminal, so it logs to a file through a
//! non-blocking appender. The one-shot commands log to stderr.

use std::path::{Path, PathBuf};

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{AppError, Result};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "HX_LOG";
const DEFAULT_FILTER: &str = "info";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// `configured` if set, otherwise `<cache dir>/haiku-explorer/hx.log`.
pub fn log_path(configured: Option<PathBuf>) -> PathBuf {
    configured.unwrap_or_else(|| {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("haiku-explorer")
            .join("hx.log")
    })
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::InvalidPath(format!("log file {}", path.display())))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(file_name)))
}

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered file output is flushed.
pub fn init(target: LogTarget) -> Result<Option<WorkerGuard>> {
    match target {
        LogTarget::File(path) => {
            let (dir, file_name) = split_log_path(&path)?;
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::never(&dir, &file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            // A subscriber may already be installed (tests); keep that one.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter())
                .try_init();
            info!(path = %path.display(), "Logging to file");
            Ok(Some(guard))
        }
        LogTarget::Stderr => {
            let _ = tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .without_time()
                        .with_target(false),
                )
                .with(filter())
                .try_init();
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_path_wins() {
        let path = PathBuf::from("/var/log/hx.log");
        assert_eq!(log_path(Some(path.clone())), path);
    }

    #[test]
    fn default_path_lives_under_app_dir() {
        let path = log_path(None);
        assert!(path.ends_with("haiku-explorer/hx.log"));
    }

    #[test]
    fn split_handles_bare_file_names() {
        let (dir, name) = split_log_path(Path::new("hx.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, PathBuf::from("hx.log"));

        let (dir, name) = split_log_path(Path::new("/tmp/logs/hx.log")).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/logs"));
        assert_eq!(name, PathBuf::from("hx.log"));
    }

    #[test]
    fn split_rejects_directory_like_paths() {
        assert!(matches!(
            split_log_path(Path::new("/")),
            Err(AppError::InvalidPath(_))
        ));
    }

    #[test]
    fn file_target_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("hx.log");
        let guard = init(LogTarget::File(path.clone())).unwrap();
        assert!(guard.is_some());
        assert!(path.parent().unwrap().is_dir());
    }
}
