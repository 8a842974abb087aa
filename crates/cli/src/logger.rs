use anyhow::{anyhow, Result};
use mdpages_config::LogConfig;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the log file.
pub const LOG_PATH_ENV: &str = "MDPAGES_LOG_PATH";

/// Log files above this size are removed on startup.
const MAX_LOG_FILE_SIZE: u64 = 8 * 1024 * 1024;

/// Log file in effect, in order of precedence: `--log`, `MDPAGES_LOG_PATH`,
/// then `log.log-file`.
pub fn log_path(cli_log: Option<PathBuf>, log_config: &LogConfig) -> Option<PathBuf> {
    cli_log
        .or_else(|| std::env::var(LOG_PATH_ENV).ok().map(PathBuf::from))
        .or_else(|| log_config.log_file.as_ref().map(PathBuf::from))
}

/// `RUST_LOG` wins over the configured level and targets.
fn env_filter(log_config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = if log_config.log_target.is_empty() {
            log_config.max_level.clone()
        } else {
            format!("{},{}", log_config.max_level, log_config.log_target)
        };
        EnvFilter::new(directives)
    })
}

/// Deletes the log file at `log_path` if it has grown beyond `max_size` bytes.
fn remove_oversized_log(log_path: &Path, max_size: u64) -> std::io::Result<()> {
    if let Ok(metadata) = std::fs::metadata(log_path) {
        if metadata.is_file() && metadata.len() > max_size {
            std::fs::remove_file(log_path)?;
        }
    }
    Ok(())
}

/// Installs the global subscriber.
///
/// Logs go to `log_path` through a non-blocking writer when given, to stderr
/// otherwise. The returned guard flushes the file writer on drop and must be
/// held until the program exits.
pub fn init(log_path: Option<PathBuf>, log_config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let Some(log_path) = log_path else {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(env_filter(log_config))
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(None);
    };

    remove_oversized_log(&log_path, MAX_LOG_FILE_SIZE)?;

    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow!("no file name in {log_path:?}"))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| anyhow!("{log_path:?} has no parent"))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(env_filter(log_config))
        .with_line_number(true)
        .with_writer(non_blocking)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(log_file = %log_path.display(), "Logging initialized");

    Ok(Some(guard))
}
