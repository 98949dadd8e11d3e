//! Tracing setup: stderr console, daily rolling text log and the audit trail.

use std::path::{Path, PathBuf};

use sheetgate_config::{sheetgate_dir, ConfigLoader, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Tracing target carrying one event per tool call.
pub(crate) const AUDIT_TARGET: &str = "audit";

/// Resolve the log directory, defaulting to `~/.sheetgate/logs`.
pub(crate) fn log_dir(config: &LoggingConfig) -> PathBuf {
    match &config.dir {
        Some(dir) => PathBuf::from(ConfigLoader::expand_path(dir)),
        None => sheetgate_dir().join("logs"),
    }
}

fn rolling(dir: &Path, prefix: &str) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(30)
        .build(dir)?;
    Ok(appender)
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber. The returned guards flush the file
/// writers on drop and must live until exit.
pub(crate) fn init_tracing(
    config: &LoggingConfig,
) -> Result<Vec<WorkerGuard>, Box<dyn std::error::Error>> {
    let dir = log_dir(config);
    std::fs::create_dir_all(&dir)?;

    let mut guards = Vec::new();

    let (file_writer, guard) = tracing_appender::non_blocking(rolling(&dir, "sheetgate")?);
    guards.push(guard);

    let audit_layer = if config.audit {
        let (audit_writer, guard) = tracing_appender::non_blocking(rolling(&dir, AUDIT_TARGET)?);
        guards.push(guard);
        Some(
            fmt::layer()
                .json()
                .with_writer(audit_writer)
                .with_ansi(false)
                // spans pass so audit records carry the tool_call fields
                .with_filter(filter_fn(|meta| meta.is_span() || meta.target() == AUDIT_TARGET)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        // stdout carries the protocol
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false)
                .with_filter(env_filter(&config.level)),
        )
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(env_filter(&config.level)),
        )
        .with(audit_layer)
        .try_init()?;

    Ok(guards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_default() {
        let dir = log_dir(&LoggingConfig::default());
        assert!(dir.ends_with(".sheetgate/logs"));
    }

    #[test]
    fn test_log_dir_configured() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            dir: Some(tmp.path().display().to_string()),
            ..Default::default()
        };
        assert_eq!(log_dir(&config), tmp.path());
    }

    #[test]
    fn test_rolling_creates_appender_in_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(rolling(tmp.path(), "sheetgate").is_ok());
    }
}
