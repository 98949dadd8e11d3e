//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

mod schema_browser;
mod schema_query;

pub use schema_browser::*;
pub use schema_query::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Log directory. Defaults to `~/.sheetgate/logs`.
    #[serde(default)]
    pub dir: Option<String>,

    /// Whether to write the per-call audit trail.
    #[serde(default = "default_true")]
    pub audit: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
            audit: true,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Root data directory (`~/.sheetgate`).
pub fn sheetgate_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".sheetgate"))
        .unwrap_or_else(|| std::path::PathBuf::from(".sheetgate"))
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
