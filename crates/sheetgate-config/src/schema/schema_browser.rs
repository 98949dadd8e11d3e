//! Browser session configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Browser session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Spreadsheet page to open.
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub headless: bool,

    /// Chrome remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Explicit Chrome binary; auto-detected when unset.
    #[serde(default)]
    pub chrome_path: Option<String>,

    /// Profile directory. Defaults to `~/.sheetgate/browser-profile`.
    #[serde(default)]
    pub profile_dir: Option<String>,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Page-global object exposing the spreadsheet facade.
    #[serde(default = "default_api_global")]
    pub api_global: String,

    /// Polling budget for the facade to appear after navigation.
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,

    #[serde(default = "default_ready_poll_interval_ms")]
    pub ready_poll_interval_ms: u64,

    /// Upper bound for a single CDP command round trip.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            headless: false,
            debug_port: default_debug_port(),
            chrome_path: None,
            profile_dir: None,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            api_global: default_api_global(),
            ready_timeout_ms: default_ready_timeout_ms(),
            ready_poll_interval_ms: default_ready_poll_interval_ms(),
            command_timeout_ms: default_command_timeout_ms(),
        }
    }
}

impl BrowserConfig {
    /// Get the profile directory, falling back to the default location.
    pub fn resolved_profile_dir(&self) -> PathBuf {
        match &self.profile_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).to_string()),
            None => super::sheetgate_dir().join("browser-profile"),
        }
    }

    /// Get the CDP HTTP endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }
}

fn default_url() -> String {
    "http://localhost:3002/sheets/".to_string()
}

fn default_debug_port() -> u16 {
    9222
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    720
}

fn default_api_global() -> String {
    "univerAPI".to_string()
}

fn default_ready_timeout_ms() -> u64 {
    30_000
}

fn default_ready_poll_interval_ms() -> u64 {
    100
}

fn default_command_timeout_ms() -> u64 {
    30_000
}
