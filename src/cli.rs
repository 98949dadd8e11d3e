//! CLI definitions for sheetgate.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sheetgate_config::Config;

/// sheetgate CLI.
#[derive(Parser)]
#[command(name = "sheetgate")]
#[command(about = "Read-only spreadsheet automation gateway exposed as MCP tools")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "sheetgate.toml", global = true)]
    pub config: PathBuf,

    /// Spreadsheet page to open
    #[arg(long, env = "SHEETGATE_URL", global = true)]
    pub url: Option<String>,

    /// Run the browser without a window
    #[arg(long, global = true)]
    pub headless: bool,

    /// Chrome remote debugging port
    #[arg(long, global = true)]
    pub debug_port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum Commands {
    /// Open the spreadsheet and serve MCP on stdio (default)
    Serve,

    /// Print the tool definitions as JSON and exit
    Tools,

    /// Validate and print the resolved configuration
    CheckConfig,
}

impl Cli {
    /// Flags beat file values.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.browser.url = url.clone();
        }
        if self.headless {
            config.browser.headless = true;
        }
        if let Some(port) = self.debug_port {
            config.browser.debug_port = port;
        }
    }
}
