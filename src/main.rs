//! sheetgate - read-only spreadsheet automation gateway
//!
//! Main entry point: loads configuration, opens the spreadsheet page in a
//! browser session and serves the sheet tools over MCP on stdio.

mod cli;
mod logging;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use sheetgate_config::{Config, ConfigLoader, ConfigValidator, ValidationResult};
use sheetgate_mcp_server::{McpServer, StdioTransport, ToolRegistry};
use sheetgate_tools_sheets::{sheet_tools, CdpPageBridge, SheetPage, SheetQueryService};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_or_default(&cli.config)?;
    cli.apply_overrides(&mut config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let _guards = logging::init_tracing(&config.logging)?;
            serve(config).await
        }
        Commands::Tools => print_tools(config),
        Commands::CheckConfig => check_config(&cli.config, &config),
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let validation = ConfigValidator::validate(&config);
    log_validation(&validation);
    if !validation.is_valid() {
        return Err(format!(
            "invalid configuration: {} error(s)",
            validation.errors.len()
        )
        .into());
    }

    let bridge = Arc::new(CdpPageBridge::new(config.browser.clone()));
    info!(
        url = %config.browser.url,
        headless = config.browser.headless,
        debug_port = config.browser.debug_port,
        "Opening spreadsheet"
    );
    bridge
        .start(&config.browser.url, config.browser.headless)
        .await?;

    let service = Arc::new(SheetQueryService::new(bridge.clone(), config.query.clone()));
    let registry = ToolRegistry::new();
    registry.register_all(sheet_tools(service))?;

    let server = McpServer::new(registry);
    let mut transport = StdioTransport::stdio();
    let outcome = server.run_until(&mut transport, shutdown_signal()).await;

    info!("Closing browser session");
    if let Err(e) = bridge.cleanup().await {
        warn!("Cleanup failed: {}", e);
    }

    outcome?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}

fn log_validation(validation: &ValidationResult) {
    for warning in &validation.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    for err in &validation.errors {
        error!(path = %err.path, "{}", err.message);
    }
}

/// Tool definitions only need the service wiring, not a running browser.
fn print_tools(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let bridge = Arc::new(CdpPageBridge::new(config.browser));
    let service = Arc::new(SheetQueryService::new(bridge, config.query));
    let tools: Vec<serde_json::Value> = sheet_tools(service)
        .iter()
        .map(|tool| tool.definition().to_mcp_tool())
        .collect();
    println!("{}", serde_json::to_string_pretty(&tools)?);
    Ok(())
}

fn check_config(path: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        println!("# config: {}", path.display());
    } else {
        println!("# config: {} (not found, using defaults)", path.display());
    }
    println!("{}", serde_json::to_string_pretty(config)?);

    let validation = ConfigValidator::validate(config);
    for warning in &validation.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for err in &validation.errors {
        println!("error: {}: {}", err.path, err.message);
    }

    if validation.is_valid() {
        println!("Configuration is valid");
        Ok(())
    } else {
        Err(format!("{} validation error(s)", validation.errors.len()).into())
    }
}
