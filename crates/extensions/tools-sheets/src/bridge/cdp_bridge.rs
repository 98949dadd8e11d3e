//! [`SheetPage`] over a real Chrome instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use sheetgate_config::BrowserConfig;
use tokio::process::Child;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::launcher::{is_chrome_running, launch_chrome};
use super::{build_expression, readiness_check, SheetPage};
use crate::cdp::{CdpClient, PageSession};
use crate::error::GatewayError;

/// Resources owned by a started session. Each is optional so a failed
/// `start` can release exactly what it managed to create.
#[derive(Default)]
struct LiveSession {
    /// Set only when this bridge launched Chrome.
    chrome: Option<Child>,
    client: Option<CdpClient>,
    page: Option<PageSession>,
}

impl LiveSession {
    fn page(&self) -> Result<&PageSession, GatewayError> {
        self.page.as_ref().ok_or(GatewayError::BrowserNotStarted)
    }

    async fn teardown(&mut self) {
        if let (Some(client), Some(page)) = (&self.client, self.page.take()) {
            if let Err(e) = client.close_page(page.target_id()).await {
                debug!("Closing page failed: {}", e);
            }
        }
        if let Some(client) = self.client.take() {
            client.disconnect().await;
        }
        if let Some(mut chrome) = self.chrome.take() {
            info!("Shutting down Chrome...");
            if let Err(e) = chrome.kill().await {
                warn!("Failed to stop Chrome: {}", e);
            }
        }
    }
}

/// Drives the spreadsheet page through the Chrome DevTools Protocol.
///
/// The session sits behind one tokio mutex. Every page command takes it,
/// so at most one command is in flight and waiters are served in arrival
/// order.
pub struct CdpPageBridge {
    config: BrowserConfig,
    session: Mutex<Option<LiveSession>>,
    started: AtomicBool,
}

impl CdpPageBridge {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
            started: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    async fn open(&self, live: &mut LiveSession, url: &str, headless: bool) -> Result<(), GatewayError> {
        url::Url::parse(url)
            .map_err(|e| GatewayError::InvalidArguments(format!("invalid url '{}': {}", url, e)))?;

        let endpoint = self.config.endpoint();
        if is_chrome_running(&endpoint).await {
            info!("Chrome already running on port {}", self.config.debug_port);
        } else {
            info!("Chrome not running on port {}, launching...", self.config.debug_port);
            live.chrome = Some(launch_chrome(&self.config, headless).await?);
        }

        let timeout = Duration::from_millis(self.config.command_timeout_ms);
        let client = live.client.insert(CdpClient::connect(&endpoint, timeout).await?);
        info!("Connected to Chrome at {}", endpoint);

        let page = client.new_page(url).await?;
        page.set_viewport(self.config.viewport_width, self.config.viewport_height)
            .await?;
        let page = live.page.insert(page);

        self.wait_until_ready(page).await
    }

    /// Poll until the document has loaded and the API global exists.
    async fn wait_until_ready(&self, page: &PageSession) -> Result<(), GatewayError> {
        let budget = Duration::from_millis(self.config.ready_timeout_ms);
        let interval = Duration::from_millis(self.config.ready_poll_interval_ms);
        let check = readiness_check(&self.config.api_global);
        let deadline = Instant::now() + budget;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match page.evaluate_within(&check, remaining).await {
                Ok(Value::Bool(true)) => return Ok(()),
                Ok(_) => {}
                // The execution context is replaced while the page navigates.
                Err(e) => debug!("Readiness check failed: {}", e),
            }

            if Instant::now() + interval >= deadline {
                return Err(GatewayError::ConnectionTimeout {
                    global: self.config.api_global.clone(),
                    timeout_ms: self.config.ready_timeout_ms,
                });
            }
            tokio::time::sleep(interval).await;
        }
    }
}

#[async_trait]
impl SheetPage for CdpPageBridge {
    async fn start(&self, url: &str, headless: bool) -> Result<(), GatewayError> {
        let mut guard = self.session.lock().await;
        if guard.is_some() {
            return Err(GatewayError::SessionAlreadyStarted);
        }

        info!(url, headless, "Starting browser session");
        let started_at = Instant::now();
        let mut live = LiveSession::default();

        if let Err(e) = self.open(&mut live, url, headless).await {
            warn!("Browser session failed to start: {}", e);
            live.teardown().await;
            return Err(e);
        }

        *guard = Some(live);
        self.started.store(true, Ordering::SeqCst);
        info!(
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "Page API '{}' is ready", self.config.api_global
        );
        Ok(())
    }

    async fn evaluate(&self, function: &str, args: Vec<Value>) -> Result<Value, GatewayError> {
        let guard = self.session.lock().await;
        let page = guard.as_ref().ok_or(GatewayError::BrowserNotStarted)?.page()?;

        let expression = build_expression(&self.config.api_global, function, &args);
        Ok(page.evaluate(&expression).await?)
    }

    async fn screenshot(&self) -> Result<String, GatewayError> {
        let guard = self.session.lock().await;
        let page = guard.as_ref().ok_or(GatewayError::BrowserNotStarted)?.page()?;
        Ok(page.screenshot().await?)
    }

    async fn cleanup(&self) -> Result<(), GatewayError> {
        let mut guard = self.session.lock().await;
        self.started.store(false, Ordering::SeqCst);
        if let Some(mut live) = guard.take() {
            live.teardown().await;
            info!("Browser session closed");
        }
        Ok(())
    }

    fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}
