//! Locating and launching Chrome with remote debugging enabled.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use sheetgate_config::BrowserConfig;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::error::GatewayError;

const STARTUP_ATTEMPTS: u32 = 30;
const STARTUP_INTERVAL: Duration = Duration::from_millis(200);

/// Find a Chrome or Chromium executable in the usual install locations.
pub fn find_chrome() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    let paths: &[&str] = &[
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    ];

    #[cfg(target_os = "linux")]
    let paths: &[&str] = &[
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
    ];

    #[cfg(target_os = "windows")]
    let paths: &[&str] = &[
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    ];

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let paths: &[&str] = &[];

    paths.iter().map(PathBuf::from).find(|p| p.exists())
}

/// Whether something answers `/json/version` on the debug endpoint.
pub(crate) async fn is_chrome_running(endpoint: &str) -> bool {
    reqwest::get(format!("{}/json/version", endpoint))
        .await
        .is_ok()
}

/// Build the launch command for `chrome`.
pub(crate) fn chrome_command(
    chrome: &Path,
    config: &BrowserConfig,
    profile_dir: &Path,
    headless: bool,
) -> Command {
    let mut cmd = Command::new(chrome);
    cmd.arg(format!("--remote-debugging-port={}", config.debug_port))
        .arg(format!("--user-data-dir={}", profile_dir.display()))
        .arg(format!(
            "--window-size={},{}",
            config.viewport_width, config.viewport_height
        ))
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--disable-background-networking")
        .arg("--disable-sync")
        .arg("--disable-translate")
        .arg("--metrics-recording-only")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    if headless {
        cmd.arg("--headless=new");
    }
    cmd
}

/// Launch Chrome and wait for its debug endpoint to answer.
pub(crate) async fn launch_chrome(
    config: &BrowserConfig,
    headless: bool,
) -> Result<Child, GatewayError> {
    let chrome = match &config.chrome_path {
        Some(path) => PathBuf::from(path),
        None => find_chrome().ok_or_else(|| {
            GatewayError::LaunchFailed(
                "no Chrome or Chromium executable found; set browser.chrome_path".to_string(),
            )
        })?,
    };

    let profile_dir = config.resolved_profile_dir();
    if let Err(e) = std::fs::create_dir_all(&profile_dir) {
        warn!("Failed to create profile directory: {}", e);
    }

    info!(
        chrome = %chrome.display(),
        profile = %profile_dir.display(),
        headless,
        "Launching Chrome"
    );

    let mut child = chrome_command(&chrome, config, &profile_dir, headless)
        .spawn()
        .map_err(|e| GatewayError::LaunchFailed(format!("{}: {}", chrome.display(), e)))?;

    debug!("Chrome launched with PID: {:?}", child.id());

    let endpoint = config.endpoint();
    for _ in 0..STARTUP_ATTEMPTS {
        tokio::time::sleep(STARTUP_INTERVAL).await;
        if is_chrome_running(&endpoint).await {
            return Ok(child);
        }
        if let Ok(Some(status)) = child.try_wait() {
            return Err(GatewayError::LaunchFailed(format!(
                "Chrome exited during startup ({})",
                status
            )));
        }
    }

    let _ = child.kill().await;
    Err(GatewayError::LaunchFailed(format!(
        "Chrome did not open {} in time",
        endpoint
    )))
}
