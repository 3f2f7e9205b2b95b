use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig};
use ferret_core::config::FetchConfig;
use ferret_core::error::AppError;
use ferret_core::models::FetchRequest;
use ferret_core::task::validate_url;
use ferret_core::traits::Fetcher;
use futures::StreamExt;
use tokio::task::JoinHandle;

/// Headless-browser fetcher using Chromium via the Chrome DevTools Protocol.
///
/// Unlike [`super::ReqwestFetcher`], this executes page scripts before
/// returning the HTML, making it suitable for SPAs and pages that build
/// their content client-side.
///
/// Each [`Fetcher::fetch`] call launches its own Chromium process, navigates
/// within the request's timeout, waits the request's fixed delay for scripts
/// to settle, reads the rendered DOM, and shuts the browser down again. The
/// shutdown runs whether or not the navigation succeeded.
///
/// # Example
///
/// ```rust,no_run
/// use ferret_client::BrowserFetcher;
/// use ferret_core::config::FetchConfig;
/// use ferret_core::models::{FetchMode, FetchRequest};
/// use ferret_core::traits::Fetcher;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = BrowserFetcher::new();
/// let request = FetchRequest::new(
///     "https://example.com",
///     FetchMode::Rendered,
///     &FetchConfig::default(),
/// );
/// let html = fetcher.fetch(&request).await?;
/// println!("{}", &html[..200]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    user_agent: String,
}

impl Default for BrowserFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserFetcher {
    pub fn new() -> Self {
        Self::from_config(&FetchConfig::default())
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
        }
    }

    async fn launch(&self, verify_tls: bool) -> Result<(Browser, JoinHandle<()>), AppError> {
        let mut builder = BrowserConfig::builder();
        builder = builder.no_sandbox().disable_default_args();

        // Snap-packaged Chromium exposes a wrapper that rejects standard
        // Chrome CLI flags (--headless, --disable-gpu, …), so prefer the
        // real binary when one can be found.
        if let Some(bin) = Self::find_chrome_binary() {
            tracing::info!("Using Chrome binary: {}", bin.display());
            builder = builder.chrome_executable(bin);
        }

        builder = builder
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--disable-translate")
            .arg("--no-first-run")
            .arg(format!("--user-agent={}", self.user_agent));
        if !verify_tls {
            builder = builder.arg("--ignore-certificate-errors");
        }

        let config = builder
            .build()
            .map_err(|e| AppError::RenderError(format!("Browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::RenderError(format!("Failed to launch browser: {e}")))?;

        // The CDP handler must be polled continuously for the connection to work.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::warn!("Browser CDP handler error: {event:?}");
                    break;
                }
            }
        });

        Ok((browser, handler_task))
    }

    /// Navigate, wait, and read the DOM. Does not release the browser.
    async fn render(browser: &Browser, request: &FetchRequest) -> Result<String, AppError> {
        let url = request.url.as_str();
        let page = tokio::time::timeout(request.timeout, browser.new_page(url))
            .await
            .map_err(|_| navigation_timed_out(url, request.timeout))?
            .map_err(|e| AppError::RenderError(format!("Failed to navigate to {url}: {e}")))?;

        if !request.wait.is_zero() {
            tracing::debug!("Waiting {} ms for scripts to settle", request.wait.as_millis());
            tokio::time::sleep(request.wait).await;
        }

        let html = page
            .content()
            .await
            .map_err(|e| AppError::RenderError(format!("Failed to read page content: {e}")));

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close tab: {e}");
        }

        html
    }

    /// Shut the browser down and stop its handler task.
    async fn release(mut browser: Browser, handler_task: JoinHandle<()>) {
        if let Err(e) = browser.close().await {
            tracing::warn!("Failed to close browser: {e}");
        }
        if let Err(e) = browser.wait().await {
            tracing::warn!("Failed to reap browser process: {e}");
        }
        handler_task.abort();
    }

    /// Tries to locate the real Chrome/Chromium binary.
    ///
    /// Honours `CHROME_BIN` first, then well-known system paths. If nothing
    /// is found we return `None` and let `chromiumoxide` do its own lookup.
    fn find_chrome_binary() -> Option<PathBuf> {
        let candidates: &[&str] = &[
            // Snap (Ubuntu default)
            "/snap/chromium/current/usr/lib/chromium-browser/chrome",
            // Flatpak
            "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
            // Common apt / manual installs
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ];

        if let Ok(p) = std::env::var("CHROME_BIN") {
            let path = PathBuf::from(&p);
            if path.exists() {
                return Some(path);
            }
        }

        candidates
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }
}

fn navigation_timed_out(url: &str, timeout: Duration) -> AppError {
    AppError::RenderError(format!("Navigation to {url} timed out after {timeout:?}"))
}

impl Fetcher for BrowserFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String, AppError> {
        validate_url(&request.url)?;

        let (browser, handler_task) = self.launch(request.verify_tls).await?;
        let outcome = Self::render(&browser, request).await;
        Self::release(browser, handler_task).await;

        outcome
    }
}
