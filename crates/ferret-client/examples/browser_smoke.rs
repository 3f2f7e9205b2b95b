/// Smoke-test for `BrowserFetcher`.
///
/// Launches a headless Chromium, renders <https://example.com>, and verifies
/// the HTML contains the expected `<h1>`. The browser is torn down after the
/// fetch, so no Chromium process should survive the run.
///
/// Run with:
///   cargo run -p ferret-client --example browser_smoke --features browser
use std::time::Duration;

use ferret_client::{BrowserFetcher, PageSummary};
use ferret_core::config::FetchConfig;
use ferret_core::models::{FetchMode, FetchRequest};
use ferret_core::traits::Fetcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let fetcher = BrowserFetcher::new();

    let url = "https://example.com";
    let mut request = FetchRequest::new(url, FetchMode::Rendered, &FetchConfig::default());
    request.wait = Duration::from_millis(500);

    println!("Rendering {url} …");
    let html = fetcher.fetch(&request).await?;

    assert!(
        html.contains("<h1>Example Domain</h1>"),
        "Expected <h1> not found in rendered HTML"
    );

    let summary = PageSummary::from_html(&html, Some(url));
    println!("OK, got {} bytes of rendered HTML", html.len());
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
