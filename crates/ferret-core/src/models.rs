use std::fmt;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::config::FetchConfig;

/// How a page is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Plain HTTP GET, no script execution.
    Static,
    /// Headless browser, scripts executed before the DOM is read.
    Rendered,
}

impl FetchMode {
    pub fn from_render_flag(render: bool) -> Self {
        if render {
            FetchMode::Rendered
        } else {
            FetchMode::Static
        }
    }

    /// Name of the tool that performs this kind of fetch.
    pub fn tool_name(self) -> &'static str {
        match self {
            FetchMode::Static => "fetch_html",
            FetchMode::Rendered => "fetch_rendered_html",
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMode::Static => f.write_str("static"),
            FetchMode::Rendered => f.write_str("rendered"),
        }
    }
}

/// One invocation's fetch parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub mode: FetchMode,
    pub timeout: Duration,
    pub verify_tls: bool,
    /// Post-load wait; only meaningful for [`FetchMode::Rendered`].
    pub wait: Duration,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, mode: FetchMode, config: &FetchConfig) -> Self {
        Self {
            url: url.into(),
            mode,
            timeout: config.timeout,
            verify_tls: config.verify_tls,
            wait: config.render_wait,
        }
    }
}

/// HTML produced by a fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub html: String,
    pub byte_length: usize,
}

impl FetchResult {
    pub fn new(html: String) -> Self {
        let byte_length = html.len();
        Self { html, byte_length }
    }

    /// SHA-256 of the HTML, as 64-char hex.
    pub fn content_hash(&self) -> String {
        compute_hash(&self.html)
    }
}

/// Compute a SHA-256 hash of a string, returned as 64-char hex.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
