use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RENDER_WAIT_MS: u64 = 1500;
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Settings shared by both fetchers and the output writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Request timeout for static fetches, navigation timeout for rendered ones.
    pub timeout: Duration,
    pub verify_tls: bool,
    /// Fixed delay after page load before the rendered DOM is read.
    pub render_wait: Duration,
    pub output_dir: PathBuf,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_tls: true,
            render_wait: Duration::from_millis(DEFAULT_RENDER_WAIT_MS),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Read configuration from environment variables.
    ///
    /// - `FERRET_HTTP_TIMEOUT_S` (optional, defaults to 30, must be at least 1)
    /// - `FERRET_VERIFY_TLS` (optional, defaults to true)
    /// - `FERRET_RENDERED_WAIT_MS` (optional, defaults to 1500)
    /// - `FERRET_OUTPUT_DIR` (optional, defaults to `outputs`)
    /// - `FERRET_USER_AGENT` (optional, defaults to a desktop Chrome UA)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout = match lookup("FERRET_HTTP_TIMEOUT_S") {
            None => defaults.timeout,
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::ConfigError(format!(
                        "Invalid FERRET_HTTP_TIMEOUT_S '{raw}': must be a positive integer"
                    ))
                })?;
                if secs == 0 {
                    return Err(AppError::ConfigError(
                        "FERRET_HTTP_TIMEOUT_S must be at least 1".into(),
                    ));
                }
                Duration::from_secs(secs)
            }
        };

        let verify_tls = match lookup("FERRET_VERIFY_TLS") {
            None => defaults.verify_tls,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::ConfigError(format!(
                    "Invalid FERRET_VERIFY_TLS '{raw}': expected true/false"
                ))
            })?,
        };

        let render_wait = match lookup("FERRET_RENDERED_WAIT_MS") {
            None => defaults.render_wait,
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|_| {
                    AppError::ConfigError(format!(
                        "Invalid FERRET_RENDERED_WAIT_MS '{raw}': must be a non-negative integer"
                    ))
                })?;
                Duration::from_millis(ms)
            }
        };

        let output_dir = lookup("FERRET_OUTPUT_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let user_agent = lookup("FERRET_USER_AGENT")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.user_agent);

        Ok(Self {
            timeout,
            verify_tls,
            render_wait,
            output_dir,
            user_agent,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
