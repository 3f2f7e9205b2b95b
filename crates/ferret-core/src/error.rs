use thiserror::Error;

/// Application-wide error types for Ferret.
#[derive(Error, Debug)]
pub enum AppError {
    /// Connection, TLS, or timeout failure while talking to a server.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Headless browser launch, navigation, or extraction failed.
    #[error("Render error: {0}")]
    RenderError(String),

    /// Writing the output file failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The URL is malformed or uses a scheme other than http/https.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The fetch succeeded but produced no HTML.
    #[error("Empty document returned for {0}")]
    EmptyDocument(String),

    /// The agent runtime did not produce a usable tool call.
    #[error("Agent error: {0}")]
    AgentError(String),

    /// LLM API call failed.
    #[error("LLM error (HTTP {status_code}): {message}")]
    LlmError { message: String, status_code: u16 },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AppError {
    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::HttpStatus { status, .. } => Some(*status),
            AppError::LlmError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
