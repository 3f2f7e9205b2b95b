use ferret_core::config::FetchConfig;
use ferret_core::error::AppError;
use ferret_core::models::FetchRequest;
use ferret_core::task::validate_url;
use ferret_core::traits::Fetcher;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGES: &str = "es-ES,es;q=0.9,en;q=0.8";

/// HTTP fetcher using reqwest.
///
/// Performs a single GET per call with the configured User-Agent. Timeout and
/// TLS policy come from each [`FetchRequest`]. No retries; redirects follow
/// the reqwest default policy.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    /// Same headers, but accepts invalid certificates. Used for requests
    /// with `verify_tls` off, since reqwest fixes TLS policy per client.
    insecure_client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::from_config(&FetchConfig::default())
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self, AppError> {
        Ok(Self {
            client: Self::build_client(config, true)?,
            insecure_client: Self::build_client(config, false)?,
        })
    }

    fn build_client(config: &FetchConfig, verify_tls: bool) -> Result<Client, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGES));

        Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(|e| AppError::NetworkError(format!("Failed to build HTTP client: {e}")))
    }

    fn client_for(&self, request: &FetchRequest) -> &Client {
        if request.verify_tls {
            &self.client
        } else {
            tracing::warn!("TLS certificate verification is disabled");
            &self.insecure_client
        }
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String, AppError> {
        let url = request.url.as_str();
        validate_url(url)?;

        let response = self
            .client_for(request)
            .get(url)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::NetworkError(format!(
                        "Request timed out after {:?}: {e}",
                        request.timeout
                    ))
                } else if e.is_connect() {
                    AppError::NetworkError(format!("Connection failed: {e}"))
                } else {
                    AppError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| AppError::NetworkError(format!("Failed to read response body: {e}")))
    }
}
