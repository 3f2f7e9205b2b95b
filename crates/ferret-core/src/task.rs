use url::Url;

use crate::error::AppError;
use crate::models::{FetchMode, FetchRequest, FetchResult};
use crate::traits::{Agent, Fetcher};

const EXPECTED_OUTPUT: &str =
    "Return only the HTML as raw text, without comments or any additional formatting.";

/// A tool the agent may invoke. Every tool takes a single `url` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Description of the `url` parameter.
    pub url_description: &'static str,
}

impl ToolSpec {
    pub fn for_mode(mode: FetchMode) -> Self {
        match mode {
            FetchMode::Static => Self {
                name: mode.tool_name(),
                description: "Downloads the raw HTML of a URL with an HTTP GET. \
                    Returns the HTML as text.",
                url_description: "Full URL (http/https) to retrieve.",
            },
            FetchMode::Rendered => Self {
                name: mode.tool_name(),
                description: "Returns the JavaScript-rendered HTML of a URL \
                    using a headless Chromium browser.",
                url_description: "Full URL (http/https) to retrieve with the browser.",
            },
        }
    }
}

/// The agent's decision: which tool to call, and with which URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub name: String,
    pub url: String,
}

/// Natural-language instructions handed to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskBrief {
    pub url: String,
    pub description: String,
    pub expected_output: String,
}

/// Validate that `url` is an absolute http/https URL.
pub fn validate_url(url: &str) -> Result<Url, AppError> {
    let parsed = Url::parse(url).map_err(|e| AppError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::InvalidUrl(format!(
                "URL scheme '{scheme}' is not allowed (only http/https)"
            )));
        }
    }
    if parsed.host_str().is_none() {
        return Err(AppError::InvalidUrl(format!("{url}: URL has no host")));
    }
    Ok(parsed)
}

/// The one fetcher a task was built with.
enum SelectedFetcher<'a, S, R> {
    Static(&'a S),
    Rendered(&'a R),
}

impl<S: Fetcher, R: Fetcher> SelectedFetcher<'_, S, R> {
    fn mode(&self) -> FetchMode {
        match self {
            SelectedFetcher::Static(_) => FetchMode::Static,
            SelectedFetcher::Rendered(_) => FetchMode::Rendered,
        }
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<String, AppError> {
        match self {
            SelectedFetcher::Static(f) => f.fetch(request).await,
            SelectedFetcher::Rendered(f) => f.fetch(request).await,
        }
    }
}

/// Holds both fetchers and packages one of them per request.
///
/// Generic over the fetchers so tests can inject mocks instead of real
/// HTTP clients or browsers.
pub struct TaskBuilder<S, R>
where
    S: Fetcher,
    R: Fetcher,
{
    static_fetcher: S,
    rendered_fetcher: R,
}

impl<S, R> TaskBuilder<S, R>
where
    S: Fetcher,
    R: Fetcher,
{
    pub fn new(static_fetcher: S, rendered_fetcher: R) -> Self {
        Self {
            static_fetcher,
            rendered_fetcher,
        }
    }

    /// Select the fetcher for `request.mode` and wrap it as a task.
    pub fn build(&self, request: FetchRequest) -> FetchTask<'_, S, R> {
        let fetcher = match request.mode {
            FetchMode::Static => SelectedFetcher::Static(&self.static_fetcher),
            FetchMode::Rendered => SelectedFetcher::Rendered(&self.rendered_fetcher),
        };
        FetchTask { request, fetcher }
    }
}

/// A single delegated fetch. Running it yields the fetched HTML.
pub struct FetchTask<'a, S, R> {
    request: FetchRequest,
    fetcher: SelectedFetcher<'a, S, R>,
}

impl<S, R> FetchTask<'_, S, R>
where
    S: Fetcher,
    R: Fetcher,
{
    pub fn request(&self) -> &FetchRequest {
        &self.request
    }

    pub fn mode(&self) -> FetchMode {
        self.fetcher.mode()
    }

    /// The only tool this task offers to its agent.
    pub fn tool(&self) -> ToolSpec {
        ToolSpec::for_mode(self.mode())
    }

    pub fn brief(&self) -> TaskBrief {
        let tool = self.mode().tool_name();
        let instruction = match self.mode() {
            FetchMode::Static => {
                format!("Use the tool '{tool}'. Return ONLY the HTML as raw text.")
            }
            FetchMode::Rendered => format!("Use the tool '{tool}'."),
        };
        TaskBrief {
            url: self.request.url.clone(),
            description: format!(
                "Retrieve the complete HTML of the URL: {}.\n{instruction}",
                self.request.url
            ),
            expected_output: EXPECTED_OUTPUT.to_string(),
        }
    }

    /// Delegate the task to `agent`, execute the tool call it returns, and
    /// hand back the tool's output unchanged.
    pub async fn run<A: Agent>(&self, agent: &A) -> Result<FetchResult, AppError> {
        let target = validate_url(&self.request.url)?;
        let tool = self.tool();
        let brief = self.brief();

        tracing::debug!(tool = tool.name, url = %self.request.url, "Delegating task");
        let call = agent.delegate(&brief, &tool).await?;

        if call.name != tool.name {
            return Err(AppError::AgentError(format!(
                "agent called tool '{}', expected '{}'",
                call.name, tool.name
            )));
        }
        let requested = validate_url(&call.url)?;
        if requested != target {
            return Err(AppError::AgentError(format!(
                "agent requested {}, task is for {}",
                call.url, self.request.url
            )));
        }

        tracing::info!("Fetching {} ({} mode)", self.request.url, self.mode());
        let html = self.fetcher.fetch(&self.request).await?;
        if html.trim().is_empty() {
            return Err(AppError::EmptyDocument(self.request.url.clone()));
        }

        let result = FetchResult::new(html);
        tracing::info!("Fetched {} bytes of HTML", result.byte_length);
        Ok(result)
    }
}
