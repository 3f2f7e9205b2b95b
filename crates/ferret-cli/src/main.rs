use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ferret_client::agent::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use ferret_client::{OpenAiAgent, PageSummary, ReqwestFetcher};
use ferret_core::config::FetchConfig;
use ferret_core::models::{FetchMode, FetchRequest};
use ferret_core::output::{resolve_output_path, write_html};
use ferret_core::task::TaskBuilder;
use ferret_core::traits::{Agent, DirectAgent};

#[derive(Parser, Debug)]
#[command(
    name = "ferret",
    version,
    about = "Fetch the HTML of a web page, plain or rendered by a headless browser"
)]
struct Cli {
    /// URL to fetch (http/https)
    url: String,

    /// Output path (defaults to page.html, or page.html.gz with --gzip, in FERRET_OUTPUT_DIR)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Render the page in headless Chromium before reading the HTML
    #[arg(long, default_value_t = false)]
    render: bool,

    /// Gzip-compress the output file
    #[arg(long, default_value_t = false)]
    gzip: bool,

    /// Print a JSON summary of the page (title, headings, links) after the output path
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Debug logging, including agent traffic
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// API key for the OpenAI-compatible agent runtime; without one the task runs directly
    #[arg(long, env = "FERRET_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// LLM model used by the agent runtime
    #[arg(short, long, env = "FERRET_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// OpenAI-compatible API base URL
    #[arg(short, long, env = "FERRET_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

/// What a successful run produced.
struct Outcome {
    path: PathBuf,
    summary: Option<PageSummary>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let directive = if cli.verbose {
        "ferret=debug"
    } else {
        "ferret=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = FetchConfig::from_env().context("Invalid configuration")?;

    let outcome = match cli.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(api_key) => {
            let agent = OpenAiAgent::with_base_url(api_key, &cli.model, &cli.base_url)
                .context("Failed to create agent runtime")?;
            tracing::info!("Delegating task to model {}", cli.model);
            execute(&cli, &config, &agent).await?
        }
        None => {
            tracing::info!("No FERRET_API_KEY set, running task directly");
            execute(&cli, &config, &DirectAgent).await?
        }
    };

    println!("{}", outcome.path.display());
    if let Some(summary) = outcome.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

async fn execute<A: Agent>(cli: &Cli, config: &FetchConfig, agent: &A) -> Result<Outcome> {
    // 1. Build the task around the selected fetcher
    let static_fetcher =
        ReqwestFetcher::from_config(config).context("Failed to create HTTP client")?;
    let builder = TaskBuilder::new(static_fetcher, renderer::rendered_fetcher(config));
    let request = FetchRequest::new(&cli.url, FetchMode::from_render_flag(cli.render), config);
    let task = builder.build(request);

    // 2. Run it
    let result = task
        .run(agent)
        .await
        .with_context(|| format!("Failed to fetch {}", cli.url))?;

    let content_hash = result.content_hash();
    tracing::info!(content_hash = %&content_hash[..8], "Fetch complete");

    // 3. Write it
    let target = resolve_output_path(cli.out.as_deref(), &config.output_dir, cli.gzip);
    let path = write_html(&result.html, &target, cli.gzip)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    tracing::info!(
        "Wrote {} bytes{} to {}",
        result.byte_length,
        if cli.gzip { " (gzip)" } else { "" },
        path.display()
    );

    let summary = cli
        .summary
        .then(|| PageSummary::from_html(&result.html, Some(&cli.url)));

    Ok(Outcome { path, summary })
}

#[cfg(feature = "browser")]
mod renderer {
    use ferret_client::BrowserFetcher;
    use ferret_core::config::FetchConfig;

    pub fn rendered_fetcher(config: &FetchConfig) -> BrowserFetcher {
        BrowserFetcher::from_config(config)
    }
}

#[cfg(not(feature = "browser"))]
mod renderer {
    use ferret_core::config::FetchConfig;
    use ferret_core::error::AppError;
    use ferret_core::models::FetchRequest;
    use ferret_core::traits::Fetcher;

    /// Stand-in used when the binary is built without headless-browser support.
    #[derive(Clone)]
    pub struct NoBrowser;

    impl Fetcher for NoBrowser {
        async fn fetch(&self, _request: &FetchRequest) -> Result<String, AppError> {
            Err(AppError::RenderError(
                "ferret was built without the `browser` feature; rebuild with --features browser"
                    .into(),
            ))
        }
    }

    pub fn rendered_fetcher(_config: &FetchConfig) -> NoBrowser {
        NoBrowser
    }
}
