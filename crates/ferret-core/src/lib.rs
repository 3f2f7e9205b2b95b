pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod task;
pub mod traits;

#[cfg(test)]
mod testutil;

pub use config::FetchConfig;
pub use error::AppError;
pub use models::{FetchMode, FetchRequest, FetchResult, compute_hash};
pub use output::{resolve_output_path, write_html};
pub use task::{FetchTask, TaskBrief, TaskBuilder, ToolCall, ToolSpec, validate_url};
pub use traits::{Agent, DirectAgent, Fetcher};
