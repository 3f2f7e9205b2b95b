use std::future::Future;

use crate::error::AppError;
use crate::models::FetchRequest;
use crate::task::{TaskBrief, ToolCall, ToolSpec};

/// Fetches raw HTML content for a request.
///
/// Implementations honour the request's timeout, TLS verification and, where
/// it applies, post-load wait, rather than settings fixed at construction.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Runtime that a task is delegated to.
///
/// Given the task's instructions and the single tool it may use, the agent
/// decides how to invoke that tool. The task executes the call itself and
/// returns the tool's output verbatim, so an agent never touches the HTML.
pub trait Agent: Send + Sync + Clone {
    fn delegate(
        &self,
        brief: &TaskBrief,
        tool: &ToolSpec,
    ) -> impl Future<Output = Result<ToolCall, AppError>> + Send;
}

/// An agent that calls the offered tool with the brief's URL, no LLM involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectAgent;

impl Agent for DirectAgent {
    async fn delegate(&self, brief: &TaskBrief, tool: &ToolSpec) -> Result<ToolCall, AppError> {
        Ok(ToolCall {
            name: tool.name.to_string(),
            url: brief.url.clone(),
        })
    }
}
