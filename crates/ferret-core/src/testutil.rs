//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::FetchRequest;
use crate::task::{TaskBrief, ToolCall, ToolSpec};
use crate::traits::{Agent, Fetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns a configurable response and records requests.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML string.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    requests: Arc<Mutex<Vec<FetchRequest>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// URLs fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }

    /// Full requests received so far, in call order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockAgent
// ---------------------------------------------------------------------------

/// Mock agent that records what it was asked and answers from a script.
#[derive(Clone)]
pub struct MockAgent {
    /// Scripted answer. `None` means "call the offered tool with the brief's URL".
    answer: Arc<Mutex<Option<Result<ToolCall, AppError>>>>,
    /// Recorded (brief, tool name) pairs.
    pub seen: Arc<Mutex<Vec<(TaskBrief, String)>>>,
}

impl MockAgent {
    pub fn following_brief() -> Self {
        Self {
            answer: Arc::new(Mutex::new(None)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn returning(call: ToolCall) -> Self {
        Self {
            answer: Arc::new(Mutex::new(Some(Ok(call)))),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            answer: Arc::new(Mutex::new(Some(Err(error)))),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Agent for MockAgent {
    async fn delegate(&self, brief: &TaskBrief, tool: &ToolSpec) -> Result<ToolCall, AppError> {
        self.seen
            .lock()
            .unwrap()
            .push((brief.clone(), tool.name.to_string()));

        match self.answer.lock().unwrap().take() {
            Some(answer) => answer,
            None => Ok(ToolCall {
                name: tool.name.to_string(),
                url: brief.url.clone(),
            }),
        }
    }
}
