use std::time::Duration;

use ferret_core::error::AppError;
use ferret_core::task::{TaskBrief, ToolCall, ToolSpec};
use ferret_core::traits::Agent;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_SYSTEM_PROMPT: &str = "You are an HTML extractor. \
Your goal: given a valid URL, use the appropriate tool and return EXACTLY the HTML. \
You specialise in retrieving HTML source code for analysis; you never alter or summarise content. \
Always answer by calling the provided tool with the URL from the task.";

/// OpenAI-compatible agent runtime that delegates via function calling.
///
/// The task's single tool is offered as a function with one `url` argument
/// and `tool_choice` is set to `required`, so the model answers with exactly
/// one tool call that the task then executes.
#[derive(Clone)]
pub struct OpenAiAgent {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    system_prompt: String,
}

impl OpenAiAgent {
    pub fn new(api_key: &str, model: &str) -> Result<Self, AppError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Result<Self, AppError> {
        Self::build(api_key, model, base_url, DEFAULT_LLM_TIMEOUT)
    }

    pub fn with_timeout(self, timeout: Duration) -> Result<Self, AppError> {
        Self::build(&self.api_key, &self.model, &self.base_url, timeout)
            .map(|agent| agent.with_system_prompt(self.system_prompt))
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::NetworkError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        })
    }
}

// ---- OpenAI API types ----

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    messages: Vec<Message>,
    tools: Vec<ToolDefinition>,
    tool_choice: &'static str,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ToolDefinition {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: FunctionDefinition,
}

#[derive(Serialize)]
struct FunctionDefinition {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Deserialize)]
struct ResponseToolCall {
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    /// JSON-encoded argument object.
    arguments: String,
}

#[derive(Deserialize)]
struct ToolArguments {
    url: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn tool_definition(tool: &ToolSpec) -> ToolDefinition {
    ToolDefinition {
        tool_type: "function",
        function: FunctionDefinition {
            name: tool.name.to_string(),
            description: tool.description.to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": tool.url_description}
                },
                "required": ["url"],
                "additionalProperties": false
            }),
        },
    }
}

impl Agent for OpenAiAgent {
    async fn delegate(&self, brief: &TaskBrief, tool: &ToolSpec) -> Result<ToolCall, AppError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            temperature: DEFAULT_TEMPERATURE,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                Message {
                    role: "user".to_string(),
                    content: format!(
                        "{}\n\nExpected output: {}",
                        brief.description, brief.expected_output
                    ),
                },
            ],
            tools: vec![tool_definition(tool)],
            tool_choice: "required",
        };

        tracing::debug!(model = %self.model, tool = tool.name, "Asking agent for a tool call");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::NetworkError(format!(
                        "LLM request timed out after {:?}",
                        self.timeout
                    ))
                } else if e.is_connect() {
                    AppError::NetworkError(format!("Connection failed: {e}"))
                } else {
                    AppError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();

            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status_code}: {body}"));

            return Err(AppError::LlmError {
                message,
                status_code,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::AgentError(format!("Failed to parse LLM response: {e}")))?;

        let call = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.tool_calls?.into_iter().next())
            .ok_or_else(|| AppError::AgentError("LLM answered without a tool call".into()))?;

        let args: ToolArguments = serde_json::from_str(&call.function.arguments).map_err(|e| {
            AppError::AgentError(format!(
                "Malformed arguments for tool '{}': {e}. Raw: {}",
                call.function.name, call.function.arguments
            ))
        })?;

        tracing::debug!(tool = %call.function.name, url = %args.url, "Agent chose tool call");

        Ok(ToolCall {
            name: call.function.name,
            url: args.url,
        })
    }
}
