use std::time::Duration;

use ferret_core::config::FetchConfig;
use ferret_core::models::{FetchMode, FetchRequest};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PAGE_HTML: &str = "<!doctype html><html lang=\"en\"><head><title>Fixture</title></head>\
<body><h1>Hello from the fixture</h1><p>Static content.</p></body></html>";

pub const TEST_USER_AGENT: &str = "ferret-test/1.0";

/// Config with a short timeout and a recognisable User-Agent.
pub fn test_config() -> FetchConfig {
    FetchConfig {
        timeout: Duration::from_secs(5),
        user_agent: TEST_USER_AGENT.to_string(),
        ..FetchConfig::default()
    }
}

/// A request carrying the settings of [`test_config`].
pub fn test_request(url: &str, mode: FetchMode) -> FetchRequest {
    FetchRequest::new(url, mode, &test_config())
}

/// Serve `body` as `text/html` at `route` with the given status.
pub async fn mount_html(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// An OpenAI chat-completions response carrying one tool call.
pub fn tool_call_response(tool: &str, url: &str) -> serde_json::Value {
    let arguments = serde_json::json!({ "url": url }).to_string();
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "finish_reason": "tool_calls",
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": tool, "arguments": arguments }
                }]
            }
        }]
    })
}
