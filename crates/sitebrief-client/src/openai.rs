use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sitebrief_core::error::AppError;
use sitebrief_core::models::{ChatRequest, Message};
use sitebrief_core::stream::ChatStream;
use sitebrief_core::traits::ChatBackend;

use crate::http::{backend_client, ensure_success, transport_error};
use crate::stream::{LineEvent, decode_lines, response_bytes};

const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(120);

/// OpenAI-compatible chat-completions backend.
///
/// Works with any OpenAI-compatible API, including:
/// - OpenAI directly (`https://api.openai.com/v1`)
/// - A local Ollama daemon through its compatibility layer (`http://localhost:11434/v1`)
#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAiBackend {
    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Result<Self, AppError> {
        Self::build(api_key, model, base_url, DEFAULT_LLM_TIMEOUT)
    }

    pub fn with_timeout(self, timeout: Duration) -> Result<Self, AppError> {
        Self::build(&self.api_key, &self.model, &self.base_url, timeout)
    }

    fn build(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        Ok(Self {
            client: backend_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }

    async fn send(
        &self,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<reqwest::Response, AppError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = CompletionRequest {
            model: &self.model,
            messages: &request.messages,
            stream,
            response_format: request.json_output.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;

        ensure_success(response, api_error_message).await
    }
}

// ---- OpenAI API types ----

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiError>(body)
        .ok()
        .map(|e| e.error.message)
}

/// Decode one server-sent-events line.
fn decode_sse_line(line: &str) -> Result<LineEvent, AppError> {
    let Some(data) = line.strip_prefix("data:") else {
        // blank separators, comments, and event/id/retry fields
        return Ok(LineEvent::Skip);
    };
    let data = data.trim();
    if data == "[DONE]" {
        return Ok(LineEvent::Done);
    }

    let chunk: StreamChunk = serde_json::from_str(data)
        .map_err(|e| AppError::backend(format!("Malformed stream chunk: {e}. Raw: {data}")))?;

    if let Some(error) = chunk.error {
        return Err(AppError::backend(error.message));
    }

    match chunk.choices.into_iter().next().and_then(|c| c.delta.content) {
        Some(content) if !content.is_empty() => Ok(LineEvent::Chunk(content)),
        _ => Ok(LineEvent::Skip),
    }
}

impl ChatBackend for OpenAiBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, AppError> {
        let response = self.send(request, false).await?;

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::backend(format!("Failed to parse LLM response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::BackendError {
                message: "Empty response from LLM".into(),
                status_code: Some(200),
            })
    }

    async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, AppError> {
        let response = self.send(request, true).await?;
        Ok(decode_lines(response_bytes(response), decode_sse_line))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
