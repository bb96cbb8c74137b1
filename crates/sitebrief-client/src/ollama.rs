use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sitebrief_core::error::AppError;
use sitebrief_core::models::{ChatRequest, Message};
use sitebrief_core::stream::ChatStream;
use sitebrief_core::traits::ChatBackend;

use crate::http::{backend_client, ensure_success, transport_error};
use crate::stream::{LineEvent, decode_lines, response_bytes};

// Local models on CPU can take a while on long pages.
const DEFAULT_OLLAMA_TIMEOUT: Duration = Duration::from_secs(300);

/// Backend for a local Ollama daemon, over its native `/api/chat` endpoint.
#[derive(Clone)]
pub struct OllamaBackend {
    client: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaBackend {
    pub fn with_base_url(model: &str, base_url: &str) -> Result<Self, AppError> {
        Self::build(model, base_url, DEFAULT_OLLAMA_TIMEOUT)
    }

    pub fn with_timeout(self, timeout: Duration) -> Result<Self, AppError> {
        Self::build(&self.model, &self.base_url, timeout)
    }

    fn build(model: &str, base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        Ok(Self {
            client: backend_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }

    async fn send(
        &self,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<reqwest::Response, AppError> {
        let url = format!("{}/api/chat", self.base_url);

        let body = OllamaChatRequest {
            model: &self.model,
            messages: &request.messages,
            stream,
            format: request.json_output.then_some("json"),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;

        ensure_success(response, error_message).await
    }
}

// ---- Ollama API types ----

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    // Ollama streams unless told otherwise, so always send it.
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct OllamaError {
    error: String,
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<OllamaError>(body).ok().map(|e| e.error)
}

/// Decode one line of Ollama's newline-delimited JSON stream.
fn decode_ndjson_line(line: &str) -> Result<LineEvent, AppError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(LineEvent::Skip);
    }

    let chunk: OllamaChatResponse = serde_json::from_str(line)
        .map_err(|e| AppError::backend(format!("Malformed stream chunk: {e}. Raw: {line}")))?;

    if let Some(error) = chunk.error {
        return Err(AppError::backend(error));
    }

    let content = chunk.message.map(|m| m.content).unwrap_or_default();
    if !content.is_empty() {
        // A final line that still carries text ends the stream with the body.
        Ok(LineEvent::Chunk(content))
    } else if chunk.done {
        Ok(LineEvent::Done)
    } else {
        Ok(LineEvent::Skip)
    }
}

impl ChatBackend for OllamaBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, AppError> {
        let response = self.send(request, false).await?;

        let chat: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::backend(format!("Failed to parse Ollama response: {e}")))?;

        if let Some(error) = chat.error {
            return Err(AppError::backend(error));
        }

        chat.message
            .map(|m| m.content)
            .ok_or_else(|| AppError::BackendError {
                message: "Empty response from Ollama".into(),
                status_code: Some(200),
            })
    }

    async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, AppError> {
        let response = self.send(request, true).await?;
        Ok(decode_lines(response_bytes(response), decode_ndjson_line))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
