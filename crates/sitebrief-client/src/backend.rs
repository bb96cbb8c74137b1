use sitebrief_core::config::{BackendConfig, BackendKind};
use sitebrief_core::error::AppError;
use sitebrief_core::models::ChatRequest;
use sitebrief_core::stream::ChatStream;
use sitebrief_core::traits::ChatBackend;

use crate::ollama::OllamaBackend;
use crate::openai::OpenAiBackend;

/// A backend chosen at startup from a [`BackendConfig`].
#[derive(Clone)]
pub enum ConfiguredBackend {
    OpenAi(OpenAiBackend),
    Ollama(OllamaBackend),
}

impl ConfiguredBackend {
    /// Validate the config and build the matching backend. Fails before any
    /// network activity when the config is unusable.
    pub fn from_config(config: &BackendConfig) -> Result<Self, AppError> {
        config.validate()?;

        let backend = match config.kind {
            BackendKind::OpenAi | BackendKind::OllamaOpenAi => {
                ConfiguredBackend::OpenAi(OpenAiBackend::with_base_url(
                    config.effective_api_key(),
                    &config.model,
                    &config.base_url,
                )?)
            }
            BackendKind::Ollama => ConfiguredBackend::Ollama(OllamaBackend::with_base_url(
                &config.model,
                &config.base_url,
            )?),
        };

        tracing::debug!(
            kind = %config.kind,
            model = %config.model,
            base_url = %config.base_url,
            "Backend configured"
        );
        Ok(backend)
    }
}

impl ChatBackend for ConfiguredBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, AppError> {
        match self {
            ConfiguredBackend::OpenAi(b) => b.complete(request).await,
            ConfiguredBackend::Ollama(b) => b.complete(request).await,
        }
    }

    async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, AppError> {
        match self {
            ConfiguredBackend::OpenAi(b) => b.stream(request).await,
            ConfiguredBackend::Ollama(b) => b.stream(request).await,
        }
    }

    fn model(&self) -> &str {
        match self {
            ConfiguredBackend::OpenAi(b) => b.model(),
            ConfiguredBackend::Ollama(b) => b.model(),
        }
    }
}
