use crate::error::AppError;

/// Environment variable holding the hosted-backend API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_OPENAI_BASE_URL: &str = "http://localhost:11434/v1";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Key sent to local daemons that speak the OpenAI API but ignore auth.
pub const OLLAMA_PLACEHOLDER_KEY: &str = "ollama";

/// Which model backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted OpenAI chat-completions API.
    OpenAi,
    /// Local Ollama daemon over its native HTTP API.
    Ollama,
    /// Local Ollama daemon through its OpenAI-compatible endpoint.
    OllamaOpenAi,
}

impl BackendKind {
    pub fn default_base_url(self) -> &'static str {
        match self {
            BackendKind::OpenAi => DEFAULT_OPENAI_BASE_URL,
            BackendKind::Ollama => DEFAULT_OLLAMA_BASE_URL,
            BackendKind::OllamaOpenAi => DEFAULT_OLLAMA_OPENAI_BASE_URL,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            BackendKind::OpenAi => DEFAULT_OPENAI_MODEL,
            BackendKind::Ollama | BackendKind::OllamaOpenAi => DEFAULT_OLLAMA_MODEL,
        }
    }

    pub fn requires_api_key(self) -> bool {
        matches!(self, BackendKind::OpenAi)
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::OpenAi => write!(f, "openai"),
            BackendKind::Ollama => write!(f, "ollama"),
            BackendKind::OllamaOpenAi => write!(f, "ollama-openai"),
        }
    }
}

/// Resolved backend settings, read once at startup.
#[derive(Clone)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl BackendConfig {
    /// Config with the kind's default model and base URL and no key.
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            model: kind.default_model().to_string(),
            base_url: kind.default_base_url().to_string(),
            api_key: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Reject configurations that cannot work, before any network call.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.model.trim().is_empty() {
            return Err(AppError::ConfigError("model name must not be empty".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(AppError::ConfigError("base URL must not be empty".into()));
        }
        if self.kind.requires_api_key() {
            match self.api_key.as_deref() {
                Some(key) => validate_api_key(key)?,
                None => {
                    return Err(AppError::ConfigError(format!(
                        "{API_KEY_ENV} environment variable not set"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Key to send in the `Authorization` header, if any.
    ///
    /// Only the hosted backend ever receives the configured key; local
    /// backends get the placeholder (or nothing) whatever was configured.
    pub fn effective_api_key(&self) -> &str {
        match self.kind {
            BackendKind::OpenAi => self.api_key.as_deref().unwrap_or_default(),
            BackendKind::OllamaOpenAi => OLLAMA_PLACEHOLDER_KEY,
            BackendKind::Ollama => "",
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Check the shape of a hosted-backend API key.
pub fn validate_api_key(key: &str) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Err(AppError::ConfigError(format!(
            "{API_KEY_ENV} environment variable not set"
        )));
    }
    if !key.starts_with("sk-") {
        return Err(AppError::ConfigError(
            "Invalid API key: should start with 'sk-'".into(),
        ));
    }
    Ok(())
}
