use thiserror::Error;

/// Application-wide error types for sitebrief.
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetching a page failed (transport error, timeout, or non-2xx status).
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// The fetched body could not be treated as markup.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The model backend was unreachable or answered with an error.
    #[error("Backend error: {message}")]
    BackendError {
        message: String,
        /// HTTP status returned by the backend, if the request got that far.
        status_code: Option<u16>,
    },

    /// The backend's structured output was not well-formed.
    #[error("Format error: {0}")]
    FormatError(String),

    /// Missing or invalid configuration (API key, URL, ...).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Shorthand for a backend error that never reached an HTTP status.
    pub fn backend(message: impl Into<String>) -> Self {
        AppError::BackendError {
            message: message.into(),
            status_code: None,
        }
    }

    /// HTTP status carried by a backend error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AppError::BackendError { status_code, .. } => *status_code,
            _ => None,
        }
    }
}
