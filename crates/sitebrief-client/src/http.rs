use std::time::Duration;

use reqwest::{Client, Response};
use sitebrief_core::error::AppError;

/// Client for backend calls; fails with a [`AppError::ConfigError`] if TLS
/// setup fails.
pub(crate) fn backend_client(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {e}")))
}

/// Map a reqwest send failure to a backend error.
pub(crate) fn transport_error(e: reqwest::Error, timeout_secs: u64) -> AppError {
    if e.is_timeout() {
        AppError::backend(format!("Request timed out after {timeout_secs} seconds"))
    } else if e.is_connect() {
        AppError::backend(format!("Connection failed: {e}"))
    } else {
        AppError::backend(e.to_string())
    }
}

/// Pass 2xx responses through; turn anything else into a backend error,
/// using `message_of` to pull a readable message out of the error body.
pub(crate) async fn ensure_success(
    response: Response,
    message_of: fn(&str) -> Option<String>,
) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_code = status.as_u16();
    let body = response.text().await.unwrap_or_default();
    let message =
        message_of(&body).unwrap_or_else(|| format!("HTTP {}: {}", status_code, body));

    tracing::warn!(status_code, "Backend returned an error: {}", message);
    Err(AppError::BackendError {
        message,
        status_code: Some(status_code),
    })
}
