use std::time::Duration;

use reqwest::Client;
use sitebrief_core::error::AppError;
use sitebrief_core::traits::Fetcher;

/// Desktop-browser User-Agent; some sites refuse unknown clients.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// HTTP fetcher using reqwest.
///
/// Downloads raw HTML from URLs with configurable User-Agent and timeout.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::FetchError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::FetchError(format!(
                    "Request to {url} timed out after {} seconds",
                    self.timeout_secs
                ))
            } else if e.is_connect() {
                AppError::FetchError(format!("Connection failed: {e}"))
            } else {
                AppError::FetchError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::FetchError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::FetchError(format!("Failed to read response body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>Hi</body></html>"),
            )
            .mount(&server)
            .await;

        let fetcher = ReqwestFetcher::new().unwrap();
        let html = fetcher.fetch(&format!("{}/page", server.uri())).await.unwrap();

        assert_eq!(html, "<html><body>Hi</body></html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = ReqwestFetcher::new().unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::FetchError(_)));
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let fetcher = ReqwestFetcher::new().unwrap();
        let err = fetcher
            .fetch(&format!("http://127.0.0.1:{port}/"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::FetchError(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = ReqwestFetcher::with_timeout(Duration::from_millis(200)).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();

        assert!(matches!(err, AppError::FetchError(_)));
    }
}
