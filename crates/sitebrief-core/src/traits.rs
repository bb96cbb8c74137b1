use std::future::Future;

use crate::error::AppError;
use crate::models::{ChatRequest, Page};
use crate::stream::ChatStream;

/// Fetches raw HTML content from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Reduces raw HTML to a [`Page`].
pub trait PageParser: Send + Sync + Clone {
    fn parse(&self, url: &str, html: &str) -> Result<Page, AppError>;
}

/// A chat-completion model backend (hosted API or local daemon).
pub trait ChatBackend: Send + Sync + Clone {
    /// Sends the request and waits for the complete answer.
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<String, AppError>> + Send;

    /// Sends the request and returns the answer as incremental fragments.
    ///
    /// Connection and status failures are reported here, before any
    /// fragment is produced.
    fn stream(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatStream, AppError>> + Send;

    /// Model name, for logging.
    fn model(&self) -> &str;
}
