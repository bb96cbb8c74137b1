use crate::error::AppError;
use crate::extract::PageExtractor;
use crate::models::{ChatRequest, Page};
use crate::prompts::{CONTENT_ANALYST, summary_prompt};
use crate::stream::ChatStream;
use crate::traits::{ChatBackend, Fetcher, PageParser};

/// Orchestrates the summary pipeline: extract → prompt → backend.
///
/// Generic over all external dependencies via traits, enabling dependency
/// injection and testability without real HTTP or model calls.
pub struct SummaryPipeline<F, P, B>
where
    F: Fetcher,
    P: PageParser,
    B: ChatBackend,
{
    extractor: PageExtractor<F, P>,
    backend: B,
}

impl<F, P, B> SummaryPipeline<F, P, B>
where
    F: Fetcher,
    P: PageParser,
    B: ChatBackend,
{
    pub fn new(extractor: PageExtractor<F, P>, backend: B) -> Self {
        Self { extractor, backend }
    }

    /// The two-message request for `page` plus any extra pages.
    pub fn request(page: &Page, extra_pages: &[Page]) -> ChatRequest {
        ChatRequest::new(CONTENT_ANALYST, summary_prompt(page, extra_pages))
    }

    /// Summarize already-extracted pages; returns the backend text verbatim.
    pub async fn summarize(&self, page: &Page, extra_pages: &[Page]) -> Result<String, AppError> {
        tracing::info!("Summarizing with model {} ...", self.backend.model());
        let summary = self
            .backend
            .complete(&Self::request(page, extra_pages))
            .await?;
        tracing::info!("Received {} bytes of summary", summary.len());
        Ok(summary)
    }

    /// Like [`summarize`](Self::summarize), but yields the answer incrementally.
    pub async fn summarize_stream(
        &self,
        page: &Page,
        extra_pages: &[Page],
    ) -> Result<ChatStream, AppError> {
        tracing::info!("Streaming summary from model {} ...", self.backend.model());
        self.backend.stream(&Self::request(page, extra_pages)).await
    }

    /// Extract `url`, then summarize it.
    pub async fn summarize_url(&self, url: &str) -> Result<String, AppError> {
        let page = self.extractor.extract(url).await?;
        self.summarize(&page, &[]).await
    }

    /// Extract `url`, then stream its summary.
    pub async fn summarize_url_stream(&self, url: &str) -> Result<ChatStream, AppError> {
        let page = self.extractor.extract(url).await?;
        self.summarize_stream(&page, &[]).await
    }
}
