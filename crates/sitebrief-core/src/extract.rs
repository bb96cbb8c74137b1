use crate::error::AppError;
use crate::models::Page;
use crate::traits::{Fetcher, PageParser};
use crate::urls::normalize_url;

/// Fetches a URL and reduces it to a [`Page`]: normalize → fetch → parse.
#[derive(Clone)]
pub struct PageExtractor<F, P>
where
    F: Fetcher,
    P: PageParser,
{
    fetcher: F,
    parser: P,
}

impl<F, P> PageExtractor<F, P>
where
    F: Fetcher,
    P: PageParser,
{
    pub fn new(fetcher: F, parser: P) -> Self {
        Self { fetcher, parser }
    }

    /// One outbound request per call.
    pub async fn extract(&self, url: &str) -> Result<Page, AppError> {
        let url = normalize_url(url);

        tracing::info!("Fetching {}", url);
        let html = self.fetcher.fetch(&url).await?;
        tracing::info!("Fetched {} bytes of HTML", html.len());

        let page = self.parser.parse(&url, &html)?;
        tracing::info!(
            title = %page.title,
            links = page.links.len(),
            "Extracted {} bytes of text ({}% reduction)",
            page.text.len(),
            if html.is_empty() {
                0
            } else {
                100 - (page.text.len() * 100 / html.len()).min(100)
            }
        );

        Ok(page)
    }
}
