use crate::error::AppError;
use crate::extract::PageExtractor;
use crate::models::{ChatRequest, LinkSelection, LinkSelectionResponse, Page};
use crate::prompts::{
    BROCHURE_LINKS_ANALYST, BROCHURE_WRITER, brochure_details, brochure_prompt, links_prompt,
};
use crate::stream::ChatStream;
use crate::traits::{ChatBackend, Fetcher, PageParser};
use crate::urls::{normalize_url, resolve_link};

/// Orchestrates the brochure pipeline:
/// extract landing page → classify links → extract selected pages → write brochure.
pub struct BrochurePipeline<F, P, B>
where
    F: Fetcher,
    P: PageParser,
    B: ChatBackend,
{
    extractor: PageExtractor<F, P>,
    backend: B,
}

impl<F, P, B> BrochurePipeline<F, P, B>
where
    F: Fetcher,
    P: PageParser,
    B: ChatBackend,
{
    pub fn new(extractor: PageExtractor<F, P>, backend: B) -> Self {
        Self { extractor, backend }
    }

    /// Ask the backend which of `page`'s links matter for a company overview.
    ///
    /// A malformed answer fails with [`AppError::FormatError`]; nothing is
    /// repaired or retried.
    pub async fn classify_links(&self, page: &Page) -> Result<Vec<LinkSelection>, AppError> {
        if page.links.is_empty() {
            tracing::info!("No links on {}, skipping link classification", page.url);
            return Ok(vec![]);
        }

        tracing::info!(
            "Classifying {} links with model {} ...",
            page.links.len(),
            self.backend.model()
        );
        let request = ChatRequest::new(BROCHURE_LINKS_ANALYST, links_prompt(page)).json();
        let raw = self.backend.complete(&request).await?;

        let parsed = parse_link_selection(&raw)?;
        tracing::info!("Relevant links: {}", parsed.len());
        for link in &parsed {
            tracing::debug!(kind = %link.kind, url = %link.url, "Selected link");
        }
        Ok(parsed)
    }

    /// Extract every selected page, in order. Any failure aborts the run.
    pub async fn collect_pages(
        &self,
        landing: &Page,
        selections: Vec<LinkSelection>,
    ) -> Result<Vec<(LinkSelection, Page)>, AppError> {
        let mut pages = Vec::with_capacity(selections.len());
        for selection in selections {
            let url = resolve_link(&landing.url, &selection.url)?;
            let page = self.extractor.extract(&url).await?;
            pages.push((selection, page));
        }
        Ok(pages)
    }

    /// Landing page + selected pages, ready to send to the backend.
    pub async fn prepare(&self, url: &str) -> Result<ChatRequest, AppError> {
        let url = normalize_url(url);
        tracing::info!("Making brochure from website: {}", url);

        let landing = self.extractor.extract(&url).await?;
        let selections = self.classify_links(&landing).await?;
        let related = self.collect_pages(&landing, selections).await?;

        let details = brochure_details(&landing, &related);
        Ok(ChatRequest::new(
            BROCHURE_WRITER,
            brochure_prompt(&landing.url, &details),
        ))
    }

    pub async fn create_brochure(&self, url: &str) -> Result<String, AppError> {
        let request = self.prepare(url).await?;
        tracing::info!("Writing brochure with model {} ...", self.backend.model());
        self.backend.complete(&request).await
    }

    pub async fn create_brochure_stream(&self, url: &str) -> Result<ChatStream, AppError> {
        let request = self.prepare(url).await?;
        tracing::info!("Streaming brochure from model {} ...", self.backend.model());
        self.backend.stream(&request).await
    }
}

/// Parse the classifier's `{"links": [...]}` answer.
pub fn parse_link_selection(raw: &str) -> Result<Vec<LinkSelection>, AppError> {
    serde_json::from_str::<LinkSelectionResponse>(raw)
        .map(|r| r.links)
        .map_err(|e| {
            AppError::FormatError(format!(
                "Backend returned malformed link selection: {}. Raw: {}",
                e, raw
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::MAX_BROCHURE_PROMPT_CHARS;
    use crate::testutil::*;

    const LINKS_JSON: &str = r#"{"links": [
        {"type": "about page", "url": "https://example.com/about"},
        {"type": "careers page", "url": "/careers"}
    ]}"#;

    fn landing() -> Page {
        make_test_page(
            "https://example.com",
            "Welcome to Example",
            &["/about", "/careers", "/privacy", "mailto:hi@example.com"],
        )
    }

    fn pipeline(
        fetcher: MockFetcher,
        parser: MockParser,
        backend: MockBackend,
    ) -> BrochurePipeline<MockFetcher, MockParser, MockBackend> {
        BrochurePipeline::new(PageExtractor::new(fetcher, parser), backend)
    }

    #[test]
    fn parses_link_selection() {
        let links = parse_link_selection(LINKS_JSON).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].kind, "about page");
        assert_eq!(links[1].url, "/careers");
    }

    #[test]
    fn malformed_selection_is_format_error() {
        for raw in ["not json", r#"{"pages": []}"#, r#"{"links": [{"url": "x"}]}"#, "[]"] {
            let err = parse_link_selection(raw).unwrap_err();
            assert!(matches!(err, AppError::FormatError(_)), "{raw}");
        }
    }

    #[tokio::test]
    async fn classify_links_requests_json() {
        let backend = MockBackend::new(LINKS_JSON);
        let svc = pipeline(MockFetcher::new(""), MockParser::passthrough(), backend.clone());

        let links = svc.classify_links(&landing()).await.unwrap();

        assert_eq!(links.len(), 2);
        let requests = backend.requests.lock().unwrap();
        assert!(requests[0].json_output);
        assert_eq!(requests[0].messages[0].content, BROCHURE_LINKS_ANALYST);
        assert!(requests[0].messages[1].content.contains("/privacy"));
    }

    #[tokio::test]
    async fn classify_links_fails_hard_on_bad_json() {
        let backend = MockBackend::new("Sure! Here are the links: /about");
        let svc = pipeline(MockFetcher::new(""), MockParser::passthrough(), backend.clone());

        let err = svc.classify_links(&landing()).await.unwrap_err();

        assert!(matches!(err, AppError::FormatError(_)));
        assert_eq!(backend.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn page_without_links_skips_backend() {
        let backend = MockBackend::new(LINKS_JSON);
        let svc = pipeline(MockFetcher::new(""), MockParser::passthrough(), backend.clone());
        let page = make_test_page("https://example.com", "text", &[]);

        let links = svc.classify_links(&page).await.unwrap();

        assert!(links.is_empty());
        assert!(backend.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_brochure_full_flow() {
        let fetcher = MockFetcher::with_responses(vec![
            Ok("<landing>".into()),
            Ok("<about>".into()),
            Ok("<careers>".into()),
        ]);
        let parser = MockParser::with_pages(vec![
            landing(),
            make_test_page("https://example.com/about", "We make widgets", &[]),
            make_test_page("https://example.com/careers", "Join the team", &[]),
        ]);
        let backend = MockBackend::with_responses(vec![
            Ok(vec![LINKS_JSON.to_string()]),
            Ok(vec!["# Example Brochure".to_string()]),
        ]);
        let svc = pipeline(fetcher.clone(), parser, backend.clone());

        let brochure = svc.create_brochure("example.com").await.unwrap();

        assert_eq!(brochure, "# Example Brochure");
        assert_eq!(
            fetcher.requested(),
            vec![
                "https://example.com".to_string(),
                "https://example.com/about".to_string(),
                "https://example.com/careers".to_string(),
            ]
        );

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let final_request = &requests[1];
        assert!(!final_request.json_output);
        assert_eq!(final_request.messages[0].content, BROCHURE_WRITER);
        let user = &final_request.messages[1].content;
        assert!(user.contains("Welcome to Example"));
        assert!(user.contains("about page\nWebpage Title:"));
        assert!(user.contains("We make widgets"));
        assert!(user.contains("Join the team"));
    }

    #[tokio::test]
    async fn brochure_prompt_stays_within_limit() {
        let big = "lorem ipsum ".repeat(2_000);
        let parser = MockParser::with_pages(vec![make_test_page(
            "https://example.com",
            &big,
            &[],
        )]);
        let backend = MockBackend::new("brochure");
        let svc = pipeline(MockFetcher::new("<html/>"), parser, backend.clone());

        svc.create_brochure("https://example.com").await.unwrap();

        let requests = backend.requests.lock().unwrap();
        assert!(requests[0].messages[1].content.chars().count() <= MAX_BROCHURE_PROMPT_CHARS);
    }

    #[tokio::test]
    async fn failed_link_fetch_aborts() {
        let fetcher = MockFetcher::with_responses(vec![
            Ok("<landing>".into()),
            Err(AppError::FetchError("HTTP 404 for https://example.com/about".into())),
        ]);
        let parser = MockParser::with_pages(vec![landing()]);
        let backend = MockBackend::with_responses(vec![Ok(vec![LINKS_JSON.to_string()])]);
        let svc = pipeline(fetcher, parser, backend.clone());

        let err = svc.create_brochure("https://example.com").await.unwrap_err();

        assert!(matches!(err, AppError::FetchError(_)));
        assert_eq!(backend.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn streamed_brochure_matches_chunks() {
        let parser = MockParser::with_pages(vec![make_test_page("https://example.com", "Hi", &[])]);
        let backend = MockBackend::with_chunks(&["# Bro", "chure"]);
        let svc = pipeline(MockFetcher::new("<html/>"), parser, backend);

        let text = svc
            .create_brochure_stream("https://example.com")
            .await
            .unwrap()
            .collect_text()
            .await
            .unwrap();

        assert_eq!(text, "# Brochure");
    }

    #[tokio::test]
    async fn non_web_link_is_never_fetched() {
        let fetcher = MockFetcher::new("<html/>");
        let parser = MockParser::with_pages(vec![landing()]);
        let backend = MockBackend::with_responses(vec![Ok(vec![
            r#"{"links":[{"type":"contact page","url":"mailto:hi@evil.example.org"}]}"#.to_string(),
        ])]);
        let svc = pipeline(fetcher.clone(), parser, backend.clone());

        let err = svc.create_brochure("https://example.com").await.unwrap_err();

        assert!(matches!(err, AppError::FetchError(_)));
        assert_eq!(fetcher.requested(), vec!["https://example.com"]);
        assert_eq!(backend.requests.lock().unwrap().len(), 1);
    }
}
