//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::stream;

use crate::error::AppError;
use crate::models::{ChatRequest, Page};
use crate::stream::ChatStream;
use crate::traits::{ChatBackend, Fetcher, PageParser};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns queued responses and records requested URLs.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML string.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// URLs fetched so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requested.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body>default</body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockParser
// ---------------------------------------------------------------------------

/// Mock parser returning canned pages by URL.
#[derive(Clone)]
pub struct MockParser {
    pages: Arc<Mutex<HashMap<String, Page>>>,
    error: Arc<Mutex<Option<AppError>>>,
}

impl MockParser {
    /// Parser whose page text is the raw input, with no links.
    pub fn passthrough() -> Self {
        Self {
            pages: Arc::new(Mutex::new(HashMap::new())),
            error: Arc::new(Mutex::new(None)),
        }
    }

    /// Parser that returns the given pages for their URLs, passthrough otherwise.
    pub fn with_pages(pages: Vec<Page>) -> Self {
        let pages = pages.into_iter().map(|p| (p.url.clone(), p)).collect();
        Self {
            pages: Arc::new(Mutex::new(pages)),
            error: Arc::new(Mutex::new(None)),
        }
    }

    /// Parser that fails once with the given error.
    pub fn with_error(error: AppError) -> Self {
        Self {
            pages: Arc::new(Mutex::new(HashMap::new())),
            error: Arc::new(Mutex::new(Some(error))),
        }
    }
}

impl PageParser for MockParser {
    fn parse(&self, url: &str, html: &str) -> Result<Page, AppError> {
        if let Some(e) = self.error.lock().unwrap().take() {
            return Err(e);
        }
        if let Some(page) = self.pages.lock().unwrap().get(url) {
            return Ok(page.clone());
        }
        Ok(Page {
            url: url.to_string(),
            title: "Mock Page".to_string(),
            text: html.to_string(),
            links: vec![],
        })
    }
}

// ---------------------------------------------------------------------------
// MockBackend
// ---------------------------------------------------------------------------

/// Mock chat backend. Each response is a list of chunks: `complete` joins
/// them, `stream` yields them one by one.
#[derive(Clone)]
pub struct MockBackend {
    responses: Arc<Mutex<Vec<Result<Vec<String>, AppError>>>>,
    pub requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockBackend {
    pub fn new(text: &str) -> Self {
        Self::with_responses(vec![Ok(vec![text.to_string()])])
    }

    pub fn with_chunks(chunks: &[&str]) -> Self {
        Self::with_responses(vec![Ok(chunks.iter().map(|c| c.to_string()).collect())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<Vec<String>, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn next_response(&self, request: &ChatRequest) -> Result<Vec<String>, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(vec!["default".to_string()])
        } else {
            responses.remove(0)
        }
    }
}

impl ChatBackend for MockBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, AppError> {
        self.next_response(request).map(|chunks| chunks.concat())
    }

    async fn stream(&self, request: &ChatRequest) -> Result<ChatStream, AppError> {
        let chunks = self.next_response(request)?;
        Ok(ChatStream::new(stream::iter(chunks.into_iter().map(Ok))))
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a page for testing.
pub fn make_test_page(url: &str, text: &str, links: &[&str]) -> Page {
    Page {
        url: url.to_string(),
        title: "Test Page".to_string(),
        text: text.to_string(),
        links: links.iter().map(|l| l.to_string()).collect(),
    }
}
