use scraper::{ElementRef, Html, Selector};
use sitebrief_core::error::AppError;
use sitebrief_core::models::{NO_TITLE, Page};
use sitebrief_core::traits::PageParser;

/// Elements whose whole subtree is dropped before collecting text.
const SKIP_TAGS: &[&str] = &["script", "style", "img", "input"];

/// HTML-to-text parser using scraper.
///
/// Keeps the `<title>`, every visible text node under `<body>` (one per
/// line, trimmed), and the `href` of every anchor.
#[derive(Debug, Clone, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl PageParser for HtmlParser {
    fn parse(&self, url: &str, html: &str) -> Result<Page, AppError> {
        if html.trim().is_empty() {
            return Err(AppError::ParseError(format!("Empty document at {url}")));
        }
        if !html.contains('<') {
            return Err(AppError::ParseError(format!(
                "Response from {url} contains no markup"
            )));
        }

        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            tracing::debug!("{} recoverable markup errors in {}", document.errors.len(), url);
        }

        let title = document
            .select(&selector("title")?)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string());

        let body = document
            .select(&selector("body")?)
            .next()
            .ok_or_else(|| AppError::ParseError(format!("No <body> in document at {url}")))?;
        let mut lines = Vec::new();
        collect_text(body, &mut lines);

        let links = document
            .select(&selector("a[href]")?)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(String::from)
            .collect();

        Ok(Page {
            url: url.to_string(),
            title,
            text: lines.join("\n"),
            links,
        })
    }
}

fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::ParseError(format!("Bad selector {css}: {e}")))
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let text = text.trim();
            if !text.is_empty() {
                lines.push(text.to_string());
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            if !SKIP_TAGS.contains(&child.value().name()) {
                collect_text(child, lines);
            }
        }
    }
}
