//! Hugging Face daily-papers scraping module.
//!
//! Fetches the public papers listing, harvests the unique paper links from
//! anchor elements, and extracts each paper's abstract from its detail page.

use crate::error::{OptionExt, Result, TriageError};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info};

/// Default Hugging Face base URL
pub const DEFAULT_BASE_URL: &str = "https://huggingface.co";

/// Listing page path
const PAPERS_PATH: &str = "/papers";

/// Paper links on the listing page start with this prefix
const LINK_PREFIX: &str = "/papers/";

/// Page fetch timeout in seconds
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Provider of paper identifiers and, per identifier, a raw abstract string.
pub struct PaperSource {
    client: reqwest::Client,
    base_url: String,
}

impl PaperSource {
    /// Create a source for the public Hugging Face site.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a source against a custom base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| TriageError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the listing page and return the unique paper paths found on it.
    pub async fn list_papers(&self) -> Result<BTreeSet<String>> {
        let url = format!("{}{}", self.base_url, PAPERS_PATH);
        info!(url = %url, "Fetching papers listing");

        let html = self.fetch_page(&url).await?;
        let links = harvest_paper_links(&html)?;

        info!(count = links.len(), "Harvested paper links");
        Ok(links)
    }

    /// Fetch one paper's detail page and return its abstract text.
    pub async fn fetch_abstract(&self, paper_path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, paper_path);
        debug!(url = %url, "Fetching paper page");

        let html = self.fetch_page(&url).await?;
        extract_abstract(&html)
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TriageError::Api {
                code: status.as_u16() as i32,
                message: format!("HTTP error: {}", status),
            });
        }

        response.text().await.map_err(TriageError::Network)
    }
}

/// Harvest unique `/papers/...` hrefs from anchor elements on the listing page.
pub fn harvest_paper_links(html: &str) -> Result<BTreeSet<String>> {
    let document = Html::parse_document(html);
    let anchor_selector =
        Selector::parse("a").map_err(|e| TriageError::Parse(e.to_string()))?;

    let mut links = BTreeSet::new();
    for anchor in document.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.starts_with(LINK_PREFIX) {
            links.insert(href.to_string());
        }
    }

    Ok(links)
}

/// Extract the abstract: the text of the paragraph under the first `h2`
/// heading containing the word "Abstract".
pub fn extract_abstract(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let heading_selector =
        Selector::parse("h2").map_err(|e| TriageError::Parse(e.to_string()))?;
    let paragraph_selector =
        Selector::parse("p").map_err(|e| TriageError::Parse(e.to_string()))?;

    for heading in document.select(&heading_selector) {
        let heading_text: String = heading.text().collect();
        if !heading_text.contains("Abstract") {
            continue;
        }

        let parent = heading
            .parent()
            .and_then(ElementRef::wrap)
            .ok_or_parse("Abstract heading has no parent element")?;

        let paragraph = parent
            .select(&paragraph_selector)
            .next()
            .ok_or_parse("No paragraph found under the Abstract heading")?;

        let text: String = paragraph.text().collect();
        return Ok(text.trim().to_string());
    }

    Err(TriageError::Parse(
        "No Abstract heading found in paper page".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harvest_links_deduplicates() {
        let html = r#"<html><body>
            <a href="/papers/2305.00001">Paper one</a>
            <a href="/papers/2305.00001#community">Comments</a>
            <a href="/papers/2305.00002">Paper two</a>
            <a href="/datasets/foo">Not a paper</a>
            <a>No href</a>
        </body></html>"#;
        let links = harvest_paper_links(html).expect("harvest failed");
        assert_eq!(links.len(), 3);
        assert!(links.contains("/papers/2305.00001"));
        assert!(links.contains("/papers/2305.00002"));
    }

    #[test]
    fn test_harvest_empty_html() {
        let links = harvest_paper_links("<html><body></body></html>").expect("harvest failed");
        assert!(links.is_empty());
    }

    #[test]
    fn test_extract_abstract() {
        let html = r#"<html><body>
            <div>
              <h2>Abstract</h2>
              <p>We study X. We find Y.</p>
            </div>
        </body></html>"#;
        let text = extract_abstract(html).expect("extract failed");
        assert_eq!(text, "We study X. We find Y.");
    }

    #[test]
    fn test_extract_abstract_missing_heading() {
        let err = extract_abstract("<html><body><p>No headings.</p></body></html>");
        assert!(matches!(err, Err(TriageError::Parse(_))));
    }

    #[test]
    fn test_extract_abstract_missing_paragraph() {
        let html = "<html><body><div><h2>Abstract</h2></div></body></html>";
        let err = extract_abstract(html);
        assert!(matches!(err, Err(TriageError::Parse(_))));
    }
}
