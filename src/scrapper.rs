use reqwest::Client;
use scraper::{Html, Selector};
use thiserror::Error;

pub const NO_MATCH_SENTINEL: &str = "No specific information found for that query on the page.";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("source page returned HTTP {status}")]
    Status { status: u16 },

    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
}

/// Fetches one fixed page and pulls out the paragraphs mentioning a query.
#[derive(Debug, Clone)]
pub struct Scrapper {
    client: Client,
    url: String,
    max_paragraphs: usize,
}

impl Scrapper {
    pub fn new(client: Client, url: impl Into<String>, max_paragraphs: usize) -> Scrapper {
        Scrapper {
            client,
            url: url.into(),
            max_paragraphs,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn scrape(&self, query: &str) -> Result<String, ScrapeError> {
        let html = self.fetch_page().await?;
        let matches = matching_paragraphs(&html, query)?;
        tracing::debug!(url = %self.url, matches = matches.len(), "scraped page");
        Ok(summarize(matches, self.max_paragraphs))
    }

    async fn fetch_page(&self) -> Result<String, ScrapeError> {
        let res = self.client.get(&self.url).send().await?;
        let status = res.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
            });
        }
        let body = res.text().await?;
        Ok(body)
    }
}

/// Text of every `<p>` whose content contains `query`, ignoring case, in document order.
pub fn matching_paragraphs(html: &str, query: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let paragraph_selector = Selector::parse("p").map_err(|e| ScrapeError::Selector {
        selector: "p".to_string(),
        message: e.to_string(),
    })?;

    let needle = query.to_lowercase();
    let paragraphs = document
        .select(&paragraph_selector)
        .map(|p| p.text().collect::<String>())
        .filter(|text| text.to_lowercase().contains(&needle))
        .collect();

    Ok(paragraphs)
}

/// Joins the first `limit` matches with a blank line, or returns the no-match sentinel.
pub fn summarize(matches: Vec<String>, limit: usize) -> String {
    if matches.is_empty() {
        return NO_MATCH_SENTINEL.to_string();
    }
    matches
        .into_iter()
        .take(limit)
        .collect::<Vec<String>>()
        .join("\n\n")
}
