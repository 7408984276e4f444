use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use scraper::{Html, Selector};
use thiserror::Error;

pub const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request timed out")]
    Timeout,

    #[error(transparent)]
    Request(reqwest::Error),

    #[error("search provider returned {status}")]
    Status { status: u16 },

    #[error("search provider throttled the request with a challenge page")]
    Throttled,

    #[error("search provider error: {0}")]
    Provider(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout
        } else {
            SearchError::Request(e)
        }
    }
}

/// A web search capability returning result URLs in the provider's ranking order.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns at most `limit` URLs. No results is `Ok(vec![])`, not an error.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SearchError>;

    fn name(&self) -> &'static str;
}

/// Scrapes DuckDuckGo's HTML endpoint, which needs no API key.
pub struct DuckDuckGoProvider {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoProvider {
    pub fn with_endpoint(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query)])
            .send()
            .await?;

        // Throttling comes back as 202 with a challenge page, so only 200 carries results
        if response.status() != StatusCode::OK {
            return Err(SearchError::Status {
                status: response.status().as_u16(),
            });
        }

        let html = response.text().await?;
        if is_challenge_page(&html)? {
            return Err(SearchError::Throttled);
        }
        parse_result_links(&html, limit)
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}

/// Pulls result URLs out of a DuckDuckGo HTML results page, in page order.
pub fn parse_result_links(html: &str, limit: usize) -> Result<Vec<String>, SearchError> {
    let document = Html::parse_document(html);
    let result_selector = Selector::parse("a.result__a")
        .map_err(|e| SearchError::Provider(format!("invalid result selector: {e}")))?;

    let links = document
        .select(&result_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(resolve_result_href)
        .take(limit)
        .collect();

    Ok(links)
}

fn is_challenge_page(html: &str) -> Result<bool, SearchError> {
    let document = Html::parse_document(html);
    let challenge_selector = Selector::parse("#challenge-form, .anomaly-modal__modal")
        .map_err(|e| SearchError::Provider(format!("invalid challenge selector: {e}")))?;
    Ok(document.select(&challenge_selector).next().is_some())
}

/// Unwraps `//duckduckgo.com/l/?uddg=<target>` redirects; keeps direct http(s) links.
fn resolve_result_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    let url = Url::parse(&absolute).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    let is_redirect = url
        .host_str()
        .is_some_and(|host| host.ends_with("duckduckgo.com"))
        && url.path().starts_with("/l/");
    if is_redirect {
        return url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned());
    }
    Some(url.to_string())
}
