use std::sync::Arc;

use crate::config::Config;
use crate::scrapper::Scrapper;
use crate::search::SearchProvider;

/// Result of one upstream lookup. Failures carry the text shown in place of the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(String),
    Failed(String),
}

impl LookupOutcome {
    pub fn text(&self) -> &str {
        match self {
            LookupOutcome::Found(text) | LookupOutcome::Failed(text) => text,
        }
    }
}

/// Renders `err` with its whole cause chain, e.g. the connect error under a reqwest failure.
pub fn diagnostic(source: &str, err: &anyhow::Error) -> String {
    format!("Could not retrieve information from {source}: {err:#}")
}

/// Runs the page scrape and the site-restricted search for a query and
/// renders both into one report.
pub struct InfoFetcher {
    scrapper: Scrapper,
    search_provider: Arc<dyn SearchProvider>,
    source_name: String,
    search_domain: String,
    max_search_results: usize,
}

impl InfoFetcher {
    pub fn new(
        scrapper: Scrapper,
        search_provider: Arc<dyn SearchProvider>,
        config: &Config,
    ) -> InfoFetcher {
        InfoFetcher {
            scrapper,
            search_provider,
            source_name: config.source_name.clone(),
            search_domain: config.search_domain.clone(),
            max_search_results: config.max_search_results,
        }
    }

    /// Never fails; upstream errors end up as diagnostics inside the report.
    pub async fn fetch(&self, query: &str) -> String {
        let scraped = self.scrape_section(query).await;
        let searched = self.search_section(query).await;
        format_report(
            query,
            &self.source_name,
            &scraped,
            &self.search_domain,
            &searched,
        )
    }

    pub async fn scrape_section(&self, query: &str) -> LookupOutcome {
        match self.scrapper.scrape(query).await {
            Ok(text) => LookupOutcome::Found(text),
            Err(e) => {
                let e = anyhow::Error::new(e);
                tracing::warn!(url = %self.scrapper.url(), "page scrape failed: {:#}", e);
                LookupOutcome::Failed(diagnostic(&self.source_name, &e))
            }
        }
    }

    pub async fn search_section(&self, query: &str) -> LookupOutcome {
        let search_query = site_query(&self.search_domain, query);
        match self
            .search_provider
            .search(&search_query, self.max_search_results)
            .await
        {
            Ok(urls) => LookupOutcome::Found(format_search_results(&self.search_domain, &urls)),
            Err(e) => {
                let e = anyhow::Error::new(e);
                tracing::warn!(
                    provider = self.search_provider.name(),
                    "search failed: {:#}",
                    e
                );
                LookupOutcome::Failed(diagnostic(&self.search_domain, &e))
            }
        }
    }
}

/// Query passed verbatim to the provider; `query` is not escaped.
pub fn site_query(domain: &str, query: &str) -> String {
    format!("site:{domain} transgender {query}")
}

pub fn format_search_results(domain: &str, urls: &[String]) -> String {
    if urls.is_empty() {
        return format!("No relevant information found on {domain}.");
    }
    let mut out = format!("Here are the top results from {domain}:\n");
    for url in urls {
        out.push_str(&format!("- {url}\n"));
    }
    out
}

pub fn format_report(
    query: &str,
    source_name: &str,
    scraped: &LookupOutcome,
    search_domain: &str,
    searched: &LookupOutcome,
) -> String {
    format!(
        "## Information on: {query}\n\n### From {source_name}:\n{}\n\n### From {search_domain}:\n{}",
        scraped.text(),
        searched.text()
    )
}
