use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::search::DDG_HTML_URL;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Runtime settings, built once in `main` and handed to the components.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Page whose paragraphs are scraped.
    pub source_url: String,
    /// Label used for the scraped section header and its diagnostics.
    pub source_name: String,
    /// Domain the site-restricted search is scoped to.
    pub search_domain: String,
    pub search_endpoint: String,
    pub max_search_results: usize,
    pub max_paragraphs: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 5000,
            source_url: "https://genderdysphoria.fyi/".to_string(),
            source_name: "genderdysphoria.fyi".to_string(),
            search_domain: "mayoclinic.org".to_string(),
            search_endpoint: DDG_HTML_URL.to_string(),
            max_search_results: 3,
            max_paragraphs: 3,
            request_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads overrides from the process environment.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get_or_default =
            |key: &str, default: String| lookup(key).filter(|v| !v.is_empty()).unwrap_or(default);

        let config = Config {
            host: get_or_default("HOST", defaults.host),
            port: parse_or_default(&lookup, "PORT", defaults.port)?,
            source_url: get_or_default("SOURCE_URL", defaults.source_url),
            source_name: get_or_default("SOURCE_NAME", defaults.source_name),
            search_domain: get_or_default("SEARCH_DOMAIN", defaults.search_domain),
            search_endpoint: get_or_default("SEARCH_ENDPOINT", defaults.search_endpoint),
            max_search_results: parse_or_default(
                &lookup,
                "MAX_SEARCH_RESULTS",
                defaults.max_search_results,
            )?,
            max_paragraphs: parse_or_default(&lookup, "MAX_PARAGRAPHS", defaults.max_paragraphs)?,
            request_timeout: Duration::from_secs(parse_or_default(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            user_agent: get_or_default("USER_AGENT", defaults.user_agent),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_search_results == 0 {
            bail!("MAX_SEARCH_RESULTS must be at least 1");
        }
        if self.max_paragraphs == 0 {
            bail!("MAX_PARAGRAPHS must be at least 1");
        }
        if self.request_timeout.is_zero() {
            bail!("REQUEST_TIMEOUT_SECS must be at least 1");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Shared outbound client carrying the browser-like User-Agent and the request timeout.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
