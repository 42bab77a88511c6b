//! Aggregator configuration.
//!
//! Passed explicitly into the pipeline; nothing here is global. A TOML file
//! may supply it, environment variables override the file, and the CLI
//! overrides both.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::rss_utils::url::is_http;
use crate::sources::news_api::NEWS_API_ENDPOINT;
use crate::types::{AggregatorError, FetchConfig, Result};

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_SUMMARY_WORD_LIMIT: usize = 50;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";
pub const LIMIT_ENV: &str = "CRYPTO_NEWS_LIMIT";
pub const SUMMARY_WORDS_ENV: &str = "CRYPTO_NEWS_SUMMARY_WORDS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Rss,
    NewsApi,
}

/// One configured source, in the order it should be concatenated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub kind: SourceKind,
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Search query for API sources
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Entries per feed, or page size for API sources
    #[serde(default)]
    pub max_entries: Option<usize>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl SourceSpec {
    pub fn rss(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SourceKind::Rss,
            url: url.to_string(),
            api_key: None,
            query: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_entries: None,
            keywords: Vec::new(),
        }
    }

    pub fn news_api(name: &str, url: &str, api_key: Option<String>) -> Self {
        Self {
            kind: SourceKind::NewsApi,
            api_key,
            ..Self::rss(name, url)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn parsed_url(&self) -> Result<Url> {
        let url = Url::parse(&self.url)?;
        if !is_http(&url) {
            return Err(AggregatorError::Config(format!(
                "source {} must use an http(s) URL, got {}",
                self.name, self.url
            )));
        }
        Ok(url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_summary_word_limit")]
    pub summary_word_limit: usize,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            summary_word_limit: DEFAULT_SUMMARY_WORD_LIMIT,
            fetch: FetchConfig::default(),
            sources: default_sources(std::env::var(NEWS_API_KEY_ENV).ok()),
        }
    }
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}
fn default_summary_word_limit() -> usize {
    DEFAULT_SUMMARY_WORD_LIMIT
}
fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

/// Built-in crypto sources. The news API is only included when a key exists.
pub fn default_sources(news_api_key: Option<String>) -> Vec<SourceSpec> {
    let mut sources = vec![
        SourceSpec::rss("CoinDesk", "https://www.coindesk.com/arc/outboundfeeds/rss/"),
        SourceSpec::rss("CryptoPanic", "https://cryptopanic.com/news/rss/"),
    ];
    if let Some(key) = news_api_key.filter(|k| !k.trim().is_empty()) {
        sources.push(SourceSpec::news_api("NewsAPI", NEWS_API_ENDPOINT, Some(key)));
    }
    sources
}

impl AggregatorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        if config.sources.is_empty() {
            config.sources = default_sources(std::env::var(NEWS_API_KEY_ENV).ok());
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Apply `NEWS_API_KEY`, `CRYPTO_NEWS_LIMIT` and `CRYPTO_NEWS_SUMMARY_WORDS`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Same as [`Self::apply_env_overrides`] with an injectable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(NEWS_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            for source in &mut self.sources {
                if source.kind == SourceKind::NewsApi && source.api_key.is_none() {
                    source.api_key = Some(key.clone());
                }
            }
        }
        if let Some(limit) = lookup(LIMIT_ENV).and_then(|v| v.trim().parse().ok()) {
            self.limit = limit;
        }
        if let Some(words) = lookup(SUMMARY_WORDS_ENV).and_then(|v| v.trim().parse().ok()) {
            self.summary_word_limit = words;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.summary_word_limit == 0 {
            return Err(AggregatorError::Config(
                "summary_word_limit must be at least 1".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(AggregatorError::Config("source name must not be empty".to_string()));
            }
            if !names.insert(source.name.as_str()) {
                return Err(AggregatorError::Config(format!(
                    "duplicate source name: {}",
                    source.name
                )));
            }
            if source.timeout_seconds == 0 {
                return Err(AggregatorError::Config(format!(
                    "source {} needs a timeout of at least 1 second",
                    source.name
                )));
            }
            source.parsed_url()?;
        }

        Ok(())
    }
}
