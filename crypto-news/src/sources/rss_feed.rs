use crate::rss_utils::text;
use crate::traits::NewsSource;
use crate::types::{AggregatorError, Article, FetchConfig, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_RSS_MAX_ENTRIES: usize = 15;

/// Generic RSS/Atom feed source
pub struct RssFeedSource {
    pub name: String,
    pub url: Url,
    pub keywords: Vec<String>,
    fetcher: Fetcher,
    parser: FeedParser,
    timeout: Duration,
}

impl RssFeedSource {
    pub fn new(
        name: String,
        url: Url,
        fetch_config: FetchConfig,
        timeout: Duration,
        max_entries: Option<usize>,
    ) -> Result<Self> {
        let fetcher = Fetcher::new(fetch_config, timeout)?;
        let parser = FeedParser::new(max_entries.unwrap_or(DEFAULT_RSS_MAX_ENTRIES));

        Ok(Self {
            name,
            url,
            keywords: Vec::new(),
            fetcher,
            parser,
            timeout,
        })
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }
}

#[async_trait]
impl NewsSource for RssFeedSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self) -> Result<Vec<Article>> {
        info!("Pulling RSS feed: {}", self.url);

        let fetched_at = Utc::now();
        let content = self.fetcher.fetch_text(&self.url).await?;

        if !FeedParser::is_valid_feed_content(&content) {
            return Err(AggregatorError::Parse(
                "response is not an RSS or Atom document".to_string(),
            ));
        }

        let parsed_feed = self.parser.parse_feed(&content)?;
        let articles: Vec<Article> = self
            .parser
            .convert_to_articles(&parsed_feed, &self.name, fetched_at)
            .into_iter()
            .filter(|article| {
                let keep = text::matches_keywords(
                    &self.keywords,
                    &[article.title.as_str(), article.raw_body.as_str()],
                );
                if !keep {
                    debug!("Filtered out by keywords: {}", article.title);
                }
                keep
            })
            .collect();

        info!(
            "Successfully pulled {} items from RSS feed {} ({})",
            articles.len(),
            parsed_feed.title.as_deref().unwrap_or(&self.name),
            self.url
        );
        Ok(articles)
    }
}
