use crate::fetcher::status_error;
use crate::rss_utils::text;
use crate::rss_utils::url::parse_article_link;
use crate::traits::NewsSource;
use crate::types::{AggregatorError, Article, FetchConfig, Result};
use crate::Fetcher;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const NEWS_API_ENDPOINT: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_CRYPTO_QUERY: &str = "cryptocurrency OR bitcoin OR ethereum";
pub const DEFAULT_NEWS_API_PAGE_SIZE: usize = 20;

/// Placeholder title the API returns for withdrawn articles
const REMOVED_TITLE: &str = "[Removed]";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArticle {
    title: String,
    url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<SearchArticleSource>,
}

#[derive(Debug, Deserialize)]
struct SearchArticleSource {
    #[serde(default)]
    name: Option<String>,
}

/// Search-style news API source (NewsAPI `everything` endpoint)
pub struct NewsApiSource {
    pub name: String,
    pub endpoint: Url,
    pub query: String,
    pub page_size: usize,
    pub keywords: Vec<String>,
    api_key: Option<String>,
    fetcher: Fetcher,
    timeout: Duration,
}

impl NewsApiSource {
    pub fn new(
        name: String,
        endpoint: Url,
        api_key: Option<String>,
        fetch_config: FetchConfig,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            name,
            endpoint,
            query: DEFAULT_CRYPTO_QUERY.to_string(),
            page_size: DEFAULT_NEWS_API_PAGE_SIZE,
            keywords: Vec::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            fetcher: Fetcher::new(fetch_config, timeout)?,
            timeout,
        })
    }

    pub fn with_query(mut self, query: Option<String>) -> Self {
        if let Some(query) = query {
            self.query = query;
        }
        self
    }

    pub fn with_page_size(mut self, page_size: Option<usize>) -> Self {
        if let Some(page_size) = page_size {
            self.page_size = page_size;
        }
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    fn parse_response(&self, body: &str, fetched_at: DateTime<Utc>) -> Result<Vec<Article>> {
        let response: SearchResponse = serde_json::from_str(body)
            .map_err(|e| AggregatorError::Parse(format!("Invalid search response: {}", e)))?;

        if response.status != "ok" {
            return Err(AggregatorError::Parse(format!(
                "API returned status {}: {}",
                response.status,
                response.message.as_deref().unwrap_or("no message")
            )));
        }

        let mut articles = Vec::new();
        for value in response.articles {
            let item: SearchArticle = match serde_json::from_value(value) {
                Ok(item) => item,
                Err(e) => {
                    debug!("Skipping malformed search result: {}", e);
                    continue;
                }
            };

            let title = text::normalize_whitespace(&item.title);
            if title.is_empty() || title == REMOVED_TITLE {
                continue;
            }
            let Some(link) = parse_article_link(&item.url) else {
                debug!("Skipping search result with invalid link: {}", item.url);
                continue;
            };

            let body = item
                .description
                .filter(|d| !d.trim().is_empty())
                .or_else(|| {
                    item.content
                        .map(|c| text::strip_char_count_marker(&c).to_string())
                })
                .map(|b| text::extract_text_from_html(&b))
                .unwrap_or_default();

            if !text::matches_keywords(&self.keywords, &[title.as_str(), body.as_str()]) {
                continue;
            }

            let published_at = item
                .published_at
                .as_deref()
                .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(fetched_at);
            let publisher = item.source.and_then(|s| s.name);
            articles.push(
                Article::new(
                    title,
                    link,
                    self.name.clone(),
                    published_at,
                    body,
                )
                .with_publisher(publisher),
            );
        }

        Ok(articles)
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self) -> Result<Vec<Article>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AggregatorError::MissingApiKey {
                source_name: self.name.clone(),
            });
        };

        info!("Querying news API {} for \"{}\"", self.endpoint, self.query);

        let fetched_at = Utc::now();
        let page_size = self.page_size.to_string();
        let request = self
            .fetcher
            .get(&self.endpoint)
            .header("X-Api-Key", api_key)
            .query(&[
                ("q", self.query.as_str()),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ]);

        let (status, body) = self.fetcher.send_raw(request).await?;
        if !status.is_success() {
            // Error payloads carry a readable message
            let message = serde_json::from_str::<SearchResponse>(&body)
                .ok()
                .and_then(|r| r.message);
            return Err(match message {
                Some(reason) => AggregatorError::HttpStatus {
                    status: status.as_u16(),
                    reason,
                },
                None => status_error(status),
            });
        }

        let articles = self.parse_response(&body, fetched_at)?;
        info!(
            "Successfully pulled {} items from news API {}",
            articles.len(),
            self.name
        );
        Ok(articles)
    }
}
