pub mod news_api;
pub mod rss_feed;

pub use news_api::NewsApiSource;
pub use rss_feed::RssFeedSource;

use crate::config::{SourceKind, SourceSpec};
use crate::traits::NewsSource;
use crate::types::{AggregatorError, Article, FetchConfig, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Build the adapter described by `spec`
pub fn build_source(spec: &SourceSpec, fetch_config: &FetchConfig) -> Result<Box<dyn NewsSource>> {
    let url = spec.parsed_url()?;
    let timeout = spec.timeout();

    let source: Box<dyn NewsSource> = match spec.kind {
        SourceKind::Rss => Box::new(
            RssFeedSource::new(
                spec.name.clone(),
                url,
                fetch_config.clone(),
                timeout,
                spec.max_entries,
            )?
            .with_keywords(spec.keywords.clone()),
        ),
        SourceKind::NewsApi => Box::new(
            NewsApiSource::new(
                spec.name.clone(),
                url,
                spec.api_key.clone(),
                fetch_config.clone(),
                timeout,
            )?
            .with_query(spec.query.clone())
            .with_page_size(spec.max_entries)
            .with_keywords(spec.keywords.clone()),
        ),
    };

    Ok(source)
}

/// Stand-in for a source whose adapter could not be constructed. Every fetch
/// reports the construction error, so the run records it like any other
/// unavailable source.
pub struct UnavailableSource {
    name: String,
    cause: String,
}

impl UnavailableSource {
    pub fn new(name: String, cause: String) -> Self {
        Self { name, cause }
    }
}

#[async_trait]
impl NewsSource for UnavailableSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn fetch(&self) -> Result<Vec<Article>> {
        Err(AggregatorError::SourceUnavailable {
            source_name: self.name.clone(),
            cause: self.cause.clone(),
        })
    }
}
