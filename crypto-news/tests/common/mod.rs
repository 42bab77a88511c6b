#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use crypto_news::{AggregatorError, Article, NewsSource, Result};
use std::sync::Once;
use std::time::Duration;
use url::Url;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap()
}

/// Article published `minutes` after the base time
pub fn article(title: &str, source: &str, minutes: i64) -> Article {
    let slug: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    Article::new(
        title.to_string(),
        Url::parse(&format!("https://news.example.com/{}/{}", source.to_lowercase(), slug)).unwrap(),
        source.to_string(),
        base_time() + ChronoDuration::minutes(minutes),
        format!("Body of {}", title),
    )
}

pub fn words(count: usize) -> String {
    (1..=count)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// In-memory source with scripted latency and outcome
pub struct FakeSource {
    name: String,
    articles: Vec<Article>,
    delay: Duration,
    timeout: Duration,
    failure: Option<String>,
}

impl FakeSource {
    pub fn new(name: &str, articles: Vec<Article>) -> Self {
        Self {
            name: name.to_string(),
            articles,
            delay: Duration::ZERO,
            timeout: Duration::from_secs(5),
            failure: None,
        }
    }

    pub fn failing(name: &str, cause: &str) -> Self {
        Self {
            failure: Some(cause.to_string()),
            ..Self::new(name, Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn boxed(self) -> Box<dyn NewsSource> {
        Box::new(self)
    }
}

#[async_trait]
impl NewsSource for FakeSource {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self) -> Result<Vec<Article>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.failure {
            Some(cause) => Err(AggregatorError::Parse(cause.clone())),
            None => Ok(self.articles.clone()),
        }
    }
}
