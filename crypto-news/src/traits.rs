use crate::types::{Article, Result};
use async_trait::async_trait;
use std::time::Duration;

/// A single external news source (RSS feed, search API, ...).
///
/// Implementations own their HTTP client and translate the source's native
/// format into [`Article`]s. Any failure is reported as an `Err`, which the
/// coordinator records as "contributed zero articles".
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Human-readable name used in statuses and logs
    fn source_name(&self) -> String;

    /// Upper bound for a single `fetch` call
    fn timeout(&self) -> Duration;

    /// Fetch and normalize the source's current items.
    /// Malformed entries are skipped, never surfaced as errors.
    async fn fetch(&self) -> Result<Vec<Article>>;
}
