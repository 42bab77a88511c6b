use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// A normalized news item flowing through one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: Url,
    /// Name of the source adapter that produced this record.
    pub source_name: String,
    /// Outlet name when the source reports one per article.
    pub publisher: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub raw_body: String,
    /// Populated by the summarizer, `None` before that stage.
    pub summary: Option<String>,
}

impl Article {
    pub fn new(
        title: String,
        link: Url,
        source_name: String,
        published_at: DateTime<Utc>,
        raw_body: String,
    ) -> Self {
        Self {
            title,
            link,
            source_name,
            publisher: None,
            published_at,
            raw_body,
            summary: None,
        }
    }

    pub fn with_publisher(mut self, publisher: Option<String>) -> Self {
        self.publisher = publisher;
        self
    }
}

/// Outcome of a single source adapter within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Success { articles: usize },
    Failure { cause: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub source_name: String,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

impl SourceStatus {
    pub fn success(source_name: impl Into<String>, articles: usize) -> Self {
        Self {
            source_name: source_name.into(),
            outcome: SourceOutcome::Success { articles },
        }
    }

    pub fn failure(source_name: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            outcome: SourceOutcome::Failure {
                cause: cause.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Success { .. })
    }
}

/// Articles and per-source statuses collected by the fetch coordinator.
/// Both lists follow static configuration order.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub articles: Vec<Article>,
    pub statuses: Vec<SourceStatus>,
}

impl FetchReport {
    pub fn all_failed(&self) -> bool {
        all_failed(&self.statuses)
    }
}

/// True when `statuses` is non-empty and none of them succeeded.
pub fn all_failed(statuses: &[SourceStatus]) -> bool {
    !statuses.is_empty() && statuses.iter().all(|s| !s.is_success())
}

/// Final result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub articles: Vec<Article>,
    pub statuses: Vec<SourceStatus>,
}

impl PipelineOutput {
    /// True when at least one source was configured and none of them succeeded.
    pub fn all_sources_failed(&self) -> bool {
        all_failed(&self.statuses)
    }

    /// Escalate the all-sources-failed condition into an error.
    pub fn into_result(self) -> Result<Self> {
        if self.all_sources_failed() {
            return Err(AggregatorError::AllSourcesFailed {
                count: self.statuses.len(),
            });
        }
        Ok(self)
    }
}

/// HTTP settings shared by every adapter's own client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_max_feed_size_mb")]
    pub max_feed_size_mb: usize,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_feed_size_mb: default_max_feed_size_mb(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_user_agent() -> String {
    "CryptoNews-Aggregator/1.0".to_string()
}
fn default_max_feed_size_mb() -> usize {
    10
}
fn default_max_redirects() -> usize {
    5
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Missing API key for source {source_name}")]
    MissingApiKey { source_name: String },

    #[error("Source {source_name} unavailable: {cause}")]
    SourceUnavailable { source_name: String, cause: String },

    #[error("All {count} configured sources failed")]
    AllSourcesFailed { count: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
