pub mod types;
pub mod traits;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod rss_utils;
pub mod sources;
pub mod coordinator;
pub mod processing;
pub mod pipeline;
pub mod digest;

pub use types::*;
pub use traits::NewsSource;
pub use config::{AggregatorConfig, SourceKind, SourceSpec};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use sources::{NewsApiSource, RssFeedSource};
pub use coordinator::FetchCoordinator;
pub use processing::{Deduplicator, ProcessingStage, Ranker, Summarizer};
pub use pipeline::{run, NewsPipeline, PipelineBuilder};
