use crate::traits::NewsSource;
use crate::types::{AggregatorError, Article, FetchReport, Result, SourceStatus};
use futures::future::join_all;
use tracing::{info, warn};

/// Runs every source concurrently and merges their results.
///
/// Each source gets its own timeout. Results are buffered and concatenated in
/// the order the sources were given, so the downstream "first title wins"
/// deduplication does not depend on which source answered first.
pub struct FetchCoordinator<'a> {
    sources: &'a [Box<dyn NewsSource>],
}

impl<'a> FetchCoordinator<'a> {
    pub fn new(sources: &'a [Box<dyn NewsSource>]) -> Self {
        Self { sources }
    }

    pub async fn fetch_all(&self) -> FetchReport {
        info!("Fetching {} sources", self.sources.len());

        let outcomes = join_all(self.sources.iter().map(|source| fetch_one(source.as_ref()))).await;

        let mut report = FetchReport::default();
        for (source, outcome) in self.sources.iter().zip(outcomes) {
            let source_name = source.source_name();
            match outcome {
                Ok(articles) => {
                    info!("Source {} contributed {} articles", source_name, articles.len());
                    report
                        .statuses
                        .push(SourceStatus::success(&source_name, articles.len()));
                    report.articles.extend(articles);
                }
                Err(e) => {
                    let cause = failure_cause(e);
                    let unavailable = AggregatorError::SourceUnavailable {
                        source_name: source_name.clone(),
                        cause: cause.clone(),
                    };
                    warn!("{}", unavailable);
                    report.statuses.push(SourceStatus::failure(source_name, cause));
                }
            }
        }

        let successful = report.statuses.iter().filter(|s| s.is_success()).count();
        info!(
            "Fetched {}/{} sources, {} articles",
            successful,
            report.statuses.len(),
            report.articles.len()
        );
        report
    }
}

async fn fetch_one(source: &dyn NewsSource) -> Result<Vec<Article>> {
    let timeout = source.timeout();
    match tokio::time::timeout(timeout, source.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(AggregatorError::Timeout {
            millis: timeout.as_millis() as u64,
        }),
    }
}

fn failure_cause(error: AggregatorError) -> String {
    match error {
        AggregatorError::SourceUnavailable { cause, .. } => cause,
        other => other.to_string(),
    }
}
