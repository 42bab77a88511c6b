use crate::config::{AggregatorConfig, DEFAULT_LIMIT, DEFAULT_SUMMARY_WORD_LIMIT};
use crate::coordinator::FetchCoordinator;
use crate::processing::{Deduplicator, ProcessingStage, Ranker, Summarizer};
use crate::sources::{build_source, UnavailableSource};
use crate::traits::NewsSource;
use crate::types::PipelineOutput;
use chrono::Utc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// One-shot aggregation pipeline: fetch, deduplicate, rank, summarize.
///
/// Holds no state between runs; calling [`NewsPipeline::run`] twice performs
/// two independent fetches.
pub struct NewsPipeline {
    sources: Vec<Box<dyn NewsSource>>,
    processing_stages: Vec<Box<dyn ProcessingStage>>,
}

impl NewsPipeline {
    pub fn new(sources: Vec<Box<dyn NewsSource>>, limit: usize, summary_word_limit: usize) -> Self {
        let processing_stages: Vec<Box<dyn ProcessingStage>> = vec![
            Box::new(Deduplicator),
            Box::new(Ranker::new(limit)),
            Box::new(Summarizer::new(summary_word_limit)),
        ];

        Self {
            sources,
            processing_stages,
        }
    }

    /// Build adapters from `config`. An adapter that cannot be constructed is
    /// kept as a permanently unavailable source so it still shows up in the
    /// run's statuses.
    pub fn from_config(config: &AggregatorConfig) -> Self {
        let sources = config
            .sources
            .iter()
            .map(|spec| match build_source(spec, &config.fetch) {
                Ok(source) => source,
                Err(e) => {
                    error!("Failed to set up source {}: {}", spec.name, e);
                    Box::new(UnavailableSource::new(spec.name.clone(), e.to_string()))
                        as Box<dyn NewsSource>
                }
            })
            .collect();

        Self::new(sources, config.limit, config.summary_word_limit)
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.source_name()).collect()
    }

    pub async fn run(&self) -> PipelineOutput {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline_run", %run_id);
        self.run_inner(run_id).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid) -> PipelineOutput {
        let started_at = Utc::now();
        info!("Starting pipeline run with {} sources", self.sources.len());

        let report = FetchCoordinator::new(&self.sources).fetch_all().await;
        if report.all_failed() {
            warn!(
                "All {} sources failed; returning an empty article list",
                report.statuses.len()
            );
        }

        let mut articles = report.articles;
        for stage in &self.processing_stages {
            let before = articles.len();
            articles = stage.process(articles);
            debug!(
                "Stage {}: {} -> {} articles",
                stage.stage_name(),
                before,
                articles.len()
            );
        }

        info!("Pipeline run finished with {} articles", articles.len());
        PipelineOutput {
            run_id,
            started_at,
            finished_at: Utc::now(),
            articles,
            statuses: report.statuses,
        }
    }
}

impl Default for NewsPipeline {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_LIMIT, DEFAULT_SUMMARY_WORD_LIMIT)
    }
}

/// Pipeline builder for wiring sources and limits by hand
pub struct PipelineBuilder {
    sources: Vec<Box<dyn NewsSource>>,
    limit: usize,
    summary_word_limit: usize,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            limit: DEFAULT_LIMIT,
            summary_word_limit: DEFAULT_SUMMARY_WORD_LIMIT,
        }
    }

    pub fn add_source(mut self, source: Box<dyn NewsSource>) -> Self {
        info!("Adding source to pipeline: {}", source.source_name());
        self.sources.push(source);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn summary_word_limit(mut self, summary_word_limit: usize) -> Self {
        self.summary_word_limit = summary_word_limit;
        self
    }

    pub fn build(self) -> NewsPipeline {
        NewsPipeline::new(self.sources, self.limit, self.summary_word_limit)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one aggregation for `config`.
pub async fn run(config: &AggregatorConfig) -> PipelineOutput {
    NewsPipeline::from_config(config).run().await
}
