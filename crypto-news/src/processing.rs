use crate::rss_utils::text;
use crate::types::Article;
use std::collections::HashSet;
use tracing::debug;

/// Marker appended to a summary that was cut short
pub const TRUNCATION_MARKER: &str = "...";

/// A sequential stage applied to the article list collected by the coordinator.
pub trait ProcessingStage: Send + Sync {
    /// Consume the previous stage's full output and produce this stage's output
    fn process(&self, articles: Vec<Article>) -> Vec<Article>;

    fn stage_name(&self) -> &'static str;
}

/// Drops articles whose normalized title has already been seen.
/// The first occurrence in input order wins, regardless of recency.
#[derive(Debug, Default, Clone, Copy)]
pub struct Deduplicator;

impl ProcessingStage for Deduplicator {
    fn process(&self, articles: Vec<Article>) -> Vec<Article> {
        let total = articles.len();
        let mut seen_titles = HashSet::new();

        let unique: Vec<Article> = articles
            .into_iter()
            .filter(|article| {
                let is_new = seen_titles.insert(text::title_key(&article.title));
                if !is_new {
                    debug!(
                        "Removing duplicate article: {} ({})",
                        article.title, article.source_name
                    );
                }
                is_new
            })
            .collect();

        if unique.len() < total {
            debug!("Removed {} duplicate articles", total - unique.len());
        }
        unique
    }

    fn stage_name(&self) -> &'static str {
        "deduplicator"
    }
}

/// Orders articles newest first and keeps the top `limit`.
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    limit: usize,
}

impl Ranker {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl ProcessingStage for Ranker {
    fn process(&self, mut articles: Vec<Article>) -> Vec<Article> {
        // sort_by is stable: equal timestamps keep input order
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(self.limit);
        articles
    }

    fn stage_name(&self) -> &'static str {
        "ranker"
    }
}

/// Fills in each article's summary, bounded to `word_limit` words.
#[derive(Debug, Clone, Copy)]
pub struct Summarizer {
    word_limit: usize,
}

impl Summarizer {
    /// A limit of zero is raised to one so a summary always has content.
    pub fn new(word_limit: usize) -> Self {
        Self {
            word_limit: word_limit.max(1),
        }
    }

    pub fn word_limit(&self) -> usize {
        self.word_limit
    }

    /// Summarize the body, or the title when the body is blank.
    pub fn summarize(&self, article: &Article) -> String {
        let basis = if article.raw_body.trim().is_empty() {
            &article.title
        } else {
            &article.raw_body
        };
        truncate_words(basis, self.word_limit)
    }
}

impl ProcessingStage for Summarizer {
    fn process(&self, articles: Vec<Article>) -> Vec<Article> {
        articles
            .into_iter()
            .map(|mut article| {
                article.summary = Some(self.summarize(&article));
                article
            })
            .collect()
    }

    fn stage_name(&self) -> &'static str {
        "summarizer"
    }
}

/// Whitespace-normalize `input` and cut it at the `limit`-th word.
///
/// Text within the limit comes back unchanged apart from whitespace. Longer
/// text keeps exactly `limit` words, with [`TRUNCATION_MARKER`] glued to the
/// last one so the word count does not grow.
pub fn truncate_words(input: &str, limit: usize) -> String {
    let words: Vec<&str> = input.split_whitespace().collect();
    if words.len() <= limit {
        return words.join(" ");
    }
    if limit == 0 {
        return String::new();
    }

    let last = words[limit - 1];
    let trimmed = last.trim_end_matches([',', ';', ':']);
    let last_word = if trimmed.is_empty() { last } else { trimmed };

    let mut summary = words[..limit - 1].join(" ");
    if !summary.is_empty() {
        summary.push(' ');
    }
    summary.push_str(last_word);
    summary.push_str(TRUNCATION_MARKER);
    summary
}
