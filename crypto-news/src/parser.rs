use crate::rss_utils::text;
use crate::rss_utils::url::parse_article_link;
use crate::types::{AggregatorError, Article, Result};
use chrono::{DateTime, Utc};
use feed_rs::model::Text;
use feed_rs::parser;
use tracing::{debug, info};
use url::Url;

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
    /// Entries dropped because they lacked a title or a usable link
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub link: Url,
    pub title: String,
    pub body: String,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Parses RSS 2.0, RSS 1.0 and Atom payloads into articles.
pub struct FeedParser {
    max_entries: usize,
}

impl FeedParser {
    pub fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }

    pub fn parse_feed(&self, content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(plain_text);

        let mut entries = Vec::new();
        let mut skipped = 0;

        for entry in feed.entries.into_iter().take(self.max_entries) {
            match Self::parse_entry(entry) {
                Some(parsed_entry) => entries.push(parsed_entry),
                None => skipped += 1,
            }
        }

        info!("Parsed feed with {} entries ({} skipped)", entries.len(), skipped);

        Ok(ParsedFeed {
            title,
            entries,
            skipped,
        })
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> Option<ParsedEntry> {
        let title = entry.title.map(plain_text).unwrap_or_default();
        if title.is_empty() {
            debug!("Skipping entry {} without a title", entry.id);
            return None;
        }

        // First link that is an absolute http(s) URL
        let Some(link) = entry
            .links
            .iter()
            .find_map(|l| parse_article_link(&l.href))
        else {
            debug!("Skipping entry without a valid link: {}", title);
            return None;
        };

        // Prefer full content over the summary
        let body = entry
            .content
            .and_then(|c| c.body)
            .filter(|b| !b.trim().is_empty())
            .or_else(|| entry.summary.map(|s| s.content))
            .map(|b| text::extract_text_from_html(&b))
            .unwrap_or_default();

        Some(ParsedEntry {
            link,
            title,
            body,
            published_at: entry.published.map(|dt| dt.with_timezone(&Utc)),
            updated_at: entry.updated.map(|dt| dt.with_timezone(&Utc)),
        })
    }

    /// Build articles, falling back to `fetched_at` when an entry carries no date.
    pub fn convert_to_articles(
        &self,
        parsed_feed: &ParsedFeed,
        source_name: &str,
        fetched_at: DateTime<Utc>,
    ) -> Vec<Article> {
        parsed_feed
            .entries
            .iter()
            .map(|entry| {
                Article::new(
                    entry.title.clone(),
                    entry.link.clone(),
                    source_name.to_string(),
                    entry.published_at.or(entry.updated_at).unwrap_or(fetched_at),
                    entry.body.clone(),
                )
            })
            .collect()
    }

    /// Cheap sniff test for RSS/Atom content before handing it to the parser
    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();

        content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<rdf:rdf")
            || content_lower.contains("<channel")
    }
}

/// Feed text with XML entities already decoded. Only `text/html` values
/// (Atom `type="html"`) carry markup; a `<` in plain text is kept as is.
fn plain_text(value: Text) -> String {
    if value.content_type.essence_str() == "text/html" {
        text::extract_text_from_html(&value.content)
    } else {
        text::normalize_whitespace(&value.content)
    }
}
