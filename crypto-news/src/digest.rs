use crate::types::{PipelineOutput, SourceOutcome};

/// Plain-text digest of a run: numbered headlines with their summaries,
/// followed by the per-source statuses.
pub fn render_text_digest(output: &PipelineOutput) -> String {
    let mut digest = String::new();

    if output.articles.is_empty() {
        digest.push_str("No crypto news available right now.\n");
    } else {
        digest.push_str(&format!("Top {} Crypto News Stories\n", output.articles.len()));
        digest.push_str(&format!("{}\n", "-".repeat(40)));
        for (i, article) in output.articles.iter().enumerate() {
            let source = match &article.publisher {
                Some(publisher) => format!("{} via {}", publisher, article.source_name),
                None => article.source_name.clone(),
            };
            digest.push_str(&format!("\n{}. {}\n", i + 1, article.title));
            // Title-only items summarize to their own headline
            if let Some(summary) = article.summary.as_deref() {
                if !summary.is_empty() && summary != article.title {
                    digest.push_str(&format!("   {}\n", summary));
                }
            }
            digest.push_str(&format!(
                "   Source: {} | {}\n",
                source,
                article.published_at.format("%Y-%m-%d %H:%M UTC")
            ));
            digest.push_str(&format!("   {}\n", article.link));
        }
    }

    digest.push_str("\nSources:\n");
    for status in &output.statuses {
        match &status.outcome {
            SourceOutcome::Success { articles } => {
                digest.push_str(&format!("  {}: ok ({} articles)\n", status.source_name, articles))
            }
            SourceOutcome::Failure { cause } => digest.push_str(&format!(
                "  {}: unavailable ({})\n",
                status.source_name, cause
            )),
        }
    }

    digest
}
