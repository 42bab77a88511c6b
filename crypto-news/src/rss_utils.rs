//! Text helpers shared by the adapters and the processing stages

/// URL utilities for article links
pub mod url {
    use url::Url;

    /// Parse an absolute http(s) URL, rejecting relative or exotic links
    pub fn parse_article_link(link: &str) -> Option<Url> {
        let url = Url::parse(link.trim()).ok()?;
        if is_http(&url) {
            Some(url)
        } else {
            None
        }
    }

    pub fn is_http(url: &Url) -> bool {
        (url.scheme() == "http" || url.scheme() == "https") && url.host_str().is_some()
    }
}

/// Plain-text cleanup for feed payloads
pub mod text {
    use scraper::Html;

    /// Strip HTML tags, decode entities and collapse whitespace.
    ///
    /// A `<` that does not open a tag (`BTC < $60K`, `<3`) stays as text.
    pub fn extract_text_from_html(html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
        normalize_whitespace(&text)
    }

    /// Drop the `[+1234 chars]` marker search APIs append to clipped content
    pub fn strip_char_count_marker(text: &str) -> &str {
        let trimmed = text.trim_end();
        let Some(start) = trimmed.rfind("[+") else {
            return trimmed;
        };
        match trimmed[start + 2..].strip_suffix(" chars]") {
            Some(count) if !count.is_empty() && count.chars().all(|c| c.is_ascii_digit()) => {
                trimmed[..start].trim_end()
            }
            _ => trimmed,
        }
    }

    pub fn normalize_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Case-insensitive, whitespace-collapsed form of a title
    pub fn title_key(title: &str) -> String {
        normalize_whitespace(title).to_lowercase()
    }

    pub fn word_count(text: &str) -> usize {
        text.split_whitespace().count()
    }

    /// True when `keywords` is empty or any keyword occurs in one of `fields`
    pub fn matches_keywords(keywords: &[String], fields: &[&str]) -> bool {
        if keywords.is_empty() {
            return true;
        }
        let haystacks: Vec<String> = fields.iter().map(|f| f.to_lowercase()).collect();
        keywords.iter().any(|keyword| {
            let needle = keyword.to_lowercase();
            haystacks.iter().any(|h| h.contains(&needle))
        })
    }
}
