mod common;

use common::{article, init_tracing, words};
use crypto_news::processing::{truncate_words, TRUNCATION_MARKER};
use crypto_news::rss_utils::text::{extract_text_from_html, strip_char_count_marker, word_count};
use crypto_news::{Deduplicator, ProcessingStage, Ranker, Summarizer};

#[test]
fn test_dedup_merges_case_and_whitespace_variants() {
    init_tracing();

    let articles = vec![
        article("Bitcoin Hits New High", "CoinDesk", 10),
        article("bitcoin hits new high  ", "NewsAPI", 20),
        article("Ether ETF Approved", "NewsAPI", 5),
    ];

    let unique = Deduplicator.process(articles);

    assert_eq!(unique.len(), 2);
    // First occurrence wins even though the later copy is newer
    assert_eq!(unique[0].title, "Bitcoin Hits New High");
    assert_eq!(unique[0].source_name, "CoinDesk");
    assert_eq!(unique[1].title, "Ether ETF Approved");
}

#[test]
fn test_dedup_collapses_internal_whitespace() {
    let articles = vec![
        article("  SEC   delays\tdecision ", "A", 0),
        article("sec delays decision", "B", 1),
    ];

    assert_eq!(Deduplicator.process(articles).len(), 1);
}

#[test]
fn test_dedup_keeps_duplicate_links_with_different_titles() {
    let first = article("Solana outage", "A", 0);
    let mut second = article("Solana network restarts", "A", 1);
    second.link = first.link.clone();

    assert_eq!(Deduplicator.process(vec![first, second]).len(), 2);
}

#[test]
fn test_dedup_is_idempotent() {
    let articles = vec![
        article("One", "A", 3),
        article("one", "B", 2),
        article("Two", "A", 1),
        article("TWO ", "B", 0),
        article("Three", "C", 4),
    ];

    let once = Deduplicator.process(articles);
    let twice = Deduplicator.process(once.clone());

    assert_eq!(once, twice);
}

#[test]
fn test_ranker_keeps_ten_most_recent_of_fifteen() {
    let articles: Vec<_> = (0..15)
        .map(|i| article(&format!("Story {}", i), "A", (i * 7) % 15))
        .collect();

    let ranked = Ranker::new(10).process(articles);

    assert_eq!(ranked.len(), 10);
    let minutes: Vec<i64> = ranked
        .iter()
        .map(|a| (a.published_at - common::base_time()).num_minutes())
        .collect();
    assert_eq!(minutes, (5..15).rev().collect::<Vec<i64>>());
}

#[test]
fn test_ranker_output_length_is_min_of_input_and_limit() {
    for count in [0usize, 1, 9, 10, 11, 40] {
        for limit in [0usize, 1, 10, 25] {
            let articles: Vec<_> = (0..count)
                .map(|i| article(&format!("Story {}", i), "A", i as i64))
                .collect();
            let ranked = Ranker::new(limit).process(articles);
            assert_eq!(ranked.len(), count.min(limit), "count={} limit={}", count, limit);
        }
    }
}

#[test]
fn test_ranker_sorts_descending_and_is_stable() {
    let articles = vec![
        article("Old", "A", 0),
        article("Tie first", "A", 30),
        article("Newest", "B", 60),
        article("Tie second", "B", 30),
        article("Tie third", "C", 30),
    ];

    let ranked = Ranker::new(10).process(articles);

    for pair in ranked.windows(2) {
        assert!(pair[0].published_at >= pair[1].published_at);
    }
    let titles: Vec<&str> = ranked.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Newest", "Tie first", "Tie second", "Tie third", "Old"]
    );
}

#[test]
fn test_summary_of_eighty_words_is_cut_to_fifty() {
    let mut long = article("Long read", "A", 0);
    long.raw_body = words(80);

    let summary = Summarizer::new(50).summarize(&long);

    assert_eq!(word_count(&summary), 50);
    assert!(summary.ends_with(&format!("word50{}", TRUNCATION_MARKER)));
    assert!(!summary.contains("word51"));
}

#[test]
fn test_summary_within_limit_is_normalized_text() {
    let mut short = article("Short", "A", 0);
    short.raw_body = "  Bitcoin  rallied\n\tovernight as ETF inflows grew.  ".to_string();

    let summary = Summarizer::new(50).summarize(&short);

    assert_eq!(summary, "Bitcoin rallied overnight as ETF inflows grew.");
}

#[test]
fn test_summary_falls_back_to_title() {
    let mut untitled_body = article("Ripple wins appeal", "A", 0);
    untitled_body.raw_body = "   ".to_string();

    let summary = Summarizer::new(50).summarize(&untitled_body);

    assert_eq!(summary, "Ripple wins appeal");
}

#[test]
fn test_summary_title_fallback_is_also_bounded() {
    let mut long_title = article(&words(12), "A", 0);
    long_title.raw_body.clear();

    let summary = Summarizer::new(5).summarize(&long_title);

    assert_eq!(summary, format!("word1 word2 word3 word4 word5{}", TRUNCATION_MARKER));
}

#[test]
fn test_summarizer_stage_sets_every_summary_within_bound() {
    let mut articles = vec![
        article("A", "X", 0),
        article("B", "X", 1),
        article("C", "X", 2),
    ];
    articles[0].raw_body = words(3);
    articles[1].raw_body = words(49);
    articles[2].raw_body = words(200);

    let summarized = Summarizer::new(20).process(articles);

    for a in &summarized {
        let summary = a.summary.as_deref().expect("summary set");
        assert!(!summary.is_empty());
        assert!(word_count(summary) <= 20);
    }
    assert_eq!(summarized[0].summary.as_deref(), Some("word1 word2 word3"));
}

#[test]
fn test_truncate_words_drops_trailing_clause_punctuation() {
    assert_eq!(truncate_words("alpha, beta; gamma delta", 2), "alpha, beta...");
    assert_eq!(truncate_words("exactly three words", 3), "exactly three words");
    assert_eq!(truncate_words("", 5), "");
}

#[test]
fn test_zero_word_limit_is_raised_to_one() {
    let summarizer = Summarizer::new(0);
    assert_eq!(summarizer.word_limit(), 1);

    let summary = summarizer.summarize(&article("Markets slide", "A", 0));
    assert_eq!(word_count(&summary), 1);
}

#[test]
fn test_html_text_keeps_bare_angle_brackets() {
    assert_eq!(extract_text_from_html("BTC < $60K, ETH <3"), "BTC < $60K, ETH <3");
    assert_eq!(
        extract_text_from_html("<p>Fees &lt; 1 gwei</p><br/>for <b>L2s</b>"),
        "Fees < 1 gwei for L2s"
    );
}

#[test]
fn test_html_text_decodes_named_and_numeric_entities() {
    assert_eq!(
        extract_text_from_html("Rally &#8211; then a dip&hellip; &#x2014; &quot;HODL&quot; &amp; wait"),
        "Rally \u{2013} then a dip\u{2026} \u{2014} \"HODL\" & wait"
    );
}

#[test]
fn test_char_count_marker_is_stripped() {
    assert_eq!(
        strip_char_count_marker("Lawmakers moved the bill\u{2026} [+1234 chars]"),
        "Lawmakers moved the bill\u{2026}"
    );
    assert_eq!(strip_char_count_marker("No marker here"), "No marker here");
    assert_eq!(strip_char_count_marker("Odd [+many chars]"), "Odd [+many chars]");
}
