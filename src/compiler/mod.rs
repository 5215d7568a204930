//! Compilation of a [`NewsCollection`] into one narrated-ready summary.
//!
//! The compiler runs a single deterministic pass over the collection and
//! produces the digest text in a fixed section order:
//!
//! 1. Timestamp and source-count preamble
//! 2. Breaking news (up to 3 items)
//! 3. Topic blocks (topics with at least 2 matching articles)
//! 4. Per-website blocks (up to 2 items each)
//! 5. Per-subreddit blocks (up to 2 items each)
//! 6. Per-channel blocks (up to 2 items each)
//! 7. Closing sentence
//!
//! Every quoted item gets a number from one global counter shared across
//! sections, and a [`DeduplicationTracker`] guarantees no title+link
//! identity is read out twice: the first section to reach an article wins.
//! The compiler is total over well-formed collections; the worst outcome
//! for an empty run is a minimal but grammatically complete summary.

pub mod breaking;
pub mod dedup;
pub mod topics;

use crate::models::{Article, NewsCollection, SourceGroup};
use crate::sanitize::{clean_fragment, strip_urls};
use chrono::DateTime;
use dedup::DeduplicationTracker;
use std::fmt::Write;
use tracing::{debug, instrument};

/// At most this many articles are quoted per topic block.
pub const MAX_PER_TOPIC: usize = 3;
/// At most this many articles are quoted per source group block.
pub const MAX_PER_GROUP: usize = 2;
/// A topic block is only emitted when at least this many articles match.
pub const MIN_TOPIC_ARTICLES: usize = 2;

/// Spoken in place of the date when the batch timestamp cannot be parsed.
const TIMESTAMP_PLACEHOLDER: &str = "the latest edition";

/// Compile a collection into the final narrated-ready summary text.
///
/// This is the only entry point; the compiler instance and its tracker
/// live exactly as long as this call.
#[instrument(level = "info", skip_all, fields(articles = collection.total_articles()))]
pub fn compile(collection: &NewsCollection) -> String {
    SummaryCompiler::new().run(collection)
}

/// Single-use compiler state: the output buffer, the dedup tracker, and
/// the global item counter threaded through every section.
struct SummaryCompiler {
    out: String,
    tracker: DeduplicationTracker,
    counter: usize,
}

impl SummaryCompiler {
    fn new() -> Self {
        Self {
            out: String::new(),
            tracker: DeduplicationTracker::new(),
            counter: 0,
        }
    }

    fn run(mut self, collection: &NewsCollection) -> String {
        self.push_preamble(collection);
        self.push_breaking(collection);
        self.push_topics(collection);
        self.push_website_groups(&collection.websites);
        self.push_reddit_groups(&collection.reddit);
        self.push_telegram_groups(&collection.telegram);
        self.push_closing();

        debug!(items = self.counter, "Summary compiled");
        // URLs must not be narrated; one stripping pass over the whole
        // text catches domain mentions embedded in titles and summaries.
        strip_urls(&self.out)
    }

    fn push_preamble(&mut self, collection: &NewsCollection) {
        writeln!(
            self.out,
            "Good day! Here is your news update for {}.",
            format_run_timestamp(&collection.scraped_at)
        )
        .unwrap();

        let mut sources = count_noun(collection.websites.len(), "website", "websites");
        if !collection.reddit.is_empty() {
            write!(
                sources,
                ", {}",
                count_noun(collection.reddit.len(), "Reddit community", "Reddit communities")
            )
            .unwrap();
        }
        if !collection.telegram.is_empty() {
            write!(
                sources,
                " and {}",
                count_noun(collection.telegram.len(), "Telegram channel", "Telegram channels")
            )
            .unwrap();
        }
        writeln!(
            self.out,
            "Today's digest covers {}, with a total of {}.",
            sources,
            count_noun(collection.total_articles(), "article", "articles")
        )
        .unwrap();
    }

    fn push_breaking(&mut self, collection: &NewsCollection) {
        let mut block = String::new();
        for hit in breaking::detect(&collection.all_articles) {
            if self.tracker.seen(hit) {
                continue;
            }
            self.tracker.mark(hit);
            self.counter += 1;
            block.push_str(&self.numbered_item(hit, true));
        }
        if !block.is_empty() {
            self.out.push_str("We begin with the breaking news.\n");
            self.out.push_str(&block);
        }
    }

    fn push_topics(&mut self, collection: &NewsCollection) {
        // Bucket articles by label, preserving both taxonomy order and
        // each article's position within the input.
        let mut buckets: Vec<Vec<&Article>> = vec![Vec::new(); topics::TAXONOMY.len()];
        for article in &collection.all_articles {
            if let Some(label) = topics::classify(article) {
                let index = topics::TAXONOMY
                    .iter()
                    .position(|(name, _)| *name == label)
                    .unwrap();
                buckets[index].push(article);
            }
        }

        for ((label, _), bucket) in topics::TAXONOMY.iter().zip(&buckets) {
            if bucket.len() < MIN_TOPIC_ARTICLES {
                continue;
            }
            let mut block = String::new();
            let mut quoted = 0;
            for article in bucket {
                if quoted == MAX_PER_TOPIC {
                    break;
                }
                if self.tracker.seen(article) {
                    continue;
                }
                self.tracker.mark(article);
                self.counter += 1;
                quoted += 1;
                block.push_str(&self.numbered_item(article, false));
            }
            if !block.is_empty() {
                writeln!(self.out, "In {label} news:").unwrap();
                self.out.push_str(&block);
            }
        }
    }

    fn push_website_groups(&mut self, groups: &[SourceGroup]) {
        for group in groups.iter().filter(|g| g.success) {
            let domain = group.name.trim_start_matches("www.");
            let label = format!("From {}:", clean_fragment(domain));
            self.push_group_block(group, &label, None);
        }
    }

    fn push_reddit_groups(&mut self, groups: &[SourceGroup]) {
        let mut prefix = Some("From Reddit communities.");
        for group in groups.iter().filter(|g| g.success) {
            let label = format!("In r/{}:", clean_fragment(&group.name));
            self.push_group_block(group, &label, prefix.take());
        }
    }

    fn push_telegram_groups(&mut self, groups: &[SourceGroup]) {
        let mut prefix = Some("From Telegram channels.");
        for group in groups.iter().filter(|g| g.success) {
            let label = format!("In {}:", clean_fragment(&group.name));
            self.push_group_block(group, &label, prefix.take());
        }
    }

    /// Emit up to [`MAX_PER_GROUP`] unseen articles from one source group.
    ///
    /// The label, and the aggregate prefix when one is pending, are only
    /// written when the group actually contributes an item, so empty
    /// sections leave no stray headers behind. An unused `prefix` is
    /// dropped here but offered again by the caller for the next group.
    fn push_group_block(&mut self, group: &SourceGroup, label: &str, prefix: Option<&str>) {
        let mut block = String::new();
        let mut quoted = 0;
        for article in &group.articles {
            if quoted == MAX_PER_GROUP {
                break;
            }
            if self.tracker.seen(article) {
                continue;
            }
            self.tracker.mark(article);
            self.counter += 1;
            quoted += 1;
            block.push_str(&self.numbered_item(article, false));
        }
        if !block.is_empty() {
            if let Some(prefix) = prefix {
                self.out.push_str(prefix);
                self.out.push('\n');
            }
            self.out.push_str(label);
            self.out.push('\n');
            self.out.push_str(&block);
        }
    }

    /// One numbered line: the global counter, the sanitized title, and
    /// optionally the sanitized summary as a follow-on sentence.
    fn numbered_item(&self, article: &Article, include_summary: bool) -> String {
        let mut line = format!("{}. {}", self.counter, end_sentence(&clean_fragment(&article.title)));
        if include_summary {
            let summary = clean_fragment(&article.summary);
            if !summary.is_empty() {
                line.push(' ');
                line.push_str(&end_sentence(&summary));
            }
        }
        line.push('\n');
        line
    }

    fn push_closing(&mut self) {
        self.out
            .push_str("That concludes this news update. Stay informed, and see you in the next edition.\n");
    }
}

/// Human-readable weekday/date/time for the preamble, falling back to a
/// fixed placeholder when the batch timestamp cannot be parsed.
fn format_run_timestamp(scraped_at: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(scraped_at.trim()) {
        return dt.format("%A, %B %-d, %Y at %-I:%M %p").to_string();
    }
    TIMESTAMP_PLACEHOLDER.to_string()
}

/// The digest is read aloud, so counts pick the right noun form.
fn count_noun(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Close a fragment as a spoken sentence unless it already ends with
/// terminal punctuation.
fn end_sentence(fragment: &str) -> String {
    match fragment.chars().last() {
        Some('.') | Some('!') | Some('?') | Some(';') | Some(':') => fragment.to_string(),
        _ => format!("{fragment}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;

    fn article(title: &str, link: &str, source: SourceKind) -> Article {
        Article {
            title: title.to_string(),
            link: link.to_string(),
            summary: String::new(),
            source,
            scraped_at: "2025-06-01T09:00:00Z".to_string(),
            subreddit: None,
            channel: None,
            score: None,
            views: None,
            hashtags: Vec::new(),
        }
    }

    fn group(name: &str, articles: Vec<Article>) -> SourceGroup {
        SourceGroup {
            name: name.to_string(),
            success: true,
            articles,
        }
    }

    fn collection(
        websites: Vec<SourceGroup>,
        reddit: Vec<SourceGroup>,
        telegram: Vec<SourceGroup>,
    ) -> NewsCollection {
        NewsCollection::from_groups(
            websites,
            reddit,
            telegram,
            "2025-06-01T09:30:00+04:00".to_string(),
        )
    }

    /// Extract the global item numbers from a compiled summary, in order.
    fn item_numbers(summary: &str) -> Vec<usize> {
        summary
            .lines()
            .filter_map(|line| {
                let (digits, rest) = line.split_at(line.find('.')?);
                if rest.starts_with(". ") {
                    digits.parse().ok()
                } else {
                    None
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_collection_yields_minimal_complete_summary() {
        let summary = compile(&collection(vec![], vec![], vec![]));

        assert!(summary.contains("0 websites"));
        assert!(summary.contains("total of 0 articles"));
        assert!(summary.contains("That concludes this news update"));
        assert!(item_numbers(&summary).is_empty());
        assert!(!summary.contains("Reddit communities,"));
        assert!(!summary.contains("Telegram channels,"));
    }

    #[test]
    fn test_unparsable_timestamp_uses_placeholder() {
        let mut c = collection(vec![], vec![], vec![]);
        c.scraped_at = "not a timestamp".to_string();
        let summary = compile(&c);
        assert!(summary.contains("the latest edition"));
    }

    #[test]
    fn test_numbering_is_gapless_and_strictly_increasing() {
        let websites = vec![group(
            "gulfnews.com",
            vec![
                article("Crash closes major road", "https://g.com/1", SourceKind::Website),
                article("Emirates flight sets record", "https://g.com/2", SourceKind::Website),
                article("Etihad airline opens lounge", "https://g.com/3", SourceKind::Website),
                article("Quiet story one", "https://g.com/4", SourceKind::Website),
                article("Quiet story two", "https://g.com/5", SourceKind::Website),
            ],
        )];
        let reddit = vec![group(
            "dubai",
            vec![
                article("Best brunch spots?", "https://r.com/1", SourceKind::Reddit),
                article("Metro card question", "https://r.com/2", SourceKind::Reddit),
            ],
        )];
        let summary = compile(&collection(websites, reddit, vec![]));

        let numbers = item_numbers(&summary);
        assert!(!numbers.is_empty());
        let expected: Vec<usize> = (1..=numbers.len()).collect();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn test_duplicate_identity_across_sources_is_quoted_once() {
        let shared_title = "UAE announces new visa rules";
        let websites = vec![group(
            "gulfnews.com",
            vec![article(shared_title, "", SourceKind::Website)],
        )];
        let reddit = vec![group(
            "dubai",
            vec![article(shared_title, "", SourceKind::Reddit)],
        )];
        let summary = compile(&collection(websites, reddit, vec![]));

        // The two copies share one identity, so a single numbered mention
        // survives. "visa" classifies as Travel and the duplicate pushes
        // the topic over its threshold, so the mention lands in the Travel
        // block, which compiles before either per-source section.
        assert_eq!(summary.matches(shared_title).count(), 1);
        assert!(summary.contains("In Travel news:"));
        assert!(!summary.contains("From gulfnews.com:"));
        assert!(!summary.contains("From Reddit communities."));
    }

    #[test]
    fn test_earlier_section_wins_group_level_duplicate() {
        // No topic keywords, so the duplicate is contested between the
        // website and Reddit sections; websites compile first.
        let shared_title = "Residents queue overnight for brunch deals";
        let websites = vec![group(
            "gulfnews.com",
            vec![article(shared_title, "", SourceKind::Website)],
        )];
        let reddit = vec![group(
            "dubai",
            vec![article(shared_title, "", SourceKind::Reddit)],
        )];
        let summary = compile(&collection(websites, reddit, vec![]));

        assert_eq!(summary.matches(shared_title).count(), 1);
        assert!(summary.contains("From gulfnews.com:"));
        assert!(!summary.contains("From Reddit communities."));
        assert!(!summary.contains("In r/dubai:"));
    }

    #[test]
    fn test_breaking_block_wins_over_topic_block() {
        let websites = vec![group(
            "gulfnews.com",
            vec![
                article(
                    "BREAKING: Flight diverted after emergency landing",
                    "https://g.com/1",
                    SourceKind::Website,
                ),
                article("Airline adds Osaka airport route", "https://g.com/2", SourceKind::Website),
                article("Airport expansion gets approval", "https://g.com/3", SourceKind::Website),
            ],
        )];
        let summary = compile(&collection(websites, vec![], vec![]));

        assert!(summary.contains("We begin with the breaking news."));
        assert!(summary.contains("In Aviation news:"));
        assert_eq!(summary.matches("Flight diverted").count(), 1);

        // The breaking item is numbered before the topic block starts.
        let breaking_pos = summary.find("Flight diverted").unwrap();
        let topic_pos = summary.find("In Aviation news:").unwrap();
        assert!(breaking_pos < topic_pos);
    }

    #[test]
    fn test_topic_block_requires_two_matching_articles() {
        let websites = vec![group(
            "gulfnews.com",
            vec![
                article("Cricket season opens", "https://g.com/1", SourceKind::Website),
                article("Unrelated quiet story", "https://g.com/2", SourceKind::Website),
            ],
        )];
        let summary = compile(&collection(websites, vec![], vec![]));
        assert!(!summary.contains("In Sports news:"));
    }

    #[test]
    fn test_www_prefix_stripped_from_website_label() {
        let websites = vec![group(
            "www.example.com",
            vec![
                article("Story one", "https://example.com/1", SourceKind::Website),
                article("Story two", "https://example.com/2", SourceKind::Website),
                article("Story three", "https://example.com/3", SourceKind::Website),
            ],
        )];
        let summary = compile(&collection(websites, vec![], vec![]));

        assert!(summary.contains("From example.com:"));
        assert!(!summary.contains("www.example.com"));
        // Per-group cap: at most 2 of the 3 articles quoted.
        assert_eq!(item_numbers(&summary).len(), 2);
    }

    #[test]
    fn test_group_cap_skips_seen_without_consuming_numbers() {
        // Four aviation articles: three go to the topic block, the
        // website block then quotes the remaining unseen one.
        let websites = vec![group(
            "gulfnews.com",
            vec![
                article("Emirates opens new route", "https://g.com/1", SourceKind::Website),
                article("Etihad airline results", "https://g.com/2", SourceKind::Website),
                article("Airport traffic up", "https://g.com/3", SourceKind::Website),
                article("Runway upgrade finished", "https://g.com/4", SourceKind::Website),
            ],
        )];
        let summary = compile(&collection(websites, vec![], vec![]));

        assert_eq!(item_numbers(&summary), vec![1, 2, 3, 4]);
        let from_pos = summary.find("From gulfnews.com:").unwrap();
        assert!(summary[from_pos..].contains("4. Runway upgrade finished."));
    }

    #[test]
    fn test_reddit_aggregate_prefix_emitted_once() {
        let reddit = vec![
            group(
                "dubai",
                vec![article("Rent advice thread", "https://r.com/1", SourceKind::Reddit)],
            ),
            group(
                "abudhabi",
                vec![article("Corniche photos", "https://r.com/2", SourceKind::Reddit)],
            ),
        ];
        let summary = compile(&collection(vec![], reddit, vec![]));

        assert_eq!(summary.matches("From Reddit communities.").count(), 1);
        assert!(summary.contains("In r/dubai:"));
        assert!(summary.contains("In r/abudhabi:"));
    }

    #[test]
    fn test_telegram_section_mirrors_reddit_shape() {
        let telegram = vec![group(
            "dubaionline",
            vec![
                article("Road closure announced", "https://t.me/dubaionline/1", SourceKind::Telegram),
                article("Fuel prices for June", "https://t.me/dubaionline/2", SourceKind::Telegram),
            ],
        )];
        let summary = compile(&collection(vec![], vec![], telegram));

        assert!(summary.contains("From Telegram channels."));
        assert!(summary.contains("In dubaionline:"));
        assert_eq!(item_numbers(&summary).len(), 2);
    }

    #[test]
    fn test_breaking_item_includes_nonempty_summary() {
        let mut hit = article(
            "Urgent: storm warning issued",
            "https://g.com/1",
            SourceKind::Website,
        );
        hit.summary = "Residents advised to avoid coastal areas".to_string();
        let websites = vec![group("gulfnews.com", vec![hit])];
        let summary = compile(&collection(websites, vec![], vec![]));

        assert!(summary.contains("1. Urgent: storm warning issued"));
        assert!(summary.contains("Residents advised to avoid coastal areas."));
    }

    #[test]
    fn test_compiled_summary_contains_no_urls() {
        let websites = vec![group(
            "gulfnews.com",
            vec![
                article(
                    "Read the full report at https://gulfnews.com/uae/report",
                    "https://gulfnews.com/uae/report",
                    SourceKind::Website,
                ),
                article("Visit www.example.org for details", "", SourceKind::Website),
            ],
        )];
        let summary = compile(&collection(websites, vec![], vec![]));

        assert!(!summary.contains("http"));
        assert!(!summary.contains("www."));
    }

    #[test]
    fn test_failed_groups_counted_but_contribute_nothing() {
        let websites = vec![
            SourceGroup::failed("khaleejtimes.com"),
            group(
                "gulfnews.com",
                vec![article("Only story", "https://g.com/1", SourceKind::Website)],
            ),
        ];
        let summary = compile(&collection(websites, vec![], vec![]));

        assert!(summary.contains("2 websites"));
        assert!(summary.contains("total of 1 article."));
        assert!(!summary.contains("1 articles"));
        assert!(!summary.contains("khaleejtimes"));
    }

    #[test]
    fn test_preamble_uses_singular_nouns_for_single_counts() {
        let websites = vec![group(
            "gulfnews.com",
            vec![article("Only story", "https://g.com/1", SourceKind::Website)],
        )];
        let reddit = vec![group(
            "dubai",
            vec![article("Only post", "https://r.com/1", SourceKind::Reddit)],
        )];
        let telegram = vec![group(
            "dubaionline",
            vec![article("Only message", "https://t.me/dubaionline/1", SourceKind::Telegram)],
        )];
        let summary = compile(&collection(websites, reddit, telegram));

        assert!(summary.contains("1 website, 1 Reddit community and 1 Telegram channel"));
        assert!(summary.contains("total of 3 articles"));
    }

    #[test]
    fn test_format_run_timestamp_parses_rfc3339() {
        let formatted = format_run_timestamp("2025-06-01T09:30:00+04:00");
        assert!(formatted.contains("Sunday"));
        assert!(formatted.contains("June 1, 2025"));
        assert!(formatted.contains("9:30 AM"));
    }

    #[test]
    fn test_end_sentence_appends_period_once() {
        assert_eq!(end_sentence("Hello"), "Hello.");
        assert_eq!(end_sentence("Hello."), "Hello.");
        assert_eq!(end_sentence("Really?"), "Really?");
    }
}
