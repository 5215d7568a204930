//! Data models for scraped articles and the per-run news collection.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`Article`]: One normalized content unit (website story, Reddit post,
//!   or Telegram message)
//! - [`SourceKind`]: Which kind of origin produced an article
//! - [`SourceGroup`]: The result of scraping one named origin
//! - [`NewsCollection`]: Everything gathered in a single pipeline run
//!
//! Articles are immutable once produced. Deduplication across summary
//! sections uses the title+link composite returned by [`Article::identity`].

use serde::{Deserialize, Serialize};

/// The kind of origin an article was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A news website homepage.
    Website,
    /// A subreddit post listing.
    Reddit,
    /// A public Telegram channel.
    Telegram,
}

/// One scraped content unit, normalized to a common shape.
///
/// Producers truncate `summary` to roughly 300 characters. `link` may be
/// empty for fallback-scraped items where no URL could be recovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// The article title or headline.
    pub title: String,
    /// The article URL. May be empty; not guaranteed unique.
    #[serde(default)]
    pub link: String,
    /// Free-text summary or excerpt. May be empty.
    #[serde(default)]
    pub summary: String,
    /// Which kind of origin produced this article.
    pub source: SourceKind,
    /// When the article was scraped, as an ISO-8601 string. Informational
    /// only; never used for ordering.
    pub scraped_at: String,
    /// Subreddit name, for Reddit posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    /// Channel name, for Telegram messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Post score, for Reddit posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    /// View count, for Telegram messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    /// Hashtags found in the message text, for Telegram messages. Carried
    /// through to the collection dump; never narrated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hashtags: Vec<String>,
}

impl Article {
    /// The deduplication key for this article: title and link concatenated,
    /// with link defaulting to the empty string.
    ///
    /// Two articles with identical title+link are treated as the same
    /// narrative unit even when they came from different sources.
    pub fn identity(&self) -> String {
        format!("{}{}", self.title, self.link)
    }
}

/// The result of scraping one named origin (one website, one subreddit,
/// or one channel).
///
/// Failed groups (`success == false`) contribute no articles but are still
/// counted in per-run statistics. A group claiming success with a missing
/// `articles` field deserializes to an empty list rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceGroup {
    /// The origin's display name: website host, subreddit, or channel name.
    pub name: String,
    /// Whether the scrape succeeded.
    pub success: bool,
    /// The articles this origin produced. Empty when the scrape failed.
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl SourceGroup {
    /// A failed group carrying no articles, used when a scrape errors out.
    pub fn failed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            articles: Vec::new(),
        }
    }
}

/// Everything gathered in one pipeline run.
///
/// `all_articles` is the concatenation, in discovery order, of every
/// successful group's articles. It is the input to breaking-news detection
/// and topic classification; the grouped lists drive the per-source
/// summary sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsCollection {
    /// Per-website scrape results, in scrape order.
    #[serde(default)]
    pub websites: Vec<SourceGroup>,
    /// Per-subreddit scrape results, in scrape order.
    #[serde(default)]
    pub reddit: Vec<SourceGroup>,
    /// Per-channel scrape results, in scrape order.
    #[serde(default)]
    pub telegram: Vec<SourceGroup>,
    /// Flattened articles from every successful group, in discovery order.
    #[serde(default)]
    pub all_articles: Vec<Article>,
    /// When this batch was scraped, as an ISO-8601 string.
    pub scraped_at: String,
}

impl NewsCollection {
    /// Assemble a collection from grouped scrape results, flattening every
    /// successful group's articles in discovery order.
    pub fn from_groups(
        websites: Vec<SourceGroup>,
        reddit: Vec<SourceGroup>,
        telegram: Vec<SourceGroup>,
        scraped_at: String,
    ) -> Self {
        let all_articles = websites
            .iter()
            .chain(reddit.iter())
            .chain(telegram.iter())
            .filter(|group| group.success)
            .flat_map(|group| group.articles.iter().cloned())
            .collect();

        Self {
            websites,
            reddit,
            telegram,
            all_articles,
            scraped_at,
        }
    }

    /// Total number of articles across all successful groups.
    pub fn total_articles(&self) -> usize {
        self.all_articles.len()
    }
}
