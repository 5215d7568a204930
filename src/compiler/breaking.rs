//! Urgency detection for breaking-news prioritization.

use crate::models::Article;

/// Titles containing any of these (case-insensitive) are treated as
/// breaking news.
pub const URGENCY_KEYWORDS: &[&str] = &[
    "breaking",
    "urgent",
    "crash",
    "emergency",
    "death",
    "accident",
    "tragedy",
];

/// At most this many items open the summary as breaking news.
pub const MAX_BREAKING_ITEMS: usize = 3;

/// Return the first [`MAX_BREAKING_ITEMS`] articles whose title matches an
/// urgency keyword, in their original relative order.
///
/// No deduplication happens here; the compiler's tracker decides later
/// which hits are actually quoted.
pub fn detect(articles: &[Article]) -> Vec<&Article> {
    articles
        .iter()
        .filter(|article| {
            let title = article.title.to_lowercase();
            URGENCY_KEYWORDS.iter().any(|kw| title.contains(kw))
        })
        .take(MAX_BREAKING_ITEMS)
        .collect()
}
