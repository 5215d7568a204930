//! Keyword-based topic classification.
//!
//! The taxonomy is a static ordered list of (label, keywords) pairs.
//! Matching is a case-insensitive substring search against the article's
//! title and summary; the first topic with any keyword hit wins, so the
//! declaration order below doubles as the tie-break for articles that
//! would match several topics. Articles matching nothing stay
//! unclassified and are excluded from topic-block output.

use crate::models::Article;

/// Ordered topic taxonomy. Declaration order is both the iteration order
/// for topic blocks and the tie-break for multi-topic articles.
pub const TAXONOMY: &[(&str, &[&str])] = &[
    (
        "Aviation",
        &["flight", "airline", "airport", "emirates", "etihad", "aviation", "runway", "pilot"],
    ),
    (
        "Business",
        &["business", "economy", "market", "investment", "bank", "dirham", "trade", "startup", "profit"],
    ),
    (
        "Travel",
        &["visa", "tourism", "tourist", "hotel", "travel", "resort", "holiday"],
    ),
    (
        "Technology",
        &["technology", "tech", "artificial intelligence", "digital", "cyber", "software", "smartphone", "robot"],
    ),
    (
        "Government",
        &["government", "ministry", "sheikh", "ruler", "law", "regulation", "federal", "municipality"],
    ),
    (
        "Sports",
        &["football", "cricket", "tennis", "formula", "race", "sport", "stadium", "championship"],
    ),
    (
        "Entertainment",
        &["concert", "festival", "cinema", "music", "celebrity", "entertainment", "exhibition"],
    ),
];

/// Classify an article into at most one topic label.
///
/// Pure and deterministic: the same article always yields the same label,
/// independent of any other call.
pub fn classify(article: &Article) -> Option<&'static str> {
    let haystack = format!("{} {}", article.title, article.summary).to_lowercase();
    TAXONOMY
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(label, _)| *label)
}
