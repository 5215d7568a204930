//! Duplicate-mention tracking for a single compilation pass.

use crate::models::Article;
use std::collections::HashSet;

/// A set of article identities already quoted in the summary being built.
///
/// The tracker is scoped to one [`SummaryCompiler`](super::SummaryCompiler)
/// run and discarded when compilation ends. It is what prevents, for
/// example, a breaking-news item from being repeated inside its topic
/// block: the first section to process an identity wins.
#[derive(Debug, Default)]
pub struct DeduplicationTracker {
    seen: HashSet<String>,
}

impl DeduplicationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this article's identity has already been quoted.
    pub fn seen(&self, article: &Article) -> bool {
        self.seen.contains(&article.identity())
    }

    /// Record this article's identity as quoted.
    pub fn mark(&mut self, article: &Article) {
        self.seen.insert(article.identity());
    }
}
