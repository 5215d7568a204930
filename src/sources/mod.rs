//! Article sources feeding the news collection.
//!
//! Each submodule scrapes one kind of origin into [`SourceGroup`]s:
//!
//! | Origin | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | News websites | [`website`] | HTML scraping | CSS selector with regex fallback |
//! | Reddit | [`reddit`] | Public JSON listing | No OAuth, descriptive User-Agent |
//! | Telegram | [`telegram`] | `t.me/s/` preview scraping | Public channels only |
//!
//! # Common Patterns
//!
//! Every scraper returns a [`SourceGroup`] rather than a `Result`: a
//! failed origin degrades to `success=false` with zero articles and the
//! run continues. Groups are collected concurrently but kept in
//! configuration order, which later becomes the section order inside the
//! compiled summary.

pub mod reddit;
pub mod telegram;
pub mod website;

use crate::config::PipelineConfig;
use crate::models::NewsCollection;
use futures::future::join_all;
use reqwest::Client;
use tracing::{info, instrument};

/// Scrape every configured origin and assemble the run's [`NewsCollection`].
#[instrument(level = "info", skip_all)]
pub async fn collect_news(
    client: &Client,
    config: &PipelineConfig,
    include_reddit: bool,
    include_telegram: bool,
) -> NewsCollection {
    let scraped_at = chrono::Utc::now().to_rfc3339();

    let websites = join_all(
        config
            .websites
            .iter()
            .map(|site| website::scrape_site(client, site, config.max_per_site, &scraped_at)),
    )
    .await;

    let reddit = if include_reddit {
        join_all(
            config
                .subreddits
                .iter()
                .map(|sub| reddit::scrape_subreddit(client, sub, &scraped_at)),
        )
        .await
    } else {
        Vec::new()
    };

    let telegram = if include_telegram {
        join_all(
            config
                .channels
                .iter()
                .map(|channel| telegram::scrape_channel(client, channel, &scraped_at)),
        )
        .await
    } else {
        Vec::new()
    };

    let collection = NewsCollection::from_groups(websites, reddit, telegram, scraped_at);
    info!(
        websites = collection.websites.len(),
        reddit = collection.reddit.len(),
        telegram = collection.telegram.len(),
        total_articles = collection.total_articles(),
        "Collected news from all sources"
    );
    collection
}
