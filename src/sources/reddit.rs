//! Subreddit post fetcher.
//!
//! Uses Reddit's public JSON listing endpoint — no OAuth needed for
//! reading new posts — with a descriptive User-Agent as the API rules
//! require. Each post becomes an [`Article`] carrying the post title,
//! outbound URL, a truncated selftext excerpt, and the score.

use crate::models::{Article, SourceGroup, SourceKind};
use serde::Deserialize;
use tracing::{error, info, instrument};

/// Posts requested per subreddit.
const LISTING_LIMIT: usize = 20;

/// Selftext excerpts are truncated to this many characters.
const SUMMARY_MAX_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RedditPost,
}

#[derive(Debug, Deserialize)]
struct RedditPost {
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    score: i64,
}

/// Scrape one subreddit's newest posts into a [`SourceGroup`].
#[instrument(level = "info", skip_all, fields(%subreddit))]
pub async fn scrape_subreddit(
    client: &reqwest::Client,
    subreddit: &str,
    scraped_at: &str,
) -> SourceGroup {
    let listing_url = format!(
        "https://www.reddit.com/r/{subreddit}/new.json?limit={LISTING_LIMIT}"
    );

    let body = match fetch_listing(client, &listing_url).await {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, %subreddit, "Reddit listing fetch failed");
            return SourceGroup::failed(subreddit);
        }
    };

    match parse_listing(&body, subreddit, scraped_at) {
        Ok(articles) => {
            info!(count = articles.len(), %subreddit, "Fetched subreddit posts");
            SourceGroup {
                name: subreddit.to_string(),
                success: true,
                articles,
            }
        }
        Err(e) => {
            error!(error = %e, %subreddit, "Reddit listing did not parse");
            SourceGroup::failed(subreddit)
        }
    }
}

async fn fetch_listing(client: &reqwest::Client, url: &str) -> Result<String, reqwest::Error> {
    client.get(url).send().await?.error_for_status()?.text().await
}

/// Map a raw listing response to articles.
fn parse_listing(
    body: &str,
    subreddit: &str,
    scraped_at: &str,
) -> Result<Vec<Article>, serde_json::Error> {
    let listing: Listing = serde_json::from_str(body)?;
    Ok(listing
        .data
        .children
        .into_iter()
        .map(|child| {
            let post = child.data;
            Article {
                title: post.title,
                link: post.url,
                summary: truncate_chars(&post.selftext, SUMMARY_MAX_CHARS),
                source: SourceKind::Reddit,
                scraped_at: scraped_at.to_string(),
                subreddit: Some(subreddit.to_string()),
                channel: None,
                score: Some(post.score),
                views: None,
                hashtags: Vec::new(),
            }
        })
        .collect())
}

/// Truncate on a character (not byte) boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
