//! Public Telegram channel scraper.
//!
//! Public channels expose a server-rendered preview at `t.me/s/{channel}`
//! that needs no API credentials or session. Each message widget on that
//! page becomes an [`Article`]: the first line of the message text is the
//! title, the remainder the summary, with the view counter and message
//! link carried through when present.

use crate::models::{Article, SourceGroup, SourceKind};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{error, info, instrument};

static HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").unwrap());

/// At most this many messages are kept per channel, newest first.
const MESSAGE_SCAN_LIMIT: usize = 50;

/// Message titles are cut at this many characters.
const TITLE_MAX_CHARS: usize = 120;

/// Summaries are cut at this many characters.
const SUMMARY_MAX_CHARS: usize = 300;

/// Scrape one public channel's preview page into a [`SourceGroup`].
#[instrument(level = "info", skip_all, fields(%channel))]
pub async fn scrape_channel(client: &Client, channel: &str, scraped_at: &str) -> SourceGroup {
    let preview_url = format!("https://t.me/s/{channel}");

    let html = match fetch_preview(client, &preview_url).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, %channel, "Telegram preview fetch failed");
            return SourceGroup::failed(channel);
        }
    };

    let articles = extract_messages(&html, channel, scraped_at);
    if articles.is_empty() {
        // A page without message widgets usually means the channel is
        // private or does not exist.
        error!(%channel, "Telegram preview contained no messages");
        return SourceGroup::failed(channel);
    }

    info!(count = articles.len(), %channel, "Fetched channel messages");
    SourceGroup {
        name: channel.to_string(),
        success: true,
        articles,
    }
}

async fn fetch_preview(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    client.get(url).send().await?.error_for_status()?.text().await
}

/// Extract message articles from a channel preview page, newest first.
fn extract_messages(html: &str, channel: &str, scraped_at: &str) -> Vec<Article> {
    let document = Html::parse_document(html);
    let message_selector = Selector::parse(".tgme_widget_message").unwrap();
    let text_selector = Selector::parse(".tgme_widget_message_text").unwrap();
    let views_selector = Selector::parse(".tgme_widget_message_views").unwrap();

    let mut articles: Vec<Article> = document
        .select(&message_selector)
        .filter_map(|message| {
            let text = message
                .select(&text_selector)
                .next()?
                .text()
                .collect::<Vec<_>>()
                .join(" ");
            let text = text.trim();
            if text.is_empty() {
                return None;
            }

            let (title, summary) = split_message(text);
            let views = message
                .select(&views_selector)
                .next()
                .and_then(|v| parse_view_count(&v.text().collect::<String>()));
            let link = message
                .value()
                .attr("data-post")
                .map(|post| format!("https://t.me/{post}"))
                .unwrap_or_default();

            Some(Article {
                title,
                link,
                summary,
                source: SourceKind::Telegram,
                scraped_at: scraped_at.to_string(),
                subreddit: None,
                channel: Some(channel.to_string()),
                score: None,
                views,
                hashtags: extract_hashtags(text),
            })
        })
        .collect();

    // The preview renders oldest to newest top-to-bottom.
    articles.reverse();
    articles.truncate(MESSAGE_SCAN_LIMIT);
    articles
}

/// First line (capped) becomes the title, the rest the summary.
fn split_message(text: &str) -> (String, String) {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default().trim();
    let rest = lines.collect::<Vec<_>>().join(" ");

    if first.chars().count() > TITLE_MAX_CHARS {
        let title: String = first.chars().take(TITLE_MAX_CHARS).collect();
        let tail: String = first.chars().skip(TITLE_MAX_CHARS).collect();
        let summary = format!("{} {}", tail.trim(), rest);
        (title, truncate_chars(summary.trim(), SUMMARY_MAX_CHARS))
    } else {
        (
            first.to_string(),
            truncate_chars(rest.trim(), SUMMARY_MAX_CHARS),
        )
    }
}

/// Truncate on a character (not byte) boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Hashtags in the message text, without the `#`, in order of appearance.
fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Parse Telegram's abbreviated view counters: "534", "1.2K", "3.4M".
fn parse_view_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let (digits, multiplier) = match raw.chars().last() {
        Some('K') | Some('k') => (&raw[..raw.len() - 1], 1_000.0),
        Some('M') | Some('m') => (&raw[..raw.len() - 1], 1_000_000.0),
        _ => (raw, 1.0),
    };
    let value: f64 = digits.trim().parse().ok()?;
    Some((value * multiplier) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREVIEW: &str = r#"
        <html><body>
          <div class="tgme_widget_message" data-post="dubaionline/4521">
            <div class="tgme_widget_message_text">Road closure on Al Khail Road this weekend
Expect delays between exits 41 and 45 during resurfacing work.</div>
            <span class="tgme_widget_message_views">1.2K</span>
          </div>
          <div class="tgme_widget_message" data-post="dubaionline/4522">
            <div class="tgme_widget_message_text">Fuel prices announced for June</div>
            <span class="tgme_widget_message_views">534</span>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_messages_newest_first() {
        let articles = extract_messages(PREVIEW, "dubaionline", "2025-06-01T09:00:00Z");

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Fuel prices announced for June");
        assert_eq!(articles[1].title, "Road closure on Al Khail Road this weekend");
    }

    #[test]
    fn test_message_fields_carried_through() {
        let articles = extract_messages(PREVIEW, "dubaionline", "2025-06-01T09:00:00Z");
        let older = &articles[1];

        assert_eq!(older.link, "https://t.me/dubaionline/4521");
        assert_eq!(older.views, Some(1200));
        assert_eq!(older.channel.as_deref(), Some("dubaionline"));
        assert_eq!(older.source, SourceKind::Telegram);
        assert!(older.summary.starts_with("Expect delays"));
    }

    #[test]
    fn test_empty_page_yields_no_messages() {
        assert!(extract_messages("<html></html>", "x", "now").is_empty());
    }

    #[test]
    fn test_long_first_line_spills_into_summary() {
        let long_line = "word ".repeat(60);
        let (title, summary) = split_message(&long_line);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_hashtags_extracted_from_message_text() {
        let tags = extract_hashtags("Traffic update #dubai #rta for the weekend");
        assert_eq!(tags, vec!["dubai", "rta"]);
        assert!(extract_hashtags("no tags here").is_empty());
    }

    #[test]
    fn test_parse_view_count_variants() {
        assert_eq!(parse_view_count("534"), Some(534));
        assert_eq!(parse_view_count("1.2K"), Some(1200));
        assert_eq!(parse_view_count("3.4M"), Some(3_400_000));
        assert_eq!(parse_view_count(""), None);
        assert_eq!(parse_view_count("n/a"), None);
    }
}
