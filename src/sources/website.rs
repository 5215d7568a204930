//! Website headline scraper.
//!
//! Fetches a configured site's homepage and extracts headline anchors via
//! a CSS selector (configurable per site, with a built-in default covering
//! common headline markup). Relative links are resolved against the page
//! URL. When the selector yields nothing — heavily scripted pages, layout
//! changes — a regex scan over raw anchor text is used as a fallback;
//! fallback items carry an empty `link` since no trustworthy URL can be
//! recovered that way.

use crate::config::WebsiteConfig;
use crate::models::{Article, SourceGroup, SourceKind};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Anchors under common headline markup.
const DEFAULT_HEADLINE_SELECTOR: &str =
    "h1 a[href], h2 a[href], h3 a[href], .headline a[href], article a[href]";

/// Anything shorter than this is navigation chrome, not a headline.
const MIN_TITLE_CHARS: usize = 20;

static FALLBACK_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<a\b[^>]*>([^<]{20,200})</a>").unwrap());

/// Scrape one configured website into a [`SourceGroup`].
///
/// Failures are degraded to a `success=false` group so one broken site
/// never aborts the run.
#[instrument(level = "info", skip_all, fields(url = %site.url))]
pub async fn scrape_site(
    client: &Client,
    site: &WebsiteConfig,
    max_per_site: usize,
    scraped_at: &str,
) -> SourceGroup {
    let name = host_name(&site.url);

    let html = match fetch_homepage(client, &site.url).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, url = %site.url, "Website fetch failed");
            return SourceGroup::failed(name);
        }
    };

    let articles = extract_articles(&html, site, max_per_site, scraped_at);
    info!(count = articles.len(), site = %name, "Indexed website headlines");
    SourceGroup {
        name,
        success: true,
        articles,
    }
}

async fn fetch_homepage(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    let body = client.get(url).send().await?.error_for_status()?.text().await?;
    debug!(bytes = body.len(), %url, "Fetched homepage");
    Ok(body)
}

/// Extract headline articles from homepage HTML.
///
/// Selector pass first; regex fallback when it produces nothing.
fn extract_articles(
    html: &str,
    site: &WebsiteConfig,
    max_per_site: usize,
    scraped_at: &str,
) -> Vec<Article> {
    let document = Html::parse_document(html);
    let selector = headline_selector(site);
    let base_url = Url::parse(&site.url).ok();

    let articles: Vec<Article> = document
        .select(&selector)
        .filter_map(|element| {
            let title = element.text().collect::<Vec<_>>().join(" ");
            let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
            if title.chars().count() < MIN_TITLE_CHARS {
                return None;
            }
            let link = element
                .value()
                .attr("href")
                .and_then(|href| base_url.as_ref().and_then(|base| base.join(href).ok()))
                .map(|resolved| resolved.to_string())
                .unwrap_or_default();
            Some(make_article(title, link, scraped_at))
        })
        .unique_by(|article| article.title.clone())
        .take(max_per_site)
        .collect();

    if !articles.is_empty() {
        return articles;
    }

    warn!(url = %site.url, "Selector found no headlines; using regex fallback");
    FALLBACK_ANCHOR
        .captures_iter(html)
        .filter_map(|caps| {
            let title = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
            if title.chars().count() < MIN_TITLE_CHARS {
                return None;
            }
            // No trustworthy URL from a raw anchor scan.
            Some(make_article(title, String::new(), scraped_at))
        })
        .unique_by(|article| article.title.clone())
        .take(max_per_site)
        .collect()
}

fn headline_selector(site: &WebsiteConfig) -> Selector {
    if let Some(raw) = site.selector.as_deref() {
        match Selector::parse(raw) {
            Ok(selector) => return selector,
            Err(e) => {
                warn!(selector = raw, error = %e, "Bad configured selector; using default");
            }
        }
    }
    Selector::parse(DEFAULT_HEADLINE_SELECTOR).unwrap()
}

fn make_article(title: String, link: String, scraped_at: &str) -> Article {
    Article {
        title,
        link,
        summary: String::new(),
        source: SourceKind::Website,
        scraped_at: scraped_at.to_string(),
        subreddit: None,
        channel: None,
        score: None,
        views: None,
        hashtags: Vec::new(),
    }
}

/// The group name for a site: its host, as configured (any `www.` prefix
/// is a display concern handled during compilation).
fn host_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| url.trim_start_matches("https://").trim_start_matches("http://").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(url: &str, selector: Option<&str>) -> WebsiteConfig {
        WebsiteConfig {
            url: url.to_string(),
            selector: selector.map(str::to_string),
        }
    }

    const HOMEPAGE: &str = r#"
        <html><body>
          <nav><a href="/about">About</a></nav>
          <h2><a href="/uae/visa-rules-change-for-residents">Visa rules change announced for UAE residents</a></h2>
          <h3><a href="https://example.com/business/gold-prices">Gold prices climb to a six month high in Dubai</a></h3>
          <h2><a href="/uae/visa-rules-change-for-residents">Visa rules change announced for UAE residents</a></h2>
        </body></html>
    "#;

    #[test]
    fn test_extracts_headlines_and_resolves_links() {
        let articles = extract_articles(
            HOMEPAGE,
            &site("https://example.com", None),
            10,
            "2025-06-01T09:00:00Z",
        );

        assert_eq!(articles.len(), 2);
        assert_eq!(
            articles[0].title,
            "Visa rules change announced for UAE residents"
        );
        assert_eq!(
            articles[0].link,
            "https://example.com/uae/visa-rules-change-for-residents"
        );
        assert_eq!(articles[1].link, "https://example.com/business/gold-prices");
    }

    #[test]
    fn test_short_anchor_text_is_skipped() {
        let articles = extract_articles(
            HOMEPAGE,
            &site("https://example.com", None),
            10,
            "2025-06-01T09:00:00Z",
        );
        assert!(articles.iter().all(|a| a.title != "About"));
    }

    #[test]
    fn test_respects_per_site_cap() {
        let articles = extract_articles(
            HOMEPAGE,
            &site("https://example.com", None),
            1,
            "2025-06-01T09:00:00Z",
        );
        assert_eq!(articles.len(), 1);
    }

    #[test]
    fn test_custom_selector_narrows_extraction() {
        let articles = extract_articles(
            HOMEPAGE,
            &site("https://example.com", Some("h3 a[href]")),
            10,
            "2025-06-01T09:00:00Z",
        );
        assert_eq!(articles.len(), 1);
        assert!(articles[0].title.starts_with("Gold prices"));
    }

    #[test]
    fn test_regex_fallback_produces_empty_links() {
        let scripted = r#"
            <div data-app="spa"><a class="t" data-x="1">Major infrastructure project announced in Abu Dhabi</a></div>
        "#;
        let articles = extract_articles(
            scripted,
            &site("https://example.com", None),
            10,
            "2025-06-01T09:00:00Z",
        );

        assert_eq!(articles.len(), 1);
        assert_eq!(
            articles[0].title,
            "Major infrastructure project announced in Abu Dhabi"
        );
        assert!(articles[0].link.is_empty());
    }

    #[test]
    fn test_host_name_keeps_www_prefix() {
        assert_eq!(host_name("https://www.khaleejtimes.com"), "www.khaleejtimes.com");
        assert_eq!(host_name("https://gulfnews.com/uae"), "gulfnews.com");
    }
}
