//! Text cleanup for narration-bound fragments and compiled summaries.
//!
//! Two distinct passes live here:
//!
//! - [`clean_fragment`]: applied to every title/summary fragment as it is
//!   inserted into the compiled summary. Collapses whitespace, drops
//!   characters a speech voice cannot read sensibly, and trims.
//! - [`strip_urls`]: applied once over the fully compiled summary before
//!   it is handed to translation and narration. URLs should never be read
//!   aloud; this pass removes them and tidies the punctuation they leave
//!   behind.
//!
//! Both passes are total (never fail) and idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());
// Narration-safe characters: letters, digits, whitespace, and a small
// punctuation set. Everything else is dropped.
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s.,!?;:()\-]").unwrap());

// Explicit schemes (including scheme remnants whose slashes were lost to
// fragment cleanup), www-prefixed hosts, and domain tokens that carry a
// path (like t.me/channel/123). Plain domain mentions such as the
// "From example.com:" section labels are left alone; see strip_urls.
static URL_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bhttps?:\S+|\bwww\.\S+|\b[a-z0-9][a-z0-9-]*(?:\.[a-z]{2,})+/\S*",
    )
    .unwrap()
});
static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+([.,!?;:])").unwrap());
static DOUBLED_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.,!?;:])(\s*[.,!?;:])+").unwrap());
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Clean one text fragment for narration.
///
/// Rules, applied in order:
/// 1. Collapse line breaks to single spaces.
/// 2. Collapse runs of whitespace to one space.
/// 3. Remove characters outside the narration-safe set (letters, digits,
///    whitespace, and `. , ! ? ; : ( ) -`).
/// 4. Normalize curly quotes to straight quotes.
/// 5. Trim leading and trailing whitespace.
///
/// Always returns a string, possibly empty. Applying it twice yields the
/// same result as applying it once.
pub fn clean_fragment(text: &str) -> String {
    let text = LINE_BREAKS.replace_all(text, " ");
    let text = WHITESPACE_RUNS.replace_all(&text, " ");
    let text = DISALLOWED.replace_all(&text, "");
    let text = text
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"");
    // The straight quotes produced by normalization are themselves outside
    // the safe set, so a second filter keeps the pass idempotent.
    let text = DISALLOWED.replace_all(&text, "");
    // Removing a space-flanked character leaves two adjacent spaces, so
    // the collapse also re-runs after filtering.
    let text = WHITESPACE_RUNS.replace_all(&text, " ");
    text.trim().to_string()
}

/// Remove URLs from a fully compiled summary.
///
/// Strips `http(s)://…` URLs, `www.…` tokens, and domain-like tokens that
/// carry a path component, then collapses the double punctuation and
/// spacing artifacts the removals leave behind.
///
/// Bare domain mentions without scheme, `www.` prefix, or path (such as
/// the per-website section labels) are deliberately preserved so the
/// summary keeps attributing its sources.
pub fn strip_urls(text: &str) -> String {
    let text = URL_TOKEN.replace_all(text, "");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    let text = DOUBLED_PUNCT.replace_all(&text, "$1");
    let text = SPACE_RUNS.replace_all(&text, " ");
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
