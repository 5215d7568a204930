//! Command-line interface definitions for the news narrator.
//!
//! This module defines the CLI arguments and options using the `clap`
//! crate. Options that make sense as deployment settings can also be
//! provided via environment variables.

use clap::Parser;

/// Command-line arguments for the news narration pipeline.
///
/// # Examples
///
/// ```sh
/// # Scrape everything and produce text, translation, and audio
/// uae_news_narrator -o ./digests
///
/// # Websites only, no audio
/// uae_news_narrator -o ./digests --include-reddit false --include-telegram false --skip-audio
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for digest text, JSON, and audio files
    #[arg(short, long, env = "NEWS_OUTPUT_DIR")]
    pub output_dir: String,

    /// Optional path to a YAML configuration file
    #[arg(short, long, env = "NEWS_CONFIG")]
    pub config: Option<String>,

    /// Cap on headlines kept per website (overrides the config value)
    #[arg(long)]
    pub max_per_site: Option<usize>,

    /// Whether to scrape the configured subreddits
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub include_reddit: bool,

    /// Whether to scrape the configured Telegram channels
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub include_telegram: bool,

    /// Target language for translation (overrides the config value)
    #[arg(long, env = "NEWS_TARGET_LANG")]
    pub target_lang: Option<String>,

    /// Skip the translation step and narrate the original text
    #[arg(long, default_value_t = false)]
    pub skip_translation: bool,

    /// Skip audio synthesis entirely
    #[arg(long, default_value_t = false)]
    pub skip_audio: bool,
}
