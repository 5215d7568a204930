//! # UAE News Narrator
//!
//! A news narration pipeline that scrapes UAE headlines from news
//! websites, Reddit communities, and public Telegram channels, compiles
//! them into one deduplicated narrative digest, translates it, and
//! synthesizes an audio edition.
//!
//! ## Usage
//!
//! ```sh
//! uae_news_narrator -o ./digests
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Collection**: Scrape every configured origin concurrently into
//!    per-origin groups; failures degrade, they never abort
//! 2. **Compilation**: One deterministic pass turns the collection into a
//!    numbered, topic-grouped, duplicate-free narrative string
//! 3. **Translation**: Provider chain with retry, degrading to the
//!    original text
//! 4. **Output**: Timestamped text, JSON, and MP3 artifacts per edition

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod compiler;
mod config;
mod models;
mod outputs;
mod sanitize;
mod sources;
mod translate;
mod tts;
mod utils;

use cli::Cli;
use config::PipelineConfig;
use utils::{ensure_writable_dir, time_of_day};

const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (news digest bot)"
);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news narrator starting up");

    // Parse CLI and merge config overrides
    let args = Cli::parse();
    debug!(?args.output_dir, ?args.config, "Parsed CLI arguments");

    let mut config = PipelineConfig::load(args.config.as_deref())?;
    if let Some(max) = args.max_per_site {
        config.max_per_site = max;
    }
    if let Some(lang) = args.target_lang.clone() {
        config.target_language = lang;
    }

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    // ---- Collect articles from all sources ----
    let collection = sources::collect_news(
        &client,
        &config,
        args.include_reddit,
        args.include_telegram,
    )
    .await;

    let failed_groups = collection
        .websites
        .iter()
        .chain(collection.reddit.iter())
        .chain(collection.telegram.iter())
        .filter(|group| !group.success)
        .count();
    info!(
        total_articles = collection.total_articles(),
        failed_groups, "Collection complete"
    );

    // ---- Compile the digest ----
    let digest = compiler::compile(&collection);
    info!(chars = digest.chars().count(), "Digest compiled");

    // ---- Write artifacts ----
    let local_date = Local::now().date_naive().to_string();
    let edition = time_of_day();

    if let Err(e) =
        outputs::json::write_collection(&collection, &args.output_dir, &local_date, &edition).await
    {
        error!(error = %e, "Failed to write collection dump");
    }

    let digest_filename = format!("digest_{edition}.txt");
    if let Err(e) =
        outputs::text::write_text(&args.output_dir, &local_date, &digest_filename, &digest).await
    {
        error!(error = %e, "Failed to write digest text");
    }

    // ---- Translate ----
    let (narration_text, narration_lang) = if args.skip_translation {
        info!("Translation skipped by flag");
        (digest.clone(), "en".to_string())
    } else {
        let translated =
            translate::translate_text(&client, &digest, &config.target_language).await;
        let translated_filename =
            format!("digest_{edition}_{}.txt", config.target_language);
        if let Err(e) = outputs::text::write_text(
            &args.output_dir,
            &local_date,
            &translated_filename,
            &translated,
        )
        .await
        {
            error!(error = %e, "Failed to write translated digest");
        }
        (translated, config.target_language.clone())
    };

    // ---- Synthesize audio ----
    if args.skip_audio {
        info!("Audio synthesis skipped by flag");
    } else {
        let audio_filename = format!("digest_{edition}_{narration_lang}.mp3");
        match outputs::edition_dir(&args.output_dir, &local_date).await {
            Ok(dir) => {
                let audio_path = dir.join(audio_filename);
                if tts::synthesize(&client, &narration_text, &narration_lang, &audio_path).await {
                    info!(path = %audio_path.display(), "Audio edition ready");
                } else {
                    warn!("Audio synthesis failed; text artifacts are still available");
                }
            }
            Err(e) => error!(error = %e, "Failed to prepare audio output directory"),
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        articles = collection.total_articles(),
        edition = %edition,
        date = %local_date,
        "Execution complete"
    );

    Ok(())
}
