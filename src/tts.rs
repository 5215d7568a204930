//! Audio synthesis for the translated digest.
//!
//! Uses the Google Translate speech endpoint, which serves short MP3
//! clips for free. The endpoint caps input around 200 characters, so the
//! digest is chunked on sentence/word boundaries and the MP3 responses
//! are concatenated — MPEG frames are self-contained, so byte-level
//! concatenation produces a playable file.
//!
//! Synthesis failure is never fatal to the pipeline: the text artifacts
//! have already been written by the time this runs.

use crate::utils::{chunk_text, truncate_for_log};
use reqwest::Client;
use std::path::Path;
use std::time::Instant;
use tokio::fs;
use tracing::{error, info, instrument, warn};

const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// The speech endpoint rejects longer inputs.
pub const MAX_TTS_CHUNK_CHARS: usize = 200;

/// Synthesize `text` in `lang` to an MP3 file at `output_path`.
///
/// Returns `true` when the file was written. Individual chunk failures
/// abort the synthesis (a digest with silent gaps is worse than none)
/// but only fail this step, not the run.
#[instrument(level = "info", skip_all, fields(chars = text.chars().count(), %lang, path = %output_path.display()))]
pub async fn synthesize(client: &Client, text: &str, lang: &str, output_path: &Path) -> bool {
    let chunks = chunk_text(text, MAX_TTS_CHUNK_CHARS);
    if chunks.is_empty() {
        warn!("Nothing to narrate; skipping audio synthesis");
        return false;
    }

    let t0 = Instant::now();
    let mut audio = Vec::new();
    for (index, chunk) in chunks.iter().enumerate() {
        match fetch_speech(client, chunk, lang).await {
            Ok(bytes) => audio.extend_from_slice(&bytes),
            Err(e) => {
                error!(
                    index,
                    total = chunks.len(),
                    error = %e,
                    chunk_preview = %truncate_for_log(chunk, 80),
                    "Speech chunk failed; aborting synthesis"
                );
                return false;
            }
        }
    }

    if let Err(e) = fs::write(output_path, &audio).await {
        error!(path = %output_path.display(), error = %e, "Failed writing audio file");
        return false;
    }

    info!(
        bytes = audio.len(),
        chunks = chunks.len(),
        elapsed_ms = t0.elapsed().as_millis() as u128,
        path = %output_path.display(),
        "Wrote audio digest"
    );
    true
}

async fn fetch_speech(
    client: &Client,
    chunk: &str,
    lang: &str,
) -> Result<Vec<u8>, reqwest::Error> {
    let request_url = format!(
        "{TTS_ENDPOINT}?ie=UTF-8&client=tw-ob&tl={lang}&q={}",
        urlencoding::encode(chunk)
    );
    let bytes = client
        .get(&request_url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(bytes.to_vec())
}
