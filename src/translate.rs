//! Translation collaborators with retry and provider fallback.
//!
//! The compiled digest is translated before narration. Two free HTTP
//! endpoints are chained:
//!
//! - [`GoogleWebTranslator`]: the unofficial `translate_a/single` endpoint
//!   used by the Google Translate web widget
//! - [`MyMemoryTranslator`]: the MyMemory public API, as fallback
//!
//! Each provider implements [`TranslateAsync`]; [`RetryTranslate`] wraps
//! any provider with exponential backoff and jitter. When the whole chain
//! fails, [`translate_text`] degrades gracefully and returns the original
//! text — a digest in the wrong language still beats no digest.
//!
//! # Retry Strategy
//!
//! - Maximum 3 retry attempts per provider
//! - Exponential backoff starting at 1 second, capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use crate::utils::chunk_text;
use rand::{rng, Rng};
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// The web endpoint handles comfortably more, but staying under this keeps
/// responses well-formed.
const GOOGLE_CHUNK_CHARS: usize = 1500;

/// MyMemory rejects queries over 500 bytes; stay clearly below.
const MYMEMORY_CHUNK_CHARS: usize = 450;

const MAX_RETRIES: usize = 3;
const BASE_DELAY: StdDuration = StdDuration::from_secs(1);

/// Trait for async translation providers.
///
/// Implementors translate one chunk of text into the target language.
/// The abstraction exists so retry logic and the fallback chain can be
/// tested against stub providers.
pub trait TranslateAsync {
    /// Translate `text` into `target_lang` (ISO-639-1 code).
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, Box<dyn Error>>;

    /// Largest chunk this provider accepts per request.
    fn max_chunk_chars(&self) -> usize;
}

/// Wrapper that adds exponential backoff retry logic to any
/// [`TranslateAsync`] implementation.
pub struct RetryTranslate<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryTranslate<T>
where
    T: TranslateAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryTranslate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryTranslate")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> TranslateAsync for RetryTranslate<T>
where
    T: TranslateAsync,
{
    #[instrument(level = "info", skip_all)]
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.translate(text, target_lang).await {
                Ok(translated) => return Ok(translated),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u128,
                            error = %e,
                            "translate() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "translate() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    fn max_chunk_chars(&self) -> usize {
        self.inner.max_chunk_chars()
    }
}

/// The unofficial Google Translate web endpoint.
#[derive(Debug)]
pub struct GoogleWebTranslator<'a> {
    client: &'a Client,
}

impl<'a> GoogleWebTranslator<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }
}

impl TranslateAsync for GoogleWebTranslator<'_> {
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count(), %target_lang))]
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, Box<dyn Error>> {
        let request_url = format!(
            "https://translate.googleapis.com/translate_a/single?client=gtx&sl=auto&tl={}&dt=t&q={}",
            target_lang,
            urlencoding::encode(text)
        );
        let body = self
            .client
            .get(&request_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_google_response(&body)
    }

    fn max_chunk_chars(&self) -> usize {
        GOOGLE_CHUNK_CHARS
    }
}

/// Extract the translated segments from the endpoint's nested-array JSON.
fn parse_google_response(body: &str) -> Result<String, Box<dyn Error>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or("unexpected translation response shape")?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(|t| t.as_str()) {
            translated.push_str(piece);
        }
    }
    if translated.is_empty() {
        return Err("empty translation response".into());
    }
    Ok(translated)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: MyMemoryData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryData {
    translated_text: String,
}

/// The MyMemory public translation API, used when Google fails.
#[derive(Debug)]
pub struct MyMemoryTranslator<'a> {
    client: &'a Client,
}

impl<'a> MyMemoryTranslator<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }
}

impl TranslateAsync for MyMemoryTranslator<'_> {
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count(), %target_lang))]
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, Box<dyn Error>> {
        // MyMemory requires an explicit source language; the digest is
        // compiled in English.
        let request_url = format!(
            "https://api.mymemory.translated.net/get?q={}&langpair=en|{}",
            urlencoding::encode(text),
            target_lang
        );
        let body = self
            .client
            .get(&request_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let response: MyMemoryResponse = serde_json::from_str(&body)?;
        let translated = response.response_data.translated_text;
        if translated.trim().is_empty() {
            return Err("empty translation response".into());
        }
        Ok(translated)
    }

    fn max_chunk_chars(&self) -> usize {
        MYMEMORY_CHUNK_CHARS
    }
}

/// Translate a full digest, chunk by chunk, with one provider.
async fn translate_in_chunks<T: TranslateAsync>(
    provider: &T,
    text: &str,
    target_lang: &str,
) -> Result<String, Box<dyn Error>> {
    let mut translated_chunks = Vec::new();
    for chunk in chunk_text(text, provider.max_chunk_chars()) {
        translated_chunks.push(provider.translate(&chunk, target_lang).await?);
    }
    Ok(translated_chunks.join(" "))
}

/// Try the primary provider, then the fallback; degrade to the original
/// text when both fail.
async fn translate_with_chain<P, F>(
    primary: &P,
    fallback: &F,
    text: &str,
    target_lang: &str,
) -> String
where
    P: TranslateAsync,
    F: TranslateAsync,
{
    match translate_in_chunks(primary, text, target_lang).await {
        Ok(translated) => return translated,
        Err(e) => {
            warn!(error = %e, "Primary translator failed; trying fallback");
        }
    }
    match translate_in_chunks(fallback, text, target_lang).await {
        Ok(translated) => translated,
        Err(e) => {
            error!(error = %e, "All translators failed; narrating original text");
            text.to_string()
        }
    }
}

/// Translate the compiled digest into `target_lang`.
///
/// This is the pipeline's entry point: Google first, MyMemory as
/// fallback, both wrapped in retry, graceful degradation to the original
/// text on total failure.
#[instrument(level = "info", skip_all, fields(chars = text.chars().count(), %target_lang))]
pub async fn translate_text(client: &Client, text: &str, target_lang: &str) -> String {
    let t0 = Instant::now();
    let google = RetryTranslate::new(GoogleWebTranslator::new(client), MAX_RETRIES, BASE_DELAY);
    let mymemory = RetryTranslate::new(MyMemoryTranslator::new(client), MAX_RETRIES, BASE_DELAY);

    let translated = translate_with_chain(&google, &mymemory, text, target_lang).await;
    info!(
        elapsed_ms_total = t0.elapsed().as_millis() as u128,
        chars_out = translated.chars().count(),
        "Translation finished"
    );
    translated
}
