//! JSON dump of the scraped collection.
//!
//! The full [`NewsCollection`] — including failed groups and per-article
//! attributes the narration ignores — is preserved per edition so a run
//! can be inspected or replayed after the fact.

use crate::models::NewsCollection;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Write the collection for this edition to
/// `{output_dir}/{date}/collection_{time_of_day}.json`.
#[instrument(level = "info", skip_all, fields(%output_dir, %date, %time_of_day))]
pub async fn write_collection(
    collection: &NewsCollection,
    output_dir: &str,
    date: &str,
    time_of_day: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(collection)?;
    let dir = super::edition_dir(output_dir, date).await?;
    let path = dir.join(format!("collection_{time_of_day}.json"));

    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = collection.total_articles(), "Wrote collection dump");
    Ok(path)
}
