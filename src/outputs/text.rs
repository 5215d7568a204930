//! Plain-text digest artifacts.

use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Write one text artifact into the edition directory.
///
/// Returns the full path of the written file.
#[instrument(level = "info", skip_all, fields(%output_dir, %date, %filename))]
pub async fn write_text(
    output_dir: &str,
    date: &str,
    filename: &str,
    contents: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let dir = super::edition_dir(output_dir, date).await?;
    let path = dir.join(filename);

    fs::write(&path, contents).await?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote text artifact");
    Ok(path)
}
