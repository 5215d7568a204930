//! Output generation for digest text, JSON dumps, and audio placement.
//!
//! Each pipeline run writes its artifacts into a date directory named
//! after the edition:
//!
//! ```text
//! output_dir/
//! └── 2025-06-01/
//!     ├── digest_morning.txt        # compiled summary
//!     ├── digest_morning_ru.txt     # translated summary
//!     ├── digest_morning_ru.mp3     # narrated audio
//!     └── collection_morning.json   # full scraped collection
//! ```

pub mod json;
pub mod text;

use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, error};

/// Ensure the per-date edition directory exists and return its path.
pub async fn edition_dir(output_dir: &str, date: &str) -> Result<PathBuf, Box<dyn Error>> {
    let dir = PathBuf::from(output_dir).join(date);
    if let Err(e) = fs::create_dir_all(&dir).await {
        error!(dir = %dir.display(), error = %e, "Failed to create edition dir");
        return Err(e.into());
    }
    debug!(dir = %dir.display(), "Edition directory ready");
    Ok(dir)
}
