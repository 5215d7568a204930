//! Run configuration loaded from a YAML file.
//!
//! The config lists the origins to scrape — websites, subreddits, and
//! Telegram channels — plus the translation target. Every field has a
//! default aimed at the UAE news beat, so the pipeline runs usefully with
//! no config file at all.

use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::info;

/// One website to scrape for headlines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteConfig {
    /// Homepage URL, scheme included.
    pub url: String,
    /// CSS selector for headline anchors. Falls back to the built-in
    /// default selector when absent or unparsable.
    #[serde(default)]
    pub selector: Option<String>,
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_websites")]
    pub websites: Vec<WebsiteConfig>,
    #[serde(default = "default_subreddits")]
    pub subreddits: Vec<String>,
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,
    /// ISO-639-1 code the digest is translated (and narrated) into.
    #[serde(default = "default_target_language")]
    pub target_language: String,
    /// Cap on headlines kept per website.
    #[serde(default = "default_max_per_site")]
    pub max_per_site: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            websites: default_websites(),
            subreddits: default_subreddits(),
            channels: default_channels(),
            target_language: default_target_language(),
            max_per_site: default_max_per_site(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file, or fall back to the defaults
    /// when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                let config: Self = serde_yaml::from_str(&contents)?;
                info!(path, websites = config.websites.len(), "Loaded configuration");
                Ok(config)
            }
            None => {
                info!("No config file given; using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

fn default_websites() -> Vec<WebsiteConfig> {
    ["https://gulfnews.com", "https://www.khaleejtimes.com", "https://www.arabianbusiness.com"]
        .into_iter()
        .map(|url| WebsiteConfig {
            url: url.to_string(),
            selector: None,
        })
        .collect()
}

fn default_subreddits() -> Vec<String> {
    vec!["dubai".to_string(), "abudhabi".to_string(), "UAE".to_string()]
}

fn default_channels() -> Vec<String> {
    vec!["dubaionline".to_string()]
}

fn default_target_language() -> String {
    "ru".to_string()
}

fn default_max_per_site() -> usize {
    10
}
