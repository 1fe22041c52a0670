//! Archive configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main archive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    // Archive
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // Directory
    pub records_dir: String,
    /// Glob patterns for paths the loader skips
    #[serde(default)]
    pub ignore: Vec<String>,

    // Writing
    pub new_record_name: String,

    // Date / Time format
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            title: "Chronicle".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),

            records_dir: "articles".to_string(),
            ignore: Vec::new(),

            new_record_name: ":slug.md".to_string(),

            date_format: "%Y-%m-%d".to_string(),

            extra: IndexMap::new(),
        }
    }
}

impl ArchiveConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ArchiveConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
