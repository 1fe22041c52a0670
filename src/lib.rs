//! chronicle: an archive tool for front-matter article collections
//!
//! This crate manages a flat collection of article records, each a text file
//! with a YAML or JSON metadata block followed by an opaque body. It loads
//! and validates the record set; rendering the archive into a website is
//! left to whatever consumes it.

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::Path;

/// The main chronicle application
#[derive(Clone)]
pub struct Chronicle {
    /// Archive configuration
    pub config: config::ArchiveConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Directory holding the record files
    pub records_dir: std::path::PathBuf,
}

impl Chronicle {
    /// Create a new Chronicle instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::ArchiveConfig::load(&config_path)?
        } else {
            config::ArchiveConfig::default()
        };

        let records_dir = base_dir.join(&config.records_dir);

        Ok(Self {
            config,
            base_dir,
            records_dir,
        })
    }

    /// Initialize a new archive
    pub fn init(&self) -> Result<()> {
        commands::init::run(self)
    }

    /// Validate the whole record set
    pub fn check(&self) -> Result<()> {
        commands::check::run(self)
    }

    /// Create a new record
    pub fn new_record(&self, title: &str) -> Result<()> {
        commands::new::run(self, title)
    }
}
