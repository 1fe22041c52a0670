//! Content record model

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// One article in the archive
///
/// Created once at authoring time; the loader never mutates a record file.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Display title
    pub title: String,

    /// Unique stable key distinguishing this record from all others
    pub identifier: String,

    /// Short descriptive text
    pub summary: Option<String>,

    /// Original publication timestamp
    pub published_at: Option<DateTime<Local>>,

    /// Cover image reference (path or URL), opaque to the tool
    pub cover: Option<String>,

    /// Topic labels; insertion order is irrelevant
    pub tags: BTreeSet<String>,

    /// Body content following the metadata block, never parsed
    pub body: String,

    /// Source file path relative to the records directory
    pub source: String,

    /// Full source file path
    #[serde(skip)]
    pub full_source: PathBuf,

    /// Custom metadata fields
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Record {
    /// Create a new record with minimal required fields
    pub fn new(title: String, identifier: String, source: String) -> Self {
        Self {
            title,
            identifier,
            summary: None,
            published_at: None,
            cover: None,
            tags: BTreeSet::new(),
            body: String::new(),
            source: source.clone(),
            full_source: PathBuf::from(&source),
            extra: IndexMap::new(),
        }
    }
}
