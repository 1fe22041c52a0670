//! Record loader - enumerates and validates the record set

use glob::Pattern;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{FrontMatter, Record};
use crate::Chronicle;

lazy_static! {
    static ref IDENTIFIER_RE: Regex = Regex::new("^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap();
}

/// Failure conditions surfaced while loading the record set
#[derive(Debug, Error)]
pub enum LoadError {
    /// The metadata block is missing, unparsable, or lacks a required field
    #[error("malformed record {path:?}: {reason}")]
    MalformedRecord { path: PathBuf, reason: String },

    /// Two records share an identifier
    #[error("duplicate identifier `{identifier}`: {path:?} collides with {first:?}")]
    DuplicateIdentifier {
        identifier: String,
        path: PathBuf,
        first: PathBuf,
    },

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

/// Loads records from the archive's records directory
pub struct RecordLoader<'a> {
    archive: &'a Chronicle,
    ignore: Vec<Pattern>,
}

impl<'a> RecordLoader<'a> {
    /// Create a new record loader
    pub fn new(archive: &'a Chronicle) -> Self {
        let ignore = archive
            .config
            .ignore
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!("Ignoring invalid pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect();
        Self { archive, ignore }
    }

    /// Lazily enumerate the record set
    ///
    /// Enumeration is read-only and deterministic: a fresh iterator re-walks
    /// the directory and yields the same set absent external edits. A missing
    /// records directory yields an empty sequence.
    pub fn iter(&self) -> RecordIter<'_> {
        let walker = self.archive.records_dir.exists().then(|| {
            WalkDir::new(&self.archive.records_dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
        });

        RecordIter {
            loader: self,
            walker,
            seen: HashMap::new(),
        }
    }

    /// Load the whole record set, newest first (undated records last)
    pub fn load_all(&self) -> Result<Vec<Record>, LoadError> {
        let mut records = self.iter().collect::<Result<Vec<_>, _>>()?;
        records.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(records)
    }

    /// Load a single record from a file
    fn load_record(&self, path: &Path) -> Result<Record, LoadError> {
        let content = fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let malformed = |reason: String| LoadError::MalformedRecord {
            path: path.to_path_buf(),
            reason,
        };

        let (fm, body) = FrontMatter::parse(&content).map_err(|e| malformed(e.to_string()))?;

        let title = fm
            .title
            .clone()
            .ok_or_else(|| malformed("missing required field `title`".to_string()))?;

        // A record without an explicit identifier takes its slugified
        // file stem as the stable key.
        let identifier = match fm.identifier.clone() {
            Some(id) => id,
            None => path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(slug::slugify)
                .unwrap_or_default(),
        };

        if !IDENTIFIER_RE.is_match(&identifier) {
            return Err(malformed(format!("invalid identifier `{}`", identifier)));
        }

        let published_at = match fm.date.as_deref() {
            Some(raw) => Some(
                fm.parse_date()
                    .ok_or_else(|| malformed(format!("unparsable date `{}`", raw)))?,
            ),
            None => None,
        };

        let source = path
            .strip_prefix(&self.archive.records_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let mut record = Record::new(title, identifier, source);
        record.summary = fm.summary;
        record.published_at = published_at;
        record.cover = fm.cover;
        record.tags = fm.tags.into_iter().collect();
        record.body = body.to_string();
        record.full_source = path.to_path_buf();
        record.extra = fm.extra;

        Ok(record)
    }

    /// Whether a path is excluded from enumeration
    fn skipped(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.archive.records_dir).unwrap_or(path);

        for component in relative.components() {
            if let Some(name) = component.as_os_str().to_str() {
                if name.starts_with('_') || name.starts_with('.') {
                    return true;
                }
            }
        }

        let relative = relative.to_string_lossy();
        self.ignore.iter().any(|p| p.matches(&relative))
    }
}

/// Lazy iterator over the record set
///
/// Yields one item per record file. Malformed records and duplicate
/// identifiers come out as errors in place; iteration continues past them so
/// a caller can report every problem in one pass.
pub struct RecordIter<'a> {
    loader: &'a RecordLoader<'a>,
    walker: Option<walkdir::IntoIter>,
    seen: HashMap<String, PathBuf>,
}

impl Iterator for RecordIter<'_> {
    type Item = Result<Record, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let walker = self.walker.as_mut()?;

        loop {
            let entry = match walker.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) || self.loader.skipped(path) {
                continue;
            }

            match self.loader.load_record(path) {
                Ok(record) => {
                    if let Some(first) = self.seen.get(&record.identifier) {
                        return Some(Err(LoadError::DuplicateIdentifier {
                            identifier: record.identifier.clone(),
                            path: path.to_path_buf(),
                            first: first.clone(),
                        }));
                    }
                    self.seen
                        .insert(record.identifier.clone(), path.to_path_buf());
                    tracing::debug!("Loaded record `{}` from {:?}", record.identifier, path);
                    return Some(Ok(record));
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Check if a file is a markdown record file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn archive_with(records: &[(&str, &str)]) -> (tempfile::TempDir, Chronicle) {
        let dir = tempfile::tempdir().unwrap();
        let records_dir = dir.path().join("articles");
        fs::create_dir_all(&records_dir).unwrap();
        for (name, content) in records {
            let path = records_dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        let chronicle = Chronicle::new(dir.path()).unwrap();
        (dir, chronicle)
    }

    #[test]
    fn test_empty_archive_loads_empty() {
        let (_dir, chronicle) = archive_with(&[]);
        let loader = RecordLoader::new(&chronicle);
        assert!(loader.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_missing_records_dir_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let chronicle = Chronicle::new(dir.path()).unwrap();
        let loader = RecordLoader::new(&chronicle);
        assert!(loader.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_load_well_formed_record() {
        let (_dir, chronicle) = archive_with(&[(
            "mock-libraries.md",
            "---\ntitle: Mock Libraries Compared\nidentifier: mock-libraries\n\
             summary: Two ways to fake it\ndate: 2023-11-02\ncover: images/mocks.png\n\
             tags:\n  - dotnet\n  - testing\n---\n\nThe body.\n",
        )]);
        let loader = RecordLoader::new(&chronicle);
        let records = loader.load_all().unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.title, "Mock Libraries Compared");
        assert_eq!(record.identifier, "mock-libraries");
        assert_eq!(record.summary.as_deref(), Some("Two ways to fake it"));
        assert_eq!(record.cover.as_deref(), Some("images/mocks.png"));
        assert!(record.published_at.is_some());
        assert!(record.body.contains("The body."));
        assert_eq!(record.source, "mock-libraries.md");
    }

    #[test]
    fn test_tag_set_ignores_input_order() {
        let a = "---\ntitle: A\nidentifier: a\ntags:\n  - github\n  - dotnet\n---\n";
        let b = "---\ntitle: B\nidentifier: b\ntags:\n  - dotnet\n  - github\n  - dotnet\n---\n";
        let (_dir, chronicle) = archive_with(&[("a.md", a), ("b.md", b)]);
        let loader = RecordLoader::new(&chronicle);
        let records = loader.load_all().unwrap();

        let expected: BTreeSet<String> =
            ["github", "dotnet"].iter().map(|s| s.to_string()).collect();
        assert_eq!(records[0].tags, expected);
        assert_eq!(records[0].tags, records[1].tags);
    }

    #[test]
    fn test_missing_title_is_malformed() {
        let (_dir, chronicle) = archive_with(&[(
            "untitled.md",
            "---\nidentifier: untitled\ntags: [a]\n---\nbody\n",
        )]);
        let loader = RecordLoader::new(&chronicle);
        let err = loader.load_all().unwrap_err();
        match err {
            LoadError::MalformedRecord { reason, .. } => {
                assert!(reason.contains("title"), "unexpected reason: {}", reason)
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_unparsable_date_is_malformed() {
        let (_dir, chronicle) = archive_with(&[(
            "dated.md",
            "---\ntitle: Dated\ndate: next tuesday\n---\n",
        )]);
        let loader = RecordLoader::new(&chronicle);
        let err = loader.load_all().unwrap_err();
        assert!(matches!(err, LoadError::MalformedRecord { .. }));
    }

    #[test]
    fn test_duplicate_identifier_fails() {
        let (_dir, chronicle) = archive_with(&[
            ("first.md", "---\ntitle: First\nidentifier: same\n---\n"),
            ("second.md", "---\ntitle: Second\nidentifier: same\n---\n"),
        ]);
        let loader = RecordLoader::new(&chronicle);
        let err = loader.load_all().unwrap_err();
        match err {
            LoadError::DuplicateIdentifier {
                identifier,
                path,
                first,
            } => {
                assert_eq!(identifier, "same");
                assert!(path.ends_with("second.md"));
                assert!(first.ends_with("first.md"));
            }
            other => panic!("expected DuplicateIdentifier, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_falls_back_to_file_stem() {
        let (_dir, chronicle) = archive_with(&[(
            "Paging Strategies.md",
            "---\ntitle: Paging Strategies\n---\n",
        )]);
        let loader = RecordLoader::new(&chronicle);
        let records = loader.load_all().unwrap();
        assert_eq!(records[0].identifier, "paging-strategies");
    }

    #[test]
    fn test_invalid_identifier_is_malformed() {
        let (_dir, chronicle) = archive_with(&[(
            "odd.md",
            "---\ntitle: Odd\nidentifier: \"no spaces allowed\"\n---\n",
        )]);
        let loader = RecordLoader::new(&chronicle);
        assert!(matches!(
            loader.load_all().unwrap_err(),
            LoadError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn test_underscore_and_non_markdown_skipped() {
        let (_dir, chronicle) = archive_with(&[
            ("kept.md", "---\ntitle: Kept\n---\n"),
            ("_draft.md", "not even front matter"),
            ("notes.txt", "plain text"),
        ]);
        let loader = RecordLoader::new(&chronicle);
        let records = loader.load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "kept");
    }

    #[test]
    fn test_ignore_globs() {
        let (_dir, mut chronicle) = archive_with(&[
            ("kept.md", "---\ntitle: Kept\n---\n"),
            ("drafts/wip.md", "---\ntitle: WIP\n---\n"),
        ]);
        chronicle.config.ignore = vec!["drafts/**".to_string()];
        let loader = RecordLoader::new(&chronicle);
        let records = loader.load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier, "kept");
    }

    #[test]
    fn test_sorted_newest_first_undated_last() {
        let (_dir, chronicle) = archive_with(&[
            ("old.md", "---\ntitle: Old\ndate: 2020-01-01\n---\n"),
            ("new.md", "---\ntitle: New\ndate: 2024-06-01\n---\n"),
            ("undated.md", "---\ntitle: Undated\n---\n"),
        ]);
        let loader = RecordLoader::new(&chronicle);
        let records = loader.load_all().unwrap();
        let identifiers: Vec<_> = records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(identifiers, vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_iteration_continues_past_failures() {
        let (_dir, chronicle) = archive_with(&[
            ("a-broken.md", "no metadata block here"),
            ("b-good.md", "---\ntitle: Good\n---\n"),
        ]);
        let loader = RecordLoader::new(&chronicle);
        let items: Vec<_> = loader.iter().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_err());
        assert_eq!(items[1].as_ref().unwrap().identifier, "b-good");
    }

    #[test]
    fn test_reenumeration_yields_same_set() {
        let (_dir, chronicle) = archive_with(&[
            ("a.md", "---\ntitle: A\n---\n"),
            ("b.md", "---\ntitle: B\n---\n"),
        ]);
        let loader = RecordLoader::new(&chronicle);
        let first: Vec<_> = loader
            .iter()
            .map(|r| r.unwrap().identifier)
            .collect();
        let second: Vec<_> = loader
            .iter()
            .map(|r| r.unwrap().identifier)
            .collect();
        assert_eq!(first, second);
    }
}
