//! Validate the record set

use anyhow::Result;

use crate::content::RecordLoader;
use crate::Chronicle;

/// Validate every record, reporting all failures before exiting non-zero
pub fn run(archive: &Chronicle) -> Result<()> {
    let loader = RecordLoader::new(archive);

    let mut loaded = 0usize;
    let mut failures = Vec::new();

    for item in loader.iter() {
        match item {
            Ok(record) => {
                loaded += 1;
                tracing::debug!("ok: {} [{}]", record.identifier, record.source);
            }
            Err(e) => failures.push(e),
        }
    }

    if failures.is_empty() {
        println!("OK: {} records", loaded);
        return Ok(());
    }

    for failure in &failures {
        eprintln!("error: {}", failure);
    }
    anyhow::bail!(
        "{} of {} records failed validation",
        failures.len(),
        loaded + failures.len()
    );
}
