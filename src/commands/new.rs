//! Create a new record

use anyhow::Result;
use std::fs;

use crate::content::FrontMatter;
use crate::Chronicle;

/// Create a new record file; this is the only write path into the archive
pub fn create_record(archive: &Chronicle, title: &str, path: Option<&str>) -> Result<()> {
    let now = chrono::Local::now();
    let slug = slug::slugify(title);

    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not yield a usable identifier", title);
    }

    let filename = if let Some(p) = path {
        format!("{}.md", p)
    } else {
        archive
            .config
            .new_record_name
            .replace(":slug", &slug)
            .replace(":year", &now.format("%Y").to_string())
            .replace(":month", &now.format("%m").to_string())
            .replace(":day", &now.format("%d").to_string())
    };

    let file_path = archive.records_dir.join(&filename);

    // Records are immutable once created; never overwrite
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let fm = FrontMatter {
        title: Some(title.to_string()),
        identifier: Some(slug),
        date: Some(now.format("%Y-%m-%d %H:%M:%S").to_string()),
        ..Default::default()
    };

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, format!("{}\n", fm.to_block()?))?;

    println!("Created: {:?}", file_path);

    Ok(())
}

/// Run the new command
pub fn run(archive: &Chronicle, title: &str) -> Result<()> {
    create_record(archive, title, None)
}
