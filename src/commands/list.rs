//! List archive content

use anyhow::Result;

use crate::content::RecordLoader;
use crate::Chronicle;

/// List archive content by type
pub fn run(archive: &Chronicle, content_type: &str, format: &str) -> Result<()> {
    let loader = RecordLoader::new(archive);

    match content_type {
        "record" | "records" => {
            let records = loader.load_all()?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }
            println!("Records ({}):", records.len());
            for record in records {
                let date = record
                    .published_at
                    .map(|d| d.format(&archive.config.date_format).to_string())
                    .unwrap_or_else(|| "unpublished".to_string());
                println!("  {} - {} [{}]", date, record.title, record.identifier);
            }
        }
        "tag" | "tags" => {
            let records = loader.load_all()?;
            let mut tags: std::collections::HashMap<String, usize> =
                std::collections::HashMap::new();
            for record in &records {
                for tag in &record.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&tags)?);
                return Ok(());
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: record, tag", content_type);
        }
    }

    Ok(())
}
