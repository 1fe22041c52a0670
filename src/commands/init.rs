//! Initialize a new archive

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Chronicle;

/// Initialize a new archive in the given directory
pub fn init_archive(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("articles"))?;
    fs::create_dir_all(target_dir.join("articles/_drafts"))?;

    let config_content = r#"# Chronicle Configuration

# Archive
title: Chronicle
description: ''
author: ''
language: en

# Directory
records_dir: articles
ignore: []

# Writing
new_record_name: :slug.md

# Date / Time format
date_format: '%Y-%m-%d'
"#;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Archive already initialized: {:?} exists", config_path);
    }
    fs::write(&config_path, config_content)?;

    // Create a starter record
    let now = chrono::Local::now();
    let starter = format!(
        r#"---
title: Hello World
identifier: hello-world
summary: Your first record
date: {}
tags:
  - meta
---

Welcome to your archive. Each record is a text file with a metadata block
followed by the article body. Run `chronicle check` to validate the record
set, and `chronicle new "A Title"` to start a new one.
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(target_dir.join("articles/hello-world.md"), starter)?;

    Ok(())
}

/// Run the init command with an existing Chronicle instance
pub fn run(archive: &Chronicle) -> Result<()> {
    init_archive(&archive.base_dir)
}
