//! Content-date map generation.
//!
//! Walks the blog and whitepaper collections and records each entry's
//! last git commit date under its canonical URL. Entries without git
//! history fall back to the frontmatter date, then to today, so every
//! key in the map carries a date.

use anyhow::{Context, Result};
use chrono::Utc;
use sitedex_core::collections::read_collection;
use sitedex_core::dates::git_last_modified;
use sitedex_core::{Config, ContentDateMap};
use std::path::Path;

pub fn generate_dates(config_path: &Path) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let mut map = ContentDateMap::default();

    for file in read_collection(&config.blog_dir())? {
        let date = resolve_file_date(&file);
        map.insert(format!("/blog/{}/", file.slug), date);
    }

    for file in read_collection(&config.whitepaper_dir())? {
        let date = resolve_file_date(&file);
        // The detail page and its PDF download share the same date
        map.insert(format!("/whitepapers/{}/", file.slug), date);
        map.insert(format!("/whitepapers/{}.pdf/", file.slug), date);
    }

    let dates_path = config.dates_path();
    let yaml = serde_yaml::to_string(&map).context("Failed to serialize content-date map")?;
    std::fs::write(&dates_path, yaml)
        .with_context(|| format!("Failed to write {:?}", dates_path))?;

    println!("Wrote {} entries to {:?}", map.len(), dates_path);
    Ok(())
}

fn resolve_file_date(file: &sitedex_core::collections::ContentFile) -> chrono::NaiveDate {
    git_last_modified(&file.path)
        .or_else(|| file.frontmatter.get("date").and_then(|v| v.as_date()))
        .unwrap_or_else(|| Utc::now().date_naive())
}
