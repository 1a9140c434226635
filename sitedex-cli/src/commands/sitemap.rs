//! Sitemap command implementation.

use super::load_inputs;
use anyhow::{Context, Result};
use sitedex_core::sitemap::{build_entries, to_xml};
use sitedex_core::{aggregate_content, AggregationOptions, DateResolver};
use std::path::Path;

/// Print the sitemap XML for the current content to stdout
pub async fn print_sitemap(config_path: &Path) -> Result<()> {
    let (config, dates, pages) = load_inputs(config_path)?;
    let resolver = DateResolver::new(dates.clone());

    // Relative slugs: sitemap paths get the base URL prefixed at render time
    let aggregated = aggregate_content(&config, &resolver, &pages, AggregationOptions::default())
        .await
        .context("Failed to aggregate site content")?;

    let entries = build_entries(aggregated.content(), &pages, &dates);
    print!("{}", to_xml(&entries, &config.base_url()));
    Ok(())
}
