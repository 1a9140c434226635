//! Search command implementation.

use super::load_inputs;
use anyhow::{Context, Result};
use sitedex_core::{
    aggregate_content, search, AggregationOptions, DateResolver, SearchFilter, SearchRequest,
};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub filter: String,
    pub limit: usize,
    pub offset: usize,
    pub json: bool,
}

/// Search aggregated site content from the terminal
pub async fn search_content(config_path: &Path, query: &str, opts: SearchOptions) -> Result<()> {
    let (config, dates, pages) = load_inputs(config_path)?;
    let resolver = DateResolver::new(dates);

    let aggregated = aggregate_content(&config, &resolver, &pages, AggregationOptions::default())
        .await
        .context("Failed to aggregate site content")?;

    let request = SearchRequest {
        query: query.to_string(),
        filter: SearchFilter::parse(&opts.filter),
        limit: opts.limit,
        offset: opts.offset,
    };
    let response = search(aggregated.content(), &request);

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.results.is_empty() {
        println!("No results found for '{}'", query);
        return Ok(());
    }

    println!("Found {} result(s):", response.total);
    for item in &response.results {
        println!("  {} [{}] {}", item.title, item.content_type.as_str(), item.slug);
    }
    if response.has_more {
        println!("  ... more results available, raise --limit or --offset");
    }
    Ok(())
}
