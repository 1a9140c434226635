//! Search-index rebuild command.
//!
//! Full refresh: aggregate everything, drop the existing collection,
//! recreate it from the fixed schema, and bulk-import. A dead search
//! service aborts before anything is deleted; per-document import
//! failures are reported but do not abort the run.

use super::load_inputs;
use anyhow::{Context, Result};
use sitedex_core::publish::PublishReport;
use sitedex_core::{
    aggregate_content, collection_schema, AggregationOptions, ContentItem, DateResolver,
    SearchClient,
};
use std::path::Path;

pub async fn index_content(config_path: &Path, dry_run: bool) -> Result<()> {
    let (config, dates, pages) = load_inputs(config_path)?;
    let resolver = DateResolver::new(dates);

    let options = AggregationOptions {
        full_urls: true,
        include_extended_meta: true,
        ..Default::default()
    };
    let aggregated = aggregate_content(&config, &resolver, &pages, options)
        .await
        .context("Failed to aggregate site content")?;
    let data = aggregated.content();

    // Tag records stay local to client-side search: the hosted schema
    // requires date_timestamp and tags carry none.
    let documents: Vec<ContentItem> = data
        .blogs
        .iter()
        .chain(data.whitepapers.iter())
        .chain(data.pages.iter())
        .cloned()
        .collect();

    println!(
        "Aggregated {} documents ({} blogs, {} whitepapers, {} pages)",
        documents.len(),
        data.blogs.len(),
        data.whitepapers.len(),
        data.pages.len()
    );

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&documents)?);
        return Ok(());
    }

    let api_key = std::env::var(&config.search.api_key_env).with_context(|| {
        format!(
            "Search API key not found in environment variable {}",
            config.search.api_key_env
        )
    })?;

    let client = SearchClient::new(&config.search, api_key)?;
    client
        .health()
        .await
        .context("Search service is unreachable, aborting before any changes")?;

    let collection = &config.search.collection;
    if client.collection_exists(collection).await? {
        client.delete_collection(collection).await?;
        tracing::info!("Deleted existing collection '{}'", collection);
    }
    client
        .create_collection(&collection_schema(collection))
        .await
        .context("Failed to create collection")?;
    println!("Created collection '{}'", collection);

    let results = client.import_documents(collection, &documents).await?;
    let report = PublishReport::from_results(&documents, &results);

    for (id, reason) in &report.failures {
        eprintln!("  ✗ {}: {}", id, reason);
    }
    println!(
        "Indexed {}/{} documents into '{}'",
        report.succeeded, report.total, collection
    );

    Ok(())
}
