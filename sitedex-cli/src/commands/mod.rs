//! CLI command implementations.

pub mod dates;
pub mod index;
pub mod pdf;
pub mod search;
pub mod serve;
pub mod sitemap;

pub use dates::generate_dates;
pub use index::index_content;
pub use pdf::render_pdfs;
pub use search::{search_content, SearchOptions};
pub use serve::serve_api;
pub use sitemap::print_sitemap;

use anyhow::{Context, Result};
use sitedex_core::{Config, ContentDateMap, PageMetadataMap};
use std::path::Path;

/// Load the pipeline inputs shared by most commands: configuration, the
/// generated content-date map, and the static page-metadata table.
pub(crate) fn load_inputs(config_path: &Path) -> Result<(Config, ContentDateMap, PageMetadataMap)> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let dates = ContentDateMap::load(&config.dates_path());
    let pages_path = config.pages_path();
    let pages = PageMetadataMap::from_file(&pages_path)
        .with_context(|| format!("Failed to load page metadata from {:?}", pages_path))?;
    Ok((config, dates, pages))
}
