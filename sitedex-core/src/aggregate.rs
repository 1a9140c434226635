//! Aggregation of all site content into one structured snapshot.
//!
//! Every call recomputes from source; the result is an immutable
//! snapshot. Output is deterministic for identical inputs: collection
//! reads are name-sorted and the tag index keeps stable ordering.

use crate::collections::read_collection;
use crate::config::Config;
use crate::dates::DateResolver;
use crate::models::{ContentIndex, ContentItem, ContentStats, ContentType, SearchData, SiteInfo};
use crate::normalize::{format_url, normalize_blog, normalize_page, normalize_whitepaper};
use crate::pagemeta::PageMetadataMap;
use crate::tags::{all_tags, normalize_tag};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

/// Recognized aggregation options
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationOptions {
    /// Emit absolute URLs instead of site-relative paths
    pub full_urls: bool,
    /// Attach SEO/AI-oriented extended metadata fields
    pub include_extended_meta: bool,
    /// Attach the count summary block
    pub include_stats: bool,
    /// Attach the site identity block
    pub include_site_info: bool,
}

impl AggregationOptions {
    /// Everything on, as used by the content-index endpoint
    pub fn full() -> Self {
        Self {
            full_urls: true,
            include_extended_meta: true,
            include_stats: true,
            include_site_info: true,
        }
    }
}

/// Aggregation output: the bare four-way split for client-side search,
/// or the result envelope when stats/site-info are requested
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Aggregated {
    Bare(SearchData),
    Enveloped(ContentIndex),
}

impl Aggregated {
    pub fn content(&self) -> &SearchData {
        match self {
            Aggregated::Bare(data) => data,
            Aggregated::Enveloped(index) => &index.content,
        }
    }
}

/// Aggregate blogs, whitepapers, pages, and tags into one snapshot.
///
/// The collection reads are independent and fan out concurrently; the
/// page table is already in memory.
pub async fn aggregate_content(
    config: &Config,
    resolver: &DateResolver,
    pages: &PageMetadataMap,
    options: AggregationOptions,
) -> Result<Aggregated> {
    let blog_dir = config.blog_dir();
    let whitepaper_dir = config.whitepaper_dir();

    let (blog_files, whitepaper_files) = tokio::try_join!(
        tokio::task::spawn_blocking(move || read_collection(&blog_dir)),
        tokio::task::spawn_blocking(move || read_collection(&whitepaper_dir)),
    )
    .context("Collection read task failed")?;
    let blog_files = blog_files?;
    let whitepaper_files = whitepaper_files?;

    let base_url = config.base_url();
    let base = options.full_urls.then_some(base_url.as_str());
    let extended = options.include_extended_meta;

    let blogs: Vec<ContentItem> = blog_files
        .iter()
        .map(|f| normalize_blog(f, resolver, extended, base))
        .collect();

    let whitepapers: Vec<ContentItem> = whitepaper_files
        .iter()
        .map(|f| normalize_whitepaper(f, resolver, extended, base))
        .collect();

    let page_items: Vec<ContentItem> = pages
        .iter()
        .map(|(path, meta)| normalize_page(path, meta, extended, base))
        .collect();

    let tag_items: Vec<ContentItem> = all_tags(&blogs, &whitepapers)
        .into_iter()
        .map(|tag| {
            let key = normalize_tag(&tag.name);
            let mut item = ContentItem::new(format!("tag-{}", key), ContentType::Tag, tag.name);
            item.slug = format_url(&format!("/tags/{}", key), base);
            item.count = Some(tag.count);
            item
        })
        .collect();

    tracing::debug!(
        "Aggregated {} blogs, {} whitepapers, {} pages, {} tags",
        blogs.len(),
        whitepapers.len(),
        page_items.len(),
        tag_items.len()
    );

    let content = SearchData {
        blogs,
        whitepapers,
        pages: page_items,
        tags: tag_items,
    };

    if !options.include_stats && !options.include_site_info {
        return Ok(Aggregated::Bare(content));
    }

    let site = options.include_site_info.then(|| SiteInfo {
        name: config.site.name.clone(),
        url: base_url.clone(),
        description: config.site.description.clone(),
        last_updated: Utc::now().format("%Y-%m-%d").to_string(),
    });

    let stats = options.include_stats.then(|| ContentStats {
        total_blogs: content.blogs.len(),
        total_whitepapers: content.whitepapers.len(),
        total_pages: content.pages.len(),
        total_tags: content.tags.len(),
        total_content: content.total_content(),
    });

    Ok(Aggregated::Enveloped(ContentIndex {
        site,
        content,
        stats,
    }))
}
