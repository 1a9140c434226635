//! # sitedex-core
//!
//! Core library for the sitedex content pipeline.
//!
//! This crate provides the building blocks for parsing markdown content,
//! aggregating it into a searchable snapshot, and publishing that
//! snapshot to a hosted search index.

pub mod aggregate;
pub mod collections;
pub mod config;
pub mod dates;
pub mod frontmatter;
pub mod models;
pub mod normalize;
pub mod pagemeta;
pub mod publish;
pub mod search;
pub mod sitemap;
pub mod strip;
pub mod tags;

pub use aggregate::{aggregate_content, Aggregated, AggregationOptions};
pub use config::Config;
pub use dates::{ContentDateMap, DateResolver};
pub use frontmatter::{parse_frontmatter, Frontmatter, FrontmatterValue};
pub use models::{
    ContentIndex, ContentItem, ContentStats, ContentType, SearchData, SiteInfo, TagInfo,
};
pub use pagemeta::{PageMetadata, PageMetadataMap};
pub use publish::{collection_schema, PublishReport, SearchClient};
pub use search::{search, SearchFilter, SearchRequest, SearchResponse};
pub use strip::{make_excerpt, strip_markdown};
pub use tags::{all_tags, normalize_tag};
