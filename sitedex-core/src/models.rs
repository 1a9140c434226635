//! Unified content model shared by aggregation, search, and publishing.

use serde::{Deserialize, Serialize};

/// Kind of content a record was normalized from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    Whitepaper,
    Page,
    Tag,
}

impl ContentType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "blog" => Some(ContentType::Blog),
            "whitepaper" => Some(ContentType::Whitepaper),
            "page" => Some(ContentType::Page),
            "tag" => Some(ContentType::Tag),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Blog => "blog",
            ContentType::Whitepaper => "whitepaper",
            ContentType::Page => "page",
            ContentType::Tag => "tag",
        }
    }
}

/// A single normalized content record.
///
/// Produced fresh on every aggregation pass and never mutated afterwards.
/// Exactly one of `author` (blog) or `authors` (whitepaper) is populated;
/// page and tag records carry neither. Field names mirror the hosted
/// search schema, so a `ContentItem` serializes directly into an
/// importable search document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,

    #[serde(rename = "type")]
    pub content_type: ContentType,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Plain-text body, present for blog/whitepaper records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Canonical path, absolute or site-relative per aggregation options
    pub slug: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,

    /// Resolved effective date as `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Epoch seconds at midnight UTC for the resolved date.
    /// Always a valid integer for sortable types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_timestamp: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Occurrence count, only on tag records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    // Extended metadata, populated only under `include_extended_meta`
    #[serde(rename = "metaDescription", skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(rename = "executiveSummary", skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(rename = "lastUpdated", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl ContentItem {
    /// Bare record with only the required fields filled in
    pub fn new(id: impl Into<String>, content_type: ContentType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content_type,
            title: title.into(),
            excerpt: None,
            content: None,
            slug: String::new(),
            tags: Vec::new(),
            author: None,
            authors: None,
            date: None,
            date_timestamp: None,
            category: None,
            count: None,
            meta_description: None,
            keywords: Vec::new(),
            executive_summary: None,
            difficulty: None,
            image_url: None,
            last_updated: None,
        }
    }
}

/// Per-source occurrence breakdown for a tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSources {
    pub blog: usize,
    pub whitepapers: usize,
}

/// A tag with its total count and per-source breakdown.
///
/// `name` keeps the casing of the first occurrence seen; grouping uses
/// the normalized key. Invariant: `count == sources.blog + sources.whitepapers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    pub name: String,
    pub count: usize,
    pub sources: TagSources,
}

/// The bare four-way split consumed by client-side search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchData {
    pub blogs: Vec<ContentItem>,
    pub whitepapers: Vec<ContentItem>,
    pub pages: Vec<ContentItem>,
    pub tags: Vec<ContentItem>,
}

impl SearchData {
    pub fn total_content(&self) -> usize {
        self.blogs.len() + self.whitepapers.len() + self.pages.len()
    }
}

/// Site identity block for the content-index envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    pub name: String,
    pub url: String,
    pub description: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

/// Count summary attached when `include_stats` is requested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentStats {
    #[serde(rename = "totalBlogs")]
    pub total_blogs: usize,
    #[serde(rename = "totalWhitepapers")]
    pub total_whitepapers: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
    #[serde(rename = "totalTags")]
    pub total_tags: usize,
    #[serde(rename = "totalContent")]
    pub total_content: usize,
}

/// Aggregation result envelope with optional site/stats blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentIndex {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteInfo>,

    pub content: SearchData,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ContentStats>,
}
