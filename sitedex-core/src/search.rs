//! In-memory search over an aggregated content snapshot.
//!
//! Deliberately simple relevance: exact title match first, then title
//! prefix match, then input order. No scoring beyond those two tiers.

use crate::models::{ContentItem, SearchData};
use serde::{Deserialize, Serialize};

/// Content-type filter for a search request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFilter {
    #[default]
    All,
    Blog,
    Whitepaper,
    Page,
    Tag,
}

impl SearchFilter {
    /// Parse a filter parameter; unknown values fall back to `All`
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "blog" => SearchFilter::Blog,
            "whitepaper" => SearchFilter::Whitepaper,
            "page" => SearchFilter::Page,
            "tag" => SearchFilter::Tag,
            _ => SearchFilter::All,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub filter: SearchFilter,
    pub limit: usize,
    pub offset: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            filter: SearchFilter::All,
            limit: 50,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<ContentItem>,
    pub total: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            has_more: false,
        }
    }
}

fn matches(item: &ContentItem, term: &str) -> bool {
    if item.title.to_lowercase().contains(term) {
        return true;
    }
    if let Some(excerpt) = &item.excerpt {
        if excerpt.to_lowercase().contains(term) {
            return true;
        }
    }
    item.tags.iter().any(|t| t.to_lowercase().contains(term))
}

/// Search the snapshot.
///
/// An empty or whitespace-only query yields an empty result set, not an
/// error. Matching is case-insensitive substring against title, excerpt,
/// and tags; the content body is not consulted on this path.
pub fn search(data: &SearchData, request: &SearchRequest) -> SearchResponse {
    let term = request.query.trim().to_lowercase();
    if term.is_empty() {
        return SearchResponse::empty();
    }

    let mut results: Vec<ContentItem> = Vec::new();

    if matches!(request.filter, SearchFilter::All | SearchFilter::Blog) {
        results.extend(data.blogs.iter().filter(|i| matches(i, &term)).cloned());
    }
    if matches!(request.filter, SearchFilter::All | SearchFilter::Whitepaper) {
        results.extend(
            data.whitepapers
                .iter()
                .filter(|i| matches(i, &term))
                .cloned(),
        );
    }
    if matches!(request.filter, SearchFilter::All | SearchFilter::Page) {
        results.extend(data.pages.iter().filter(|i| matches(i, &term)).cloned());
    }
    if matches!(request.filter, SearchFilter::All | SearchFilter::Tag) {
        results.extend(
            data.tags
                .iter()
                .filter(|i| i.title.to_lowercase().contains(&term))
                .cloned(),
        );
    }

    // Two-tier relevance: exact title match, then prefix match. The
    // stable sort keeps input order within each tier.
    results.sort_by_key(|item| {
        let title = item.title.to_lowercase();
        if title == term {
            0
        } else if title.starts_with(&term) {
            1
        } else {
            2
        }
    });

    let total = results.len();
    let page: Vec<ContentItem> = results
        .into_iter()
        .skip(request.offset)
        .take(request.limit)
        .collect();

    SearchResponse {
        results: page,
        total,
        has_more: request.offset.saturating_add(request.limit) < total,
    }
}
