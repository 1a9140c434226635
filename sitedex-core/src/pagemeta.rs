//! Static page-metadata table.
//!
//! Hand-authored per site path, loaded once at startup, immutable at
//! runtime. Primary source for static pages in aggregation, sitemap
//! priority/changefreq/lastmod, and SEO fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageMetadataError {
    #[error("Failed to read page metadata: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse page metadata YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Sitemap change frequency values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

/// Metadata record for one static site path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub excerpt: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    // Sitemap fields
    #[serde(default)]
    pub lastmod: Option<String>,

    #[serde(default)]
    pub priority: Option<f32>,

    #[serde(default)]
    pub changefreq: Option<ChangeFreq>,

    // Enhanced metadata for SEO/AI consumption
    #[serde(default)]
    pub meta_description: Option<String>,

    #[serde(default)]
    pub executive_summary: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The full table, keyed by site path (`/about`, `/get-started/...`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMetadataMap(pub BTreeMap<String, PageMetadata>);

impl PageMetadataMap {
    pub fn from_file(path: &Path) -> Result<Self, PageMetadataError> {
        let contents = std::fs::read_to_string(path)?;
        let map = serde_yaml::from_str(&contents)?;
        Ok(PageMetadataMap(map))
    }

    /// Lookup with trailing-slash normalization (`/about/` matches `/about`)
    pub fn get(&self, path: &str) -> Option<&PageMetadata> {
        if path == "/" {
            return self.0.get("/");
        }
        self.0.get(path.trim_end_matches('/'))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PageMetadata)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
