//! Effective-date resolution for content items.
//!
//! Precedence: precomputed content-date map (git history, generated
//! offline) → frontmatter `date` → now. Resolution never fails; a
//! record always ends up with a calendar date and a numeric timestamp.

use crate::frontmatter::Frontmatter;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

/// A resolved effective date: calendar day plus midnight-UTC epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub timestamp: i64,
}

impl ResolvedDate {
    pub fn from_date(date: NaiveDate) -> Self {
        let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
        Self { date, timestamp }
    }

    pub fn today() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    /// `YYYY-MM-DD` form used across the wire shapes
    pub fn as_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Precomputed map from canonical URL to `YYYY-MM-DD` date string.
///
/// Generated offline by `sitedex dates` from git commit history and
/// loaded once per process; read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentDateMap(pub BTreeMap<String, String>);

impl ContentDateMap {
    /// Load the generated date map. A missing or unreadable file yields
    /// an empty map rather than an error; the resolver then falls back
    /// to frontmatter dates.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(map) => ContentDateMap(map),
                Err(err) => {
                    tracing::warn!("Failed to parse content-date map {:?}: {}", path, err);
                    ContentDateMap::default()
                }
            },
            Err(_) => {
                tracing::debug!("No content-date map at {:?}, using frontmatter dates", path);
                ContentDateMap::default()
            }
        }
    }

    pub fn get(&self, canonical_url: &str) -> Option<NaiveDate> {
        self.0
            .get(canonical_url)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    pub fn insert(&mut self, canonical_url: impl Into<String>, date: NaiveDate) {
        self.0
            .insert(canonical_url.into(), date.format("%Y-%m-%d").to_string());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolves effective dates through the fallback chain
#[derive(Debug, Clone, Default)]
pub struct DateResolver {
    dates: ContentDateMap,
}

impl DateResolver {
    pub fn new(dates: ContentDateMap) -> Self {
        Self { dates }
    }

    /// Resolve the effective date for a content item.
    ///
    /// `canonical_url` is the trailing-slash form used as the map key
    /// (e.g. `/blog/my-post/`).
    pub fn resolve(&self, canonical_url: &str, frontmatter: &Frontmatter) -> ResolvedDate {
        if let Some(date) = self.dates.get(canonical_url) {
            return ResolvedDate::from_date(date);
        }

        if let Some(date) = frontmatter.get("date").and_then(|v| v.as_date()) {
            return ResolvedDate::from_date(date);
        }

        ResolvedDate::today()
    }
}

/// Last commit date for a file, from `git log`.
///
/// Untracked files (or a missing git binary) return `None`; callers
/// degrade to the next fallback tier.
pub fn git_last_modified(path: &Path) -> Option<NaiveDate> {
    let output = Command::new("git")
        .args(["log", "-1", "--format=%aI", "--"])
        .arg(path)
        .output()
        .ok()?;

    if !output.status.success() {
        tracing::debug!("git log failed for {:?}", path);
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.trim();
    if line.len() < 10 {
        tracing::debug!("No git history for {:?}", path);
        return None;
    }

    NaiveDate::parse_from_str(&line[..10], "%Y-%m-%d").ok()
}
