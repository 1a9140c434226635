//! Restricted frontmatter parsing for markdown/MDX content files.
//!
//! This is deliberately not a YAML parser: content files only use flat
//! `key: value` pairs, bracketed inline lists, and `YYYY-MM-DD` dates,
//! so a line-based parser covers the whole corpus and never fails.

use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// A parsed frontmatter value
#[derive(Debug, Clone, PartialEq)]
pub enum FrontmatterValue {
    Text(String),
    List(Vec<String>),
    Date(NaiveDate),
}

impl FrontmatterValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FrontmatterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FrontmatterValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FrontmatterValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Ordered key → value map from a document header block
pub type Frontmatter = BTreeMap<String, FrontmatterValue>;

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| Regex::new(r"(?s)^---\s*\n(.*?)\n---\s*\n?(.*)$").unwrap())
}

/// Parse the header block from raw document text.
///
/// Returns `(frontmatter, body)`. If no `---` delimited block starts the
/// document, the map is empty and the body is the full input. Lines
/// without a colon are skipped; a malformed `date` is logged and omitted.
///
/// # Example
///
/// ```
/// use sitedex_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: My Post\ntags: [a, b]\n---\nBody text\n";
/// let (fm, body) = parse_frontmatter(content);
/// assert_eq!(fm["title"].as_text(), Some("My Post"));
/// assert_eq!(fm["tags"].as_list().unwrap(), &["a".to_string(), "b".to_string()]);
/// assert!(body.starts_with("Body text"));
/// ```
pub fn parse_frontmatter(content: &str) -> (Frontmatter, String) {
    let re = frontmatter_regex();

    let Some(captures) = re.captures(content) else {
        return (Frontmatter::new(), content.to_string());
    };

    let header = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let body = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    let mut frontmatter = Frontmatter::new();
    for line in header.lines() {
        let Some(colon) = line.find(':') else {
            continue;
        };
        if colon == 0 {
            continue;
        }

        let key = line[..colon].trim();
        let raw = line[colon + 1..].trim();
        if key.is_empty() {
            continue;
        }

        if raw.starts_with('[') && raw.ends_with(']') {
            let items = raw[1..raw.len() - 1]
                .split(',')
                .map(|s| strip_quotes(s.trim()).to_string())
                .filter(|s| !s.is_empty())
                .collect();
            frontmatter.insert(key.to_string(), FrontmatterValue::List(items));
        } else if key == "date" && date_prefix_regex().is_match(strip_quotes(raw)) {
            let cleaned = strip_quotes(raw);
            match NaiveDate::parse_from_str(&cleaned[..10], "%Y-%m-%d") {
                Ok(date) => {
                    frontmatter.insert(key.to_string(), FrontmatterValue::Date(date));
                }
                Err(err) => {
                    // Local parse error: drop the field, downstream falls back
                    tracing::warn!("Skipping malformed date '{}': {}", raw, err);
                }
            }
        } else {
            frontmatter.insert(
                key.to_string(),
                FrontmatterValue::Text(strip_quotes(raw).to_string()),
            );
        }
    }

    (frontmatter, body.to_string())
}

static DATE_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();

fn date_prefix_regex() -> &'static Regex {
    DATE_PREFIX_REGEX.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap())
}

/// Strip one layer of matching surrounding quotes
fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_frontmatter() {
        let content = r#"---
title: "Introduction to Clean Language"
excerpt: A gentle introduction
date: 2024-03-15
tags: [clean-language, communication]
author: Jane Smith
---

# Heading

Body text."#;

        let (fm, body) = parse_frontmatter(content);
        assert_eq!(fm["title"].as_text(), Some("Introduction to Clean Language"));
        assert_eq!(fm["excerpt"].as_text(), Some("A gentle introduction"));
        assert_eq!(
            fm["date"].as_date(),
            Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert_eq!(
            fm["tags"].as_list().unwrap(),
            &["clean-language".to_string(), "communication".to_string()]
        );
        assert!(body.contains("# Heading"));
    }

    #[test]
    fn test_parse_no_frontmatter() {
        let content = "# Just Content\n\nNo frontmatter here.";
        let (fm, body) = parse_frontmatter(content);
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_quoted_values_stripped_once() {
        let content = "---\ntitle: 'Single quoted'\nother: \"double\"\n---\nx";
        let (fm, _) = parse_frontmatter(content);
        assert_eq!(fm["title"].as_text(), Some("Single quoted"));
        assert_eq!(fm["other"].as_text(), Some("double"));
    }

    #[test]
    fn test_list_elements_trimmed_and_unquoted() {
        let content = "---\nauthors: [ \"Ann B\" , 'Carl D', Eve ]\n---\nx";
        let (fm, _) = parse_frontmatter(content);
        assert_eq!(
            fm["authors"].as_list().unwrap(),
            &["Ann B".to_string(), "Carl D".to_string(), "Eve".to_string()]
        );
    }

    #[test]
    fn test_quoted_date_parses() {
        let content = "---\ndate: '2023-01-05'\n---\nx";
        let (fm, _) = parse_frontmatter(content);
        assert_eq!(
            fm["date"].as_date(),
            Some(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap())
        );
    }

    #[test]
    fn test_malformed_date_omitted() {
        let content = "---\ndate: 2023-13-45\ntitle: Still here\n---\nx";
        let (fm, _) = parse_frontmatter(content);
        assert!(fm.get("date").is_none());
        assert_eq!(fm["title"].as_text(), Some("Still here"));
    }

    #[test]
    fn test_line_without_colon_ignored() {
        let content = "---\ntitle: Ok\nthis line has no colon\n---\nx";
        let (fm, _) = parse_frontmatter(content);
        assert_eq!(fm.len(), 1);
        assert_eq!(fm["title"].as_text(), Some("Ok"));
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let content = "---\ntitle: Repeat\ntags: [a, b]\ndate: 2024-01-01\n---\nBody";
        let (first, _) = parse_frontmatter(content);
        let (second, _) = parse_frontmatter(content);
        assert_eq!(first, second);
    }
}
