//! Sitemap entry resolution.
//!
//! The static page-metadata table is authoritative; dynamic routes fall
//! back to type-based heuristics (detail pages rank below index pages,
//! tag pages lowest).

use crate::dates::ContentDateMap;
use crate::models::SearchData;
use crate::pagemeta::{ChangeFreq, PageMetadataMap};
use crate::tags::normalize_tag;
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub path: String,
    pub priority: f32,
    pub changefreq: ChangeFreq,
    pub lastmod: String,
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Resolve sitemap fields for one site path.
///
/// Page-metadata wins when present; otherwise blog detail pages get
/// 0.5/monthly, whitepaper detail pages 0.6/weekly, tag detail pages
/// 0.2, and everything else 0.5/weekly with lastmod today.
pub fn resolve_entry(path: &str, pages: &PageMetadataMap, dates: &ContentDateMap) -> SitemapEntry {
    if let Some(meta) = pages.get(path) {
        return SitemapEntry {
            path: path.to_string(),
            priority: meta.priority.unwrap_or(0.5),
            changefreq: meta.changefreq.unwrap_or(ChangeFreq::Weekly),
            lastmod: meta.lastmod.clone().unwrap_or_else(today),
        };
    }

    let canonical = if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    };
    let content_date = dates
        .get(&canonical)
        .map(|d| d.format("%Y-%m-%d").to_string());

    let (priority, changefreq) = if path.starts_with("/blog/") {
        (0.5, ChangeFreq::Monthly)
    } else if path.starts_with("/whitepapers/") {
        (0.6, ChangeFreq::Weekly)
    } else if path.starts_with("/tags/") {
        (0.2, ChangeFreq::Monthly)
    } else {
        (0.5, ChangeFreq::Weekly)
    };

    SitemapEntry {
        path: path.to_string(),
        priority,
        changefreq,
        lastmod: content_date.unwrap_or_else(today),
    }
}

/// Entries for the whole site: static pages plus every detail page in
/// the aggregated snapshot.
pub fn build_entries(
    data: &SearchData,
    pages: &PageMetadataMap,
    dates: &ContentDateMap,
) -> Vec<SitemapEntry> {
    let mut entries = Vec::new();

    for (path, _) in pages.iter() {
        entries.push(resolve_entry(path, pages, dates));
    }

    for item in data.blogs.iter().chain(data.whitepapers.iter()) {
        entries.push(resolve_entry(&item.slug, pages, dates));
    }

    for item in &data.tags {
        let path = format!("/tags/{}", normalize_tag(&item.title));
        entries.push(resolve_entry(&path, pages, dates));
    }

    entries
}

/// Render entries as a sitemap.xml document
pub fn to_xml(entries: &[SitemapEntry], base_url: &str) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}{}</loc>\n", base_url, entry.path));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", entry.lastmod));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.changefreq.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn pages() -> PageMetadataMap {
        let yaml = r#"
"/about":
  title: "About"
  excerpt: "About page"
  tags: []
  priority: 0.7
  changefreq: weekly
  lastmod: "2025-06-01"
"#;
        PageMetadataMap(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_page_metadata_wins() {
        let entry = resolve_entry("/about", &pages(), &ContentDateMap::default());
        assert_eq!(entry.priority, 0.7);
        assert_eq!(entry.lastmod, "2025-06-01");
        assert_eq!(entry.changefreq, ChangeFreq::Weekly);
    }

    #[test]
    fn test_blog_detail_heuristics() {
        let mut dates = ContentDateMap::default();
        dates.insert("/blog/my-post/", NaiveDate::from_ymd_opt(2024, 4, 4).unwrap());

        let entry = resolve_entry("/blog/my-post", &pages(), &dates);
        assert_eq!(entry.priority, 0.5);
        assert_eq!(entry.changefreq, ChangeFreq::Monthly);
        assert_eq!(entry.lastmod, "2024-04-04");
    }

    #[test]
    fn test_tag_detail_lowest_priority() {
        let entry = resolve_entry("/tags/topic", &pages(), &ContentDateMap::default());
        assert_eq!(entry.priority, 0.2);
    }

    #[test]
    fn test_xml_rendering() {
        let entries = vec![SitemapEntry {
            path: "/about".into(),
            priority: 0.7,
            changefreq: ChangeFreq::Weekly,
            lastmod: "2025-06-01".into(),
        }];
        let xml = to_xml(&entries, "https://example.org");
        assert!(xml.contains("<loc>https://example.org/about</loc>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.7</priority>"));
    }
}
