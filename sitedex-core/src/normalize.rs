//! Normalization of heterogeneous sources into the unified content shape.
//!
//! One mapping function per source variant (blog, whitepaper, page).
//! Every sortable record leaves here with a valid `date_timestamp`;
//! unparseable source dates fall back through the resolver rather than
//! propagating into the search index.

use crate::collections::ContentFile;
use crate::dates::{DateResolver, ResolvedDate};
use crate::models::{ContentItem, ContentType};
use crate::pagemeta::PageMetadata;
use crate::strip::{make_excerpt, strip_markdown};
use chrono::NaiveDate;

const EXCERPT_CHARS: usize = 200;

/// Prefix a site-relative path with the base URL when absolute URLs are
/// requested
pub fn format_url(path: &str, base: Option<&str>) -> String {
    match base {
        Some(base) => format!("{}{}", base, path),
        None => path.to_string(),
    }
}

fn text_field(file: &ContentFile, key: &str) -> Option<String> {
    file.frontmatter
        .get(key)
        .and_then(|v| v.as_text())
        .map(|s| s.to_string())
}

fn list_field(file: &ContentFile, key: &str) -> Vec<String> {
    file.frontmatter
        .get(key)
        .and_then(|v| v.as_list())
        .map(|l| l.to_vec())
        .unwrap_or_default()
}

/// Map a blog post into the unified shape
pub fn normalize_blog(
    file: &ContentFile,
    resolver: &DateResolver,
    extended: bool,
    base: Option<&str>,
) -> ContentItem {
    let plain = strip_markdown(&file.body);
    let resolved = resolver.resolve(&format!("/blog/{}/", file.slug), &file.frontmatter);

    let mut item = ContentItem::new(
        format!("blog-{}", file.slug),
        ContentType::Blog,
        text_field(file, "title").unwrap_or_else(|| "Untitled".to_string()),
    );
    item.slug = format_url(&format!("/blog/{}", file.slug), base);
    item.excerpt =
        Some(text_field(file, "excerpt").unwrap_or_else(|| make_excerpt(&plain, EXCERPT_CHARS)));
    item.content = Some(plain);
    item.tags = list_field(file, "tags");
    item.author = Some(text_field(file, "author").unwrap_or_else(|| "Unknown".to_string()));
    item.date = Some(resolved.as_string());
    item.date_timestamp = Some(resolved.timestamp);
    item.category = Some(text_field(file, "category").unwrap_or_else(|| "Blog".to_string()));

    if extended {
        apply_extended_fields(&mut item, file);
    }

    item
}

/// Map a whitepaper into the unified shape
pub fn normalize_whitepaper(
    file: &ContentFile,
    resolver: &DateResolver,
    extended: bool,
    base: Option<&str>,
) -> ContentItem {
    let plain = strip_markdown(&file.body);
    let resolved = resolver.resolve(&format!("/whitepapers/{}/", file.slug), &file.frontmatter);

    let mut item = ContentItem::new(
        format!("whitepaper-{}", file.slug),
        ContentType::Whitepaper,
        text_field(file, "title").unwrap_or_else(|| "Untitled".to_string()),
    );
    item.slug = format_url(&format!("/whitepapers/{}", file.slug), base);
    item.excerpt =
        Some(text_field(file, "excerpt").unwrap_or_else(|| make_excerpt(&plain, EXCERPT_CHARS)));
    item.content = Some(plain);
    item.tags = list_field(file, "tags");
    item.authors = Some(list_field(file, "authors"));
    item.date = Some(resolved.as_string());
    item.date_timestamp = Some(resolved.timestamp);
    item.category = Some(text_field(file, "category").unwrap_or_else(|| "Whitepaper".to_string()));

    if extended {
        apply_extended_fields(&mut item, file);
    }

    item
}

fn apply_extended_fields(item: &mut ContentItem, file: &ContentFile) {
    item.meta_description = text_field(file, "metaDescription");
    item.keywords = list_field(file, "keywords");
    item.executive_summary = text_field(file, "executiveSummary");
    item.difficulty = text_field(file, "difficulty");
    item.image_url = text_field(file, "image");
}

/// Derive the record id from a page path (`/about/team` → `page-about-team`)
pub fn page_id(path: &str) -> String {
    let dashed = path.replace('/', "-");
    let trimmed = dashed.trim_start_matches('-');
    if trimmed.is_empty() {
        "page-home".to_string()
    } else {
        format!("page-{}", trimmed)
    }
}

/// Map a static-page metadata record into the unified shape
pub fn normalize_page(
    path: &str,
    meta: &PageMetadata,
    extended: bool,
    base: Option<&str>,
) -> ContentItem {
    // Pages have no body; lastmod stands in for the effective date
    let resolved = meta
        .lastmod
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .map(ResolvedDate::from_date)
        .unwrap_or_else(ResolvedDate::today);

    let mut item = ContentItem::new(page_id(path), ContentType::Page, meta.title.clone());
    item.slug = format_url(path, base);
    item.excerpt = Some(meta.excerpt.clone());
    item.content = meta
        .executive_summary
        .clone()
        .or_else(|| Some(meta.excerpt.clone()));
    item.tags = meta.tags.clone();
    item.date = Some(resolved.as_string());
    item.date_timestamp = Some(resolved.timestamp);
    item.category = Some(
        meta.category
            .clone()
            .unwrap_or_else(|| "Page".to_string()),
    );

    if extended {
        item.meta_description = meta
            .meta_description
            .clone()
            .or_else(|| meta.description.clone());
        item.keywords = meta.keywords.clone();
        item.executive_summary = meta.executive_summary.clone();
        item.last_updated = meta.lastmod.clone();
    }

    item
}
