//! Tag and author indexes derived from normalized content.

use crate::models::{ContentItem, TagInfo, TagSources};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalize a tag for grouping: lowercased, whitespace runs collapsed
/// to a single hyphen. Display keeps the first-seen original casing.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Build the frequency-ranked tag index across blog and whitepaper items.
///
/// Tags are grouped under their normalized key and sorted by descending
/// count; ties keep first-seen order. `count` always equals the sum of
/// the per-source counts.
pub fn all_tags(blogs: &[ContentItem], whitepapers: &[ContentItem]) -> Vec<TagInfo> {
    let mut order: HashMap<String, usize> = HashMap::new();
    let mut infos: Vec<TagInfo> = Vec::new();

    let mut record = |tag: &str, is_blog: bool| {
        let key = normalize_tag(tag);
        if key.is_empty() {
            return;
        }
        let idx = *order.entry(key).or_insert_with(|| {
            infos.push(TagInfo {
                name: tag.to_string(),
                count: 0,
                sources: TagSources::default(),
            });
            infos.len() - 1
        });
        infos[idx].count += 1;
        if is_blog {
            infos[idx].sources.blog += 1;
        } else {
            infos[idx].sources.whitepapers += 1;
        }
    };

    for item in blogs {
        for tag in &item.tags {
            record(tag, true);
        }
    }
    for item in whitepapers {
        for tag in &item.tags {
            record(tag, false);
        }
    }

    // Stable sort keeps first-seen order for equal counts
    infos.sort_by(|a, b| b.count.cmp(&a.count));
    infos
}

/// Top N tags by count
pub fn popular_tags(blogs: &[ContentItem], whitepapers: &[ContentItem], limit: usize) -> Vec<TagInfo> {
    let mut tags = all_tags(blogs, whitepapers);
    tags.truncate(limit);
    tags
}

/// All items carrying the given tag, newest first
pub fn content_by_tag<'a>(
    tag: &str,
    blogs: &'a [ContentItem],
    whitepapers: &'a [ContentItem],
) -> Vec<&'a ContentItem> {
    let key = normalize_tag(tag);
    let mut matched: Vec<&ContentItem> = blogs
        .iter()
        .chain(whitepapers.iter())
        .filter(|item| item.tags.iter().any(|t| normalize_tag(t) == key))
        .collect();

    matched.sort_by(|a, b| {
        b.date_timestamp
            .unwrap_or(0)
            .cmp(&a.date_timestamp.unwrap_or(0))
    });
    matched
}

/// Tags that co-occur with the given tag, most frequent first
pub fn related_tags(
    tag: &str,
    blogs: &[ContentItem],
    whitepapers: &[ContentItem],
    limit: usize,
) -> Vec<String> {
    let key = normalize_tag(tag);
    let mut order: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for item in content_by_tag(tag, blogs, whitepapers) {
        for t in &item.tags {
            let normalized = normalize_tag(t);
            if normalized == key {
                continue;
            }
            let idx = *order.entry(normalized).or_insert_with(|| {
                counts.push((t.clone(), 0));
                counts.len() - 1
            });
            counts[idx].1 += 1;
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(t, _)| t).collect()
}

/// Per-author occurrence breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: String,
    pub count: usize,
    pub sources: TagSources,
}

/// Author index across blog (single author) and whitepaper (author list)
/// items, sorted alphabetically by name.
pub fn all_authors(blogs: &[ContentItem], whitepapers: &[ContentItem]) -> Vec<AuthorInfo> {
    let mut map: HashMap<String, AuthorInfo> = HashMap::new();

    for item in blogs {
        if let Some(author) = &item.author {
            let entry = map.entry(author.clone()).or_insert_with(|| AuthorInfo {
                name: author.clone(),
                count: 0,
                sources: TagSources::default(),
            });
            entry.count += 1;
            entry.sources.blog += 1;
        }
    }

    for item in whitepapers {
        for author in item.authors.as_deref().unwrap_or_default() {
            let entry = map.entry(author.clone()).or_insert_with(|| AuthorInfo {
                name: author.clone(),
                count: 0,
                sources: TagSources::default(),
            });
            entry.count += 1;
            entry.sources.whitepapers += 1;
        }
    }

    let mut authors: Vec<AuthorInfo> = map.into_values().collect();
    authors.sort_by(|a, b| a.name.cmp(&b.name));
    authors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;

    fn item_with_tags(id: &str, ty: ContentType, tags: &[&str]) -> ContentItem {
        let mut item = ContentItem::new(id, ty, id);
        item.tags = tags.iter().map(|t| t.to_string()).collect();
        item
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("Clean Language"), "clean-language");
        assert_eq!(normalize_tag("  spaced   out  "), "spaced-out");
        assert_eq!(normalize_tag("clean-language"), "clean-language");
    }

    #[test]
    fn test_casing_variants_group_and_keep_first_seen_name() {
        let blogs = vec![item_with_tags("b1", ContentType::Blog, &["Clean-Language"])];
        let papers = vec![item_with_tags(
            "w1",
            ContentType::Whitepaper,
            &["clean language"],
        )];

        let tags = all_tags(&blogs, &papers);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "Clean-Language");
        assert_eq!(tags[0].count, 2);
        assert_eq!(tags[0].sources.blog, 1);
        assert_eq!(tags[0].sources.whitepapers, 1);
    }

    #[test]
    fn test_count_invariant_and_descending_order() {
        let blogs = vec![
            item_with_tags("b1", ContentType::Blog, &["alpha", "beta"]),
            item_with_tags("b2", ContentType::Blog, &["beta"]),
        ];
        let papers = vec![item_with_tags("w1", ContentType::Whitepaper, &["beta", "gamma"])];

        let tags = all_tags(&blogs, &papers);
        assert_eq!(tags[0].name, "beta");
        assert_eq!(tags[0].count, 3);
        for tag in &tags {
            assert_eq!(tag.count, tag.sources.blog + tag.sources.whitepapers);
        }
        // alpha and gamma both have count 1; alpha was seen first
        assert_eq!(tags[1].name, "alpha");
        assert_eq!(tags[2].name, "gamma");
    }

    #[test]
    fn test_content_by_tag_sorted_newest_first() {
        let mut old = item_with_tags("b-old", ContentType::Blog, &["topic"]);
        old.date_timestamp = Some(100);
        let mut new = item_with_tags("b-new", ContentType::Blog, &["Topic"]);
        new.date_timestamp = Some(200);

        let blogs = vec![old, new];
        let matched = content_by_tag("topic", &blogs, &[]);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].id, "b-new");
    }

    #[test]
    fn test_related_tags() {
        let blogs = vec![
            item_with_tags("b1", ContentType::Blog, &["main", "side-a", "side-b"]),
            item_with_tags("b2", ContentType::Blog, &["main", "side-a"]),
            item_with_tags("b3", ContentType::Blog, &["unrelated"]),
        ];

        let related = related_tags("main", &blogs, &[], 5);
        assert_eq!(related[0], "side-a");
        assert!(related.contains(&"side-b".to_string()));
        assert!(!related.contains(&"unrelated".to_string()));
        assert!(!related.contains(&"main".to_string()));
    }

    #[test]
    fn test_authors_alphabetical() {
        let mut b1 = ContentItem::new("b1", ContentType::Blog, "B1");
        b1.author = Some("Zoe".into());
        let mut b2 = ContentItem::new("b2", ContentType::Blog, "B2");
        b2.author = Some("Adam".into());
        let mut w1 = ContentItem::new("w1", ContentType::Whitepaper, "W1");
        w1.authors = Some(vec!["Zoe".into(), "Mary".into()]);

        let authors = all_authors(&[b1, b2], &[w1]);
        let names: Vec<&str> = authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Adam", "Mary", "Zoe"]);

        let zoe = authors.iter().find(|a| a.name == "Zoe").unwrap();
        assert_eq!(zoe.count, 2);
        assert_eq!(zoe.sources.blog, 1);
        assert_eq!(zoe.sources.whitepapers, 1);
    }
}
