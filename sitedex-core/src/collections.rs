//! Content-collection directory readers.
//!
//! A collection is a flat directory of markdown/MDX files sharing a
//! frontmatter schema. Readers return entries sorted by file name so
//! every aggregation pass over the same inputs is deterministic.

use crate::frontmatter::{parse_frontmatter, Frontmatter};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One parsed content file: slug from the file name, parsed header, raw body
#[derive(Debug, Clone)]
pub struct ContentFile {
    pub slug: String,
    pub path: PathBuf,
    pub frontmatter: Frontmatter,
    pub body: String,
}

/// Read every `.md`/`.mdx` file in a collection directory.
///
/// A missing directory is treated as an empty collection (logged), so a
/// site without e.g. whitepapers still aggregates.
pub fn read_collection(dir: &Path) -> Result<Vec<ContentFile>> {
    if !dir.exists() {
        tracing::warn!("Collection directory {:?} not found, treating as empty", dir);
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("md") | Some("mdx")
            )
        })
        .collect();
    paths.sort();

    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        let (frontmatter, body) = parse_frontmatter(&content);

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        entries.push(ContentFile {
            slug,
            path,
            frontmatter,
            body,
        });
    }

    tracing::debug!("Read {} entries from {:?}", entries.len(), dir);
    Ok(entries)
}
