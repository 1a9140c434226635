//! Markdown/MDX stripping for search indexing.
//!
//! A best-effort lexical transform, not a markdown parser. Component
//! blocks are assumed non-textual and removed wholesale; everything
//! else keeps its human-readable text. Pass order matters because the
//! patterns overlap (fences before inline code, images before links).

use regex::Regex;
use std::sync::OnceLock;

struct StripPatterns {
    imports: Regex,
    component_blocks: Regex,
    self_closing: Regex,
    code_fences: Regex,
    inline_code: Regex,
    headings: Regex,
    bold: Regex,
    italic: Regex,
    images: Regex,
    links: Regex,
    list_markers: Regex,
    numbered_markers: Regex,
    quote_markers: Regex,
    excess_newlines: Regex,
}

static PATTERNS: OnceLock<StripPatterns> = OnceLock::new();

fn patterns() -> &'static StripPatterns {
    PATTERNS.get_or_init(|| StripPatterns {
        imports: Regex::new(r#"import\s+.*?from\s+['"].*?['"];?[ \t]*\n?"#).unwrap(),
        component_blocks: Regex::new(r"(?s)<[A-Z][^>]*>.*?</[A-Z][^>]*>").unwrap(),
        self_closing: Regex::new(r"<[A-Z][^>]*/>").unwrap(),
        code_fences: Regex::new(r"(?s)```.*?```").unwrap(),
        inline_code: Regex::new(r"`([^`]+)`").unwrap(),
        headings: Regex::new(r"(?m)^#{1,6}\s+").unwrap(),
        bold: Regex::new(r"\*\*([^*]*)\*\*").unwrap(),
        italic: Regex::new(r"\*([^*]*)\*").unwrap(),
        images: Regex::new(r"!\[([^\]]*)\]\([^)]+\)").unwrap(),
        links: Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap(),
        list_markers: Regex::new(r"(?m)^\s*[-*+]\s+").unwrap(),
        numbered_markers: Regex::new(r"(?m)^\s*\d+\.\s+").unwrap(),
        quote_markers: Regex::new(r"(?m)^>\s+").unwrap(),
        excess_newlines: Regex::new(r"\n{3,}").unwrap(),
    })
}

/// Strip MDX components and markdown syntax, leaving plain text.
///
/// Plain text containing no markup passes through unchanged apart from
/// the trailing whitespace trim.
pub fn strip_markdown(content: &str) -> String {
    let p = patterns();

    let text = p.imports.replace_all(content, "");
    let text = p.component_blocks.replace_all(&text, "");
    let text = p.self_closing.replace_all(&text, "");
    let text = p.code_fences.replace_all(&text, "");
    let text = p.inline_code.replace_all(&text, "$1");
    let text = p.headings.replace_all(&text, "");
    let text = p.bold.replace_all(&text, "$1");
    let text = p.italic.replace_all(&text, "$1");
    let text = p.images.replace_all(&text, "$1");
    let text = p.links.replace_all(&text, "$1");
    let text = p.list_markers.replace_all(&text, "");
    let text = p.numbered_markers.replace_all(&text, "");
    let text = p.quote_markers.replace_all(&text, "");
    let text = p.excess_newlines.replace_all(&text, "\n\n");

    text.trim().to_string()
}

/// Truncated excerpt from plain text, with an ellipsis when cut short
pub fn make_excerpt(plain: &str, max_chars: usize) -> String {
    let truncated: String = plain.chars().take(max_chars).collect();
    if truncated.len() < plain.len() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        let text = "Just a plain paragraph.\n\nAnd another one.";
        assert_eq!(strip_markdown(text), text);
    }

    #[test]
    fn test_imports_removed() {
        let text = "import Widget from './Widget.astro';\nReal content";
        assert_eq!(strip_markdown(text), "Real content");
    }

    #[test]
    fn test_component_blocks_removed_with_inner_content() {
        let text = "Before\n<Callout type=\"info\">\nHidden interactive bit\n</Callout>\nAfter";
        let stripped = strip_markdown(text);
        assert!(stripped.contains("Before"));
        assert!(stripped.contains("After"));
        assert!(!stripped.contains("Hidden"));
    }

    #[test]
    fn test_self_closing_component_removed() {
        let text = "Intro <VideoEmbed id=\"abc\" /> outro";
        assert_eq!(strip_markdown(text), "Intro  outro");
    }

    #[test]
    fn test_lowercase_html_untouched() {
        // Only capitalized component tags are treated as components
        let text = "Some <em>emphasis</em> here";
        assert_eq!(strip_markdown(text), text);
    }

    #[test]
    fn test_markdown_syntax_stripped() {
        let text = "## Heading\n\n**bold** and *italic* and `code`\n\n- item one\n1. numbered\n> quoted";
        let stripped = strip_markdown(text);
        assert_eq!(
            stripped,
            "Heading\n\nbold and italic and code\n\nitem one\nnumbered\nquoted"
        );
    }

    #[test]
    fn test_links_keep_text_images_keep_alt() {
        let text = "See [the docs](https://example.com) and ![diagram](/img/d.png).";
        assert_eq!(strip_markdown(text), "See the docs and diagram.");
    }

    #[test]
    fn test_code_fences_removed_entirely() {
        let text = "Before\n```rust\nfn main() {}\n```\nAfter";
        let stripped = strip_markdown(text);
        assert!(!stripped.contains("fn main"));
        assert!(stripped.contains("Before"));
        assert!(stripped.contains("After"));
    }

    #[test]
    fn test_newlines_collapsed() {
        let text = "One\n\n\n\n\nTwo";
        assert_eq!(strip_markdown(text), "One\n\nTwo");
    }

    #[test]
    fn test_make_excerpt_adds_ellipsis() {
        let long = "a".repeat(300);
        let excerpt = make_excerpt(&long, 200);
        assert_eq!(excerpt.len(), 203);
        assert!(excerpt.ends_with("..."));

        assert_eq!(make_excerpt("short", 200), "short");
    }
}
