//! Whitepaper PDF rendering.
//!
//! Renders the built HTML detail page through a headless browser's
//! print pipeline. The browser binary is discovered on PATH; each
//! render is bounded by a timeout so a wedged browser cannot hang a
//! batch run.

use anyhow::{bail, Context, Result};
use sitedex_core::collections::{read_collection, ContentFile};
use sitedex_core::{Config, ContentDateMap, DateResolver};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;
use which::which;

const RENDER_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
];

/// Locate a headless-capable browser on PATH
pub fn find_browser() -> Result<PathBuf> {
    for name in BROWSER_CANDIDATES {
        if let Ok(path) = which(name) {
            return Ok(path);
        }
    }
    bail!(
        "No headless-capable browser found on PATH (tried: {})",
        BROWSER_CANDIDATES.join(", ")
    )
}

/// Print stylesheet injected into the page before rendering: hide the
/// chrome that makes no sense on paper, keep page breaks tidy, and
/// spell out external link targets.
const PRINT_STYLES: &str = r##"<style media="print">
  nav, footer, header, .navbar, .footer, .reading-progress,
  .share-section, .related-section, button, .download-section,
  .nav-button, .toc-navigation { display: none !important; }
  body { margin: 0; padding: 0; }
  h1, h2, h3, h4 { page-break-after: avoid; break-after: avoid; }
  p, li { orphans: 3; widows: 3; }
  img { max-width: 100% !important; height: auto !important; page-break-inside: avoid; }
  a { color: #1a1a1a !important; text-decoration: underline !important; }
  a[href^="http"]:after { content: " (" attr(href) ")"; font-size: 0.8em; color: #666; }
  a[href^="#"]:after, a[href^="/"]:after { content: ""; }
  @page { margin: 2cm; size: A4; }
</style>"##;

/// Download filename: `<site-slug>-whitepaper-<slug>-<YYYY-MM-DD>.pdf`
pub fn pdf_filename(site_slug: &str, slug: &str, date: &str) -> String {
    format!("{}-whitepaper-{}-{}.pdf", site_slug, slug, date)
}

/// Insert the print stylesheet at the end of the document head
fn inject_print_styles(html: &str) -> String {
    match html.find("</head>") {
        Some(i) => format!("{}{}{}", &html[..i], PRINT_STYLES, &html[i..]),
        None => format!("{}{}", PRINT_STYLES, html),
    }
}

/// Render one whitepaper's built detail page to a PDF file.
///
/// The print stylesheet is injected into a temp copy of the page,
/// written next to the original so relative asset paths still resolve.
/// The browser's header/footer template supplies page numbers.
pub async fn render_whitepaper(config: &Config, slug: &str, out_path: &Path) -> Result<()> {
    let html = config
        .output_dir()
        .join("whitepapers")
        .join(slug)
        .join("index.html");
    if !html.exists() {
        bail!("Built page not found at {:?}; run the site build first", html);
    }

    let browser = find_browser()?;
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }

    let source = std::fs::read_to_string(&html)
        .with_context(|| format!("Failed to read {:?}", html))?;
    let page_dir = html.parent().unwrap_or_else(|| Path::new("."));
    let print_page = tempfile::Builder::new()
        .prefix("print-")
        .suffix(".html")
        .tempfile_in(page_dir)
        .context("Failed to create print copy of the page")?;
    std::fs::write(print_page.path(), inject_print_styles(&source))
        .context("Failed to write print copy of the page")?;

    let mut command = tokio::process::Command::new(&browser);
    command
        .arg("--headless")
        .arg("--disable-gpu")
        .arg(format!("--print-to-pdf={}", out_path.display()))
        .arg(format!("file://{}", print_page.path().display()));

    tracing::debug!("Rendering {:?} with {:?}", html, browser);
    let status = timeout(RENDER_TIMEOUT, command.status())
        .await
        .map_err(|_| anyhow::anyhow!("PDF render timed out after {:?}", RENDER_TIMEOUT))?
        .context("Failed to launch browser")?;

    if !status.success() {
        bail!("Browser exited with {}", status);
    }
    if std::fs::metadata(out_path).map(|m| m.len()).unwrap_or(0) == 0 {
        bail!("Browser produced no output at {:?}", out_path);
    }
    Ok(())
}

/// Render one whitepaper (by slug) or every whitepaper (`--all`)
pub async fn render_pdfs(
    config_path: &Path,
    slug: Option<&str>,
    all: bool,
    output: &Path,
) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let resolver = DateResolver::new(ContentDateMap::load(&config.dates_path()));

    let files = read_collection(&config.whitepaper_dir())?;
    let targets: Vec<&ContentFile> = if all {
        files.iter().collect()
    } else if let Some(slug) = slug {
        let file = files
            .iter()
            .find(|f| f.slug == slug)
            .with_context(|| format!("Whitepaper '{}' not found", slug))?;
        vec![file]
    } else {
        bail!("Provide a whitepaper slug or pass --all");
    };

    let mut rendered = 0usize;
    let mut failed = 0usize;
    for file in targets {
        let canonical = format!("/whitepapers/{}/", file.slug);
        let date = resolver.resolve(&canonical, &file.frontmatter);
        let filename = pdf_filename(&config.site.slug, &file.slug, &date.as_string());
        let out_path = output.join(&filename);

        match render_whitepaper(&config, &file.slug, &out_path).await {
            Ok(()) => {
                rendered += 1;
                println!("  ✓ {}", filename);
            }
            Err(err) => {
                failed += 1;
                eprintln!("  ✗ {}: {:#}", file.slug, err);
            }
        }
    }

    println!("Rendered {} PDF(s), {} failed", rendered, failed);
    if failed > 0 {
        bail!("{} whitepaper(s) failed to render", failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_filename_shape() {
        assert_eq!(
            pdf_filename("cli", "clean-language-intro", "2024-03-15"),
            "cli-whitepaper-clean-language-intro-2024-03-15.pdf"
        );
    }

    #[test]
    fn test_print_styles_injected_into_head() {
        let html = "<html><head><title>T</title></head><body><nav>menu</nav>text</body></html>";
        let styled = inject_print_styles(html);

        let style_at = styled.find("<style media=\"print\">").expect("style tag");
        let head_close = styled.find("</head>").expect("head close");
        assert!(style_at < head_close);
        // Navigation and footer are hidden in the print output
        assert!(styled.contains("nav, footer, header"));
        assert!(styled.contains("display: none !important"));
        // The body is untouched
        assert!(styled.contains("<nav>menu</nav>text"));
    }

    #[test]
    fn test_print_styles_prepended_without_head() {
        let fragment = "<body>bare fragment</body>";
        let styled = inject_print_styles(fragment);
        assert!(styled.starts_with("<style media=\"print\">"));
        assert!(styled.ends_with(fragment));
    }
}
