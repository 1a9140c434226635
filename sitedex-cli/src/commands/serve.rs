//! API server command.
//!
//! Serves the search endpoint, the full content-index snapshot, and
//! on-demand whitepaper PDF downloads. Aggregation runs per request so
//! responses always reflect the content on disk; caching is left to the
//! Cache-Control headers.

use super::load_inputs;
use anyhow::{Context, Result};
use axum::{
    extract::{Path as AxumPath, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use sitedex_core::{
    aggregate_content, search, AggregationOptions, Config, DateResolver, PageMetadataMap,
    SearchFilter, SearchRequest,
};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    resolver: Arc<DateResolver>,
    pages: Arc<PageMetadataMap>,
}

pub async fn serve_api(config_path: &Path, port: Option<u16>) -> Result<()> {
    let (config, dates, pages) = load_inputs(config_path)?;
    let port = port.unwrap_or(config.server.port);

    let state = AppState {
        config: Arc::new(config),
        resolver: Arc::new(DateResolver::new(dates)),
        pages: Arc::new(pages),
    };

    let app = Router::new()
        .route("/api/search", get(api_search))
        .route("/api/content-index.json", get(api_content_index))
        .route("/api/whitepapers/{slug}/pdf", get(api_whitepaper_pdf))
        .with_state(state);

    tracing::info!("Starting API server on http://localhost:{}", port);
    println!("\n🚀 Serving at http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn error_body(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
    filter: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let aggregated = match aggregate_content(
        &state.config,
        &state.resolver,
        &state.pages,
        AggregationOptions::default(),
    )
    .await
    {
        Ok(aggregated) => aggregated,
        Err(err) => {
            tracing::error!("Aggregation failed: {:#}", err);
            return error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to load content" }),
            );
        }
    };

    let request = SearchRequest {
        query: params.q.unwrap_or_default(),
        filter: SearchFilter::parse(params.filter.as_deref().unwrap_or("all")),
        limit: params.limit.unwrap_or(50),
        offset: params.offset.unwrap_or(0),
    };
    let response = search(aggregated.content(), &request);

    (
        [(header::CACHE_CONTROL, "public, max-age=300")],
        Json(response),
    )
        .into_response()
}

async fn api_content_index(State(state): State<AppState>) -> Response {
    let aggregated = match aggregate_content(
        &state.config,
        &state.resolver,
        &state.pages,
        AggregationOptions::full(),
    )
    .await
    {
        Ok(aggregated) => aggregated,
        Err(err) => {
            tracing::error!("Aggregation failed: {:#}", err);
            return error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to load content" }),
            );
        }
    };

    match serde_json::to_string_pretty(&aggregated) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Serialization failed: {}", err);
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to serialize content index" }),
            )
        }
    }
}

async fn api_whitepaper_pdf(
    State(state): State<AppState>,
    AxumPath(slug): AxumPath<String>,
) -> Response {
    let slug = slug.trim().to_string();
    if slug.is_empty() {
        return error_body(StatusCode::BAD_REQUEST, json!({ "error": "Slug is required" }));
    }

    let dir = state.config.whitepaper_dir();
    let source = [
        dir.join(format!("{}.mdx", slug)),
        dir.join(format!("{}.md", slug)),
    ]
    .into_iter()
    .find(|p| p.exists());
    let Some(source) = source else {
        return error_body(StatusCode::NOT_FOUND, json!({ "error": "Whitepaper not found" }));
    };

    let frontmatter = match std::fs::read_to_string(&source) {
        Ok(contents) => sitedex_core::parse_frontmatter(&contents).0,
        Err(err) => {
            tracing::error!("Failed to read {:?}: {}", source, err);
            return error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to generate PDF", "message": err.to_string() }),
            );
        }
    };

    let canonical = format!("/whitepapers/{}/", slug);
    let date = state.resolver.resolve(&canonical, &frontmatter);
    let filename = super::pdf::pdf_filename(&state.config.site.slug, &slug, &date.as_string());

    // Unique per-request output: concurrent requests for the same slug
    // must not clobber each other's file
    let out_file = match tempfile::Builder::new().suffix(".pdf").tempfile() {
        Ok(file) => file,
        Err(err) => {
            return error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to generate PDF", "message": err.to_string() }),
            );
        }
    };

    if let Err(err) = super::pdf::render_whitepaper(&state.config, &slug, out_file.path()).await {
        tracing::error!("PDF render failed for '{}': {:#}", slug, err);
        return error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": "Failed to generate PDF", "message": format!("{:#}", err) }),
        );
    }

    let bytes = match tokio::fs::read(out_file.path()).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to generate PDF", "message": err.to_string() }),
            );
        }
    };

    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitedex_core::ContentDateMap;
    use std::fs;
    use tempfile::tempdir;

    fn fixture_state(root: &std::path::Path) -> AppState {
        let blog = root.join("content/blog");
        let papers = root.join("content/whitepapers");
        fs::create_dir_all(&blog).unwrap();
        fs::create_dir_all(&papers).unwrap();
        fs::write(
            blog.join("hello-world.md"),
            "---\ntitle: Hello World\nauthor: Ann\ndate: 2024-01-01\ntags: [greetings]\n---\nBody text.",
        )
        .unwrap();
        fs::write(
            papers.join("field-guide.mdx"),
            "---\ntitle: Field Guide\nauthors: [Ann]\ndate: 2023-11-01\ntags: [guides]\n---\nGuide body.",
        )
        .unwrap();

        let config_path = root.join("sitedex.yml");
        fs::write(
            &config_path,
            r#"
site:
  name: "Example Foundation"
  url: "https://example.foundation"
  description: "Example content"
paths:
  blog: "content/blog"
  whitepapers: "content/whitepapers"
  pages: "data/pages.yml"
"#,
        )
        .unwrap();
        let config = Config::from_file(&config_path).unwrap();

        let pages: PageMetadataMap = PageMetadataMap(
            serde_yaml::from_str(
                r#"
"/about":
  title: "About"
  excerpt: "About page"
  tags: []
"#,
            )
            .unwrap(),
        );

        AppState {
            config: Arc::new(config),
            resolver: Arc::new(DateResolver::new(ContentDateMap::default())),
            pages: Arc::new(pages),
        }
    }

    #[tokio::test]
    async fn test_search_endpoint_empty_query() {
        let dir = tempdir().unwrap();
        let state = fixture_state(dir.path());

        let params = SearchParams {
            q: None,
            filter: None,
            limit: None,
            offset: None,
        };
        let response = api_search(State(state), Query(params)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["total"], 0);
        assert_eq!(value["hasMore"], false);
        assert!(value["results"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_endpoint_finds_blog() {
        let dir = tempdir().unwrap();
        let state = fixture_state(dir.path());

        let params = SearchParams {
            q: Some("hello".into()),
            filter: Some("blog".into()),
            limit: None,
            offset: None,
        };
        let response = api_search(State(state), Query(params)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=300"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["results"][0]["id"], "blog-hello-world");
    }

    #[tokio::test]
    async fn test_content_index_envelope() {
        let dir = tempdir().unwrap();
        let state = fixture_state(dir.path());

        let response = api_content_index(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=3600"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["site"]["name"], "Example Foundation");
        assert_eq!(value["stats"]["totalBlogs"], 1);
        assert!(value["content"]["blogs"][0]["slug"]
            .as_str()
            .unwrap()
            .starts_with("https://example.foundation/blog/"));
    }

    #[tokio::test]
    async fn test_pdf_endpoint_unknown_slug_is_404() {
        let dir = tempdir().unwrap();
        let state = fixture_state(dir.path());

        let response = api_whitepaper_pdf(State(state), AxumPath("missing".into())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Whitepaper not found");
    }

    #[tokio::test]
    async fn test_pdf_endpoint_render_failure_is_500_with_message() {
        let dir = tempdir().unwrap();
        let state = fixture_state(dir.path());

        // Whitepaper exists in the collection but the site was never built
        let response = api_whitepaper_pdf(State(state), AxumPath("field-guide".into())).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Failed to generate PDF");
        assert!(value["message"].as_str().unwrap().contains("Built page not found"));
    }

    #[tokio::test]
    async fn test_pdf_endpoint_blank_slug_is_400() {
        let dir = tempdir().unwrap();
        let state = fixture_state(dir.path());

        let response = api_whitepaper_pdf(State(state), AxumPath("  ".into())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Slug is required");
    }
}
