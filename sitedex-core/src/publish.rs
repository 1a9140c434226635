//! Search-index publishing to a hosted Typesense-compatible service.
//!
//! Full-refresh semantics: an existing collection is deleted and
//! recreated, then every document is bulk-imported with the `create`
//! action. Partial import failures are classified per document and
//! reported, never escalated to a batch abort.

use crate::config::SearchServiceConfig;
use crate::models::ContentItem;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Search service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Failed to encode documents: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One field in the hosted collection schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionField {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub facet: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl CollectionField {
    fn new(name: &str, field_type: &str, facet: bool, optional: bool) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            facet,
            optional,
        }
    }
}

/// The fixed production schema for the content collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: Vec<CollectionField>,
    pub default_sorting_field: String,
    pub default_sorting_order: String,
}

pub fn collection_schema(name: &str) -> CollectionSchema {
    CollectionSchema {
        name: name.to_string(),
        fields: vec![
            CollectionField::new("id", "string", false, false),
            CollectionField::new("title", "string", false, false),
            CollectionField::new("content", "string", false, true),
            CollectionField::new("excerpt", "string", false, true),
            CollectionField::new("type", "string", true, false),
            CollectionField::new("slug", "string", false, false),
            CollectionField::new("tags", "string[]", true, true),
            CollectionField::new("author", "string", true, true),
            CollectionField::new("authors", "string[]", true, true),
            CollectionField::new("date_timestamp", "int64", false, false),
            CollectionField::new("category", "string", true, true),
            CollectionField::new("keywords", "string[]", false, true),
            CollectionField::new("metaDescription", "string", false, true),
            CollectionField::new("executiveSummary", "string", false, true),
            CollectionField::new("difficulty", "string", true, true),
            CollectionField::new("imageUrl", "string", false, true),
        ],
        default_sorting_field: "date_timestamp".to_string(),
        default_sorting_order: "desc".to_string(),
    }
}

/// Outcome of importing one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

/// Parse the JSONL import response body, one result per document line.
///
/// An unparseable line is treated as a failure for that document rather
/// than aborting the whole classification.
pub fn parse_import_results(body: &str) -> Vec<ImportResult> {
    body.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line).unwrap_or_else(|err| ImportResult {
                success: false,
                error: Some(format!("Unparseable import result: {}", err)),
                document: None,
            })
        })
        .collect()
}

/// Aggregate import tally for operator reporting
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<(String, String)>,
}

impl PublishReport {
    /// Pair per-line results back up with the submitted documents
    pub fn from_results(documents: &[ContentItem], results: &[ImportResult]) -> Self {
        let mut report = PublishReport {
            total: documents.len(),
            ..Default::default()
        };

        for (i, result) in results.iter().enumerate() {
            if result.success {
                report.succeeded += 1;
            } else {
                let id = documents
                    .get(i)
                    .map(|d| d.id.clone())
                    .or_else(|| result.document.clone())
                    .unwrap_or_else(|| "unknown".to_string());
                let reason = result
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string());
                report.failures.push((id, reason));
            }
        }

        report
    }
}

/// HTTP client for the hosted search service
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SearchClient {
    pub fn new(config: &SearchServiceConfig, api_key: String) -> Result<Self, PublishError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: format!("{}://{}:{}", config.protocol, config.host, config.port),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Connectivity check. Failure here is fatal for a publish run.
    pub async fn health(&self) -> Result<(), PublishError> {
        let response = self
            .http
            .get(self.url("/health"))
            .header("X-TYPESENSE-API-KEY", &self.api_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PublishError::Service {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    /// Whether a collection with this name already exists
    pub async fn collection_exists(&self, name: &str) -> Result<bool, PublishError> {
        let response = self
            .http
            .get(self.url(&format!("/collections/{}", name)))
            .header("X-TYPESENSE-API-KEY", &self.api_key)
            .send()
            .await?;

        match response.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(PublishError::Service {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    pub async fn delete_collection(&self, name: &str) -> Result<(), PublishError> {
        let response = self
            .http
            .delete(self.url(&format!("/collections/{}", name)))
            .header("X-TYPESENSE-API-KEY", &self.api_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PublishError::Service {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    pub async fn create_collection(&self, schema: &CollectionSchema) -> Result<(), PublishError> {
        let response = self
            .http
            .post(self.url("/collections"))
            .header("X-TYPESENSE-API-KEY", &self.api_key)
            .json(schema)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(PublishError::Service {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    /// Bulk-import documents with the `create` action.
    ///
    /// The service answers per-document even on partial failure, so the
    /// response body is classified line by line rather than treated as
    /// all-or-nothing.
    pub async fn import_documents(
        &self,
        name: &str,
        documents: &[ContentItem],
    ) -> Result<Vec<ImportResult>, PublishError> {
        let mut body = String::new();
        for doc in documents {
            body.push_str(&serde_json::to_string(doc)?);
            body.push('\n');
        }

        let response = self
            .http
            .post(self.url(&format!(
                "/collections/{}/documents/import?action=create",
                name
            )))
            .header("X-TYPESENSE-API-KEY", &self.api_key)
            .header("Content-Type", "text/plain")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        // 200 with per-line results covers both full and partial success
        if status == 200 {
            Ok(parse_import_results(&text))
        } else {
            Err(PublishError::Service { status, body: text })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;

    #[test]
    fn test_schema_shape() {
        let schema = collection_schema("site-content");
        assert_eq!(schema.default_sorting_field, "date_timestamp");
        assert_eq!(schema.fields.len(), 16);

        let value = serde_json::to_value(&schema).unwrap();
        let fields = value["fields"].as_array().unwrap();
        let type_field = fields.iter().find(|f| f["name"] == "type").unwrap();
        assert_eq!(type_field["facet"], true);
        let ts_field = fields.iter().find(|f| f["name"] == "date_timestamp").unwrap();
        assert_eq!(ts_field["type"], "int64");
        // Non-faceted required fields omit the flags entirely
        let id_field = fields.iter().find(|f| f["name"] == "id").unwrap();
        assert!(id_field.get("facet").is_none());
    }

    #[test]
    fn test_parse_import_results_mixed() {
        let body = "{\"success\":true}\n{\"success\":false,\"error\":\"bad field\",\"document\":\"blog-x\"}\nnot json\n";
        let results = parse_import_results(body);
        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert_eq!(results[1].error.as_deref(), Some("bad field"));
        assert!(!results[2].success);
    }

    #[test]
    fn test_report_pairs_failures_with_documents() {
        let docs = vec![
            ContentItem::new("blog-a", ContentType::Blog, "A"),
            ContentItem::new("blog-b", ContentType::Blog, "B"),
        ];
        let results = vec![
            ImportResult {
                success: true,
                error: None,
                document: None,
            },
            ImportResult {
                success: false,
                error: Some("missing date_timestamp".into()),
                document: None,
            },
        ];

        let report = PublishReport::from_results(&docs, &results);
        assert_eq!(report.total, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "blog-b");
    }
}
