//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the sitedex.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub paths: PathsConfig,

    #[serde(default)]
    pub search: SearchServiceConfig,

    #[serde(default)]
    pub server: ServerConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

/// Site identity, used for absolute URLs and the content-index envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub url: String,
    pub description: String,

    /// Short token used in generated artifact names (e.g. PDF filenames)
    #[serde(default = "default_site_slug")]
    pub slug: String,
}

fn default_site_slug() -> String {
    String::from("site")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory of blog posts (`*.md`)
    pub blog: PathBuf,

    /// Directory of whitepapers (`*.mdx`)
    pub whitepapers: PathBuf,

    /// Static page-metadata table (YAML)
    pub pages: PathBuf,

    /// Generated content-date map (YAML), may not exist yet
    #[serde(default = "default_dates_path")]
    pub dates: PathBuf,

    /// Built site output (HTML), used by the PDF exporter
    #[serde(default = "default_output_path")]
    pub output: PathBuf,
}

fn default_dates_path() -> PathBuf {
    PathBuf::from("content-dates.yml")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("dist")
}

/// Hosted search service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchServiceConfig {
    #[serde(default = "default_search_host")]
    pub host: String,

    #[serde(default = "default_search_port")]
    pub port: u16,

    #[serde(default = "default_search_protocol")]
    pub protocol: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_search_host() -> String {
    String::from("localhost")
}

fn default_search_port() -> u16 {
    8108
}

fn default_search_protocol() -> String {
    String::from("http")
}

fn default_collection() -> String {
    String::from("site-content")
}

fn default_api_key_env() -> String {
    String::from("SEARCH_API_KEY")
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            host: default_search_host(),
            port: default_search_port(),
            protocol: default_search_protocol(),
            collection: default_collection(),
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    4321
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn blog_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.blog)
    }

    pub fn whitepaper_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.whitepapers)
    }

    pub fn pages_path(&self) -> PathBuf {
        self.resolve_path(&self.paths.pages)
    }

    pub fn dates_path(&self) -> PathBuf {
        self.resolve_path(&self.paths.dates)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Site URL without a trailing slash, for prefixing paths
    pub fn base_url(&self) -> String {
        self.site.url.trim_end_matches('/').to_string()
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_ref().and_then(|p| p.parent()) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }
}
