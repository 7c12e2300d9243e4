use crate::errors::{CrawlError, CrawlResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// How relative anchor targets are turned into absolute links
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkResolution {
    /// Join the target onto the root URL like a filesystem path
    #[default]
    PathJoin,
    /// Resolve the target against the root URL per RFC 3986
    Standard,
}

/// Where the text of a fetched page comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// Text of the `<body>` element as rendered by the browser
    #[default]
    Rendered,
    /// Page source parsed locally, one line per block element
    Markup,
}

/// Configuration for a single-level crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Page whose links are crawled
    pub root_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Folder the document is written to
    #[serde(default = "default_output_folder")]
    pub output_folder: PathBuf,

    /// File name of the document (derived from the date and host when absent)
    #[serde(default)]
    pub output_filename: Option<String>,

    /// Number of pages fetched at once, each with its own session
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    #[serde(default)]
    pub link_resolution: LinkResolution,

    #[serde(default)]
    pub text_source: TextSource,

    /// Regex patterns a link must match (any) to be crawled
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns that exclude a link from the crawl
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Save the records gathered so far when the crawl aborts
    #[serde(default)]
    pub persist_partial: bool,

    /// Arguments passed to the browser behind the WebDriver endpoint
    #[serde(default = "default_browser_args")]
    pub browser_args: Vec<String>,
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_output_folder() -> PathBuf {
    PathBuf::from("processed")
}

/// Default value for max_concurrency (sequential)
fn default_max_concurrency() -> usize {
    1
}

fn default_browser_args() -> Vec<String> {
    [
        "--headless",
        "--no-sandbox",
        "--disable-dev-shm-usage",
        "--disable-gpu",
        "--disable-software-rasterizer",
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect()
}

impl CrawlConfig {
    /// Create a new configuration with default values
    pub fn new(root_url: &str) -> Self {
        Self {
            root_url: root_url.to_string(),
            webdriver_url: default_webdriver_url(),
            output_folder: default_output_folder(),
            output_filename: None,
            max_concurrency: default_max_concurrency(),
            link_resolution: LinkResolution::default(),
            text_source: TextSource::default(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            persist_partial: false,
            browser_args: default_browser_args(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CrawlResult<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> CrawlResult<Self> {
        serde_json::from_str(json).map_err(|e| CrawlError::Config(e.to_string()))
    }

    /// Apply the `WEBDRIVER_URL` environment variable, if set
    pub fn with_env_overrides(self) -> Self {
        self.with_webdriver_override(std::env::var("WEBDRIVER_URL").ok())
    }

    fn with_webdriver_override(mut self, webdriver_url: Option<String>) -> Self {
        if let Some(url) = webdriver_url.filter(|url| !url.trim().is_empty()) {
            ::log::debug!("WebDriver URL overridden from environment: {}", url);
            self.webdriver_url = url;
        }
        self
    }

    /// Reject configurations the crawler cannot run with
    pub fn validate(&self) -> CrawlResult<()> {
        if self.root_url.trim().is_empty() {
            return Err(CrawlError::Config("root URL must not be empty".to_string()));
        }
        if self.max_concurrency == 0 {
            return Err(CrawlError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.webdriver_url.trim().is_empty() {
            return Err(CrawlError::Config(
                "WebDriver URL must not be empty".to_string(),
            ));
        }
        if let Some(name) = &self.output_filename {
            if name.trim().is_empty() {
                return Err(CrawlError::Config(
                    "output filename must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_uses_defaults() {
        let config = CrawlConfig::from_json(r#"{"root_url": "https://example.com"}"#).unwrap();

        assert_eq!(config.root_url, "https://example.com");
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.output_folder, PathBuf::from("processed"));
        assert_eq!(config.output_filename, None);
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.link_resolution, LinkResolution::PathJoin);
        assert_eq!(config.text_source, TextSource::Rendered);
        assert!(!config.persist_partial);
        assert!(config.browser_args.contains(&"--headless".to_string()));
        assert!(config.browser_args.contains(&"--no-sandbox".to_string()));
        assert!(config.browser_args.contains(&"--disable-gpu".to_string()));
    }

    #[test]
    fn test_json_overrides() {
        let json = r#"{
            "root_url": "https://example.com/docs",
            "output_folder": "out",
            "output_filename": "docs.md",
            "max_concurrency": 3,
            "link_resolution": "standard",
            "text_source": "markup",
            "exclude_patterns": ["\\.pdf$"]
        }"#;
        let config = CrawlConfig::from_json(json).unwrap();

        assert_eq!(config.output_folder, PathBuf::from("out"));
        assert_eq!(config.output_filename.as_deref(), Some("docs.md"));
        assert_eq!(config.max_concurrency, 3);
        assert_eq!(config.link_resolution, LinkResolution::Standard);
        assert_eq!(config.text_source, TextSource::Markup);
        assert_eq!(config.exclude_patterns, vec![r"\.pdf$".to_string()]);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = CrawlConfig::from_json("{").unwrap_err();
        assert!(matches!(err, CrawlError::Config(_)));
    }

    #[test]
    fn test_webdriver_override() {
        let config = CrawlConfig::new("https://example.com")
            .with_webdriver_override(Some("http://grid:4444/wd/hub".to_string()));
        assert_eq!(config.webdriver_url, "http://grid:4444/wd/hub");

        // Empty values leave the configured endpoint alone
        let config = CrawlConfig::new("https://example.com").with_webdriver_override(Some(
            "  ".to_string(),
        ));
        assert_eq!(config.webdriver_url, "http://localhost:4444");
    }

    #[test]
    fn test_validate() {
        assert!(CrawlConfig::new("https://example.com").validate().is_ok());
        assert!(CrawlConfig::new("").validate().is_err());

        let mut config = CrawlConfig::new("https://example.com");
        config.max_concurrency = 0;
        assert!(matches!(config.validate(), Err(CrawlError::Config(_))));

        let mut config = CrawlConfig::new("https://example.com");
        config.output_filename = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawl.json");
        std::fs::write(&path, r#"{"root_url": "https://example.org"}"#).unwrap();

        let config = CrawlConfig::from_file(&path).unwrap();
        assert_eq!(config.root_url, "https://example.org");

        let missing = CrawlConfig::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, CrawlError::Io(_)));
    }
}
