use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Text fetched for one link, with the time it took
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlRecord {
    /// URL of the page
    pub url: String,

    /// Extracted text content
    pub content: String,

    /// Time spent navigating to the page and reading its text
    pub fetch_duration: Duration,
}

impl CrawlRecord {
    /// Create a new crawl record
    pub fn new(url: String, content: String, fetch_duration: Duration) -> Self {
        Self {
            url,
            content,
            fetch_duration,
        }
    }

    pub fn fetch_duration_ms(&self) -> f64 {
        self.fetch_duration.as_secs_f64() * 1000.0
    }
}

/// The assembled Markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document(String);

impl Document {
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Self {
        // Only ever built from UTF-8 fragments
        Self(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The document persisted on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl OutputArtifact {
    /// Size in kilobytes
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// Totals for a finished crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSummary {
    pub root_url: String,
    /// Number of links discovered on the root page
    pub links: usize,
    /// Number of records appended to the document
    pub records: usize,
    pub elapsed: Duration,
}
