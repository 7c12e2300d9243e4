use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering, fetching or persisting a crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The rendering session could not load a target URL (root or link)
    #[error("failed to navigate to {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// A page loaded but its text could not be extracted
    #[error("failed to extract text from {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The rendering session could not be opened or released cleanly
    #[error("rendering session error: {0}")]
    Resource(String),

    /// The output folder or file could not be created or written
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    /// The crawl configuration is unusable
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The crawl aborted after the records gathered so far were saved
    #[error("{source} (partial document saved to {})", .path.display())]
    Partial {
        path: PathBuf,
        #[source]
        source: Box<CrawlError>,
    },
}

impl CrawlError {
    pub fn navigation(url: &str, reason: impl ToString) -> Self {
        Self::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Navigation { .. } => 2,
            Self::Fetch { .. } => 3,
            Self::Resource(_) => 4,
            Self::Io(_) => 5,
            Self::Config(_) => 6,
            Self::Partial { source, .. } => source.exit_code(),
        }
    }
}

pub type CrawlResult<T> = Result<T, CrawlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            CrawlError::navigation("https://example.com", "timeout"),
            CrawlError::fetch("https://example.com", "no body"),
            CrawlError::Resource("closed".to_string()),
            CrawlError::Io(std::io::Error::other("disk full")),
            CrawlError::Config("bad".to_string()),
        ];
        let codes: Vec<u8> = errors.iter().map(CrawlError::exit_code).collect();
        assert_eq!(codes, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_partial_uses_source_exit_code() {
        let err = CrawlError::Partial {
            path: PathBuf::from("processed/out.md"),
            source: Box::new(CrawlError::fetch("https://example.com/b", "no body")),
        };
        assert_eq!(err.exit_code(), 3);
        let message = err.to_string();
        assert!(message.contains("https://example.com/b"));
        assert!(message.contains("processed/out.md"));
    }
}
