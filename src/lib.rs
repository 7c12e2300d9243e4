// Re-export modules
pub mod config;
pub mod crawlers;
pub mod document;
pub mod errors;
pub mod filter;
pub mod output;
pub mod parsers;
pub mod report;
pub mod results;
pub mod session;

// Re-export commonly used types for convenience
pub use config::{CrawlConfig, LinkResolution, TextSource};
pub use crawlers::Crawler;
pub use document::{DocumentAssembler, assemble};
pub use errors::{CrawlError, CrawlResult};
pub use report::{CrawlObserver, LogReporter};
pub use results::{CrawlRecord, CrawlSummary, Document, OutputArtifact};
pub use session::{Session, SessionFactory, WebDriverFactory};

use std::path::PathBuf;
use std::sync::Arc;

/// Main builder for turning a root page into a Markdown digest of its links
pub struct SiteDigest {
    config: CrawlConfig,
    factory: Option<Arc<dyn SessionFactory>>,
    observer: Arc<dyn CrawlObserver>,
}

impl SiteDigest {
    /// Create a new builder for the given root URL
    pub fn new(root_url: &str) -> Self {
        Self::with_config(CrawlConfig::new(root_url))
    }

    /// Create a builder from a full configuration
    pub fn with_config(config: CrawlConfig) -> Self {
        Self {
            config,
            factory: None,
            observer: Arc::new(LogReporter),
        }
    }

    /// Load configuration from a file
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> CrawlResult<Self> {
        let config = CrawlConfig::from_file(path)?;
        Ok(Self::with_config(config))
    }

    /// Set the folder the document is written to
    pub fn with_output_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.config.output_folder = folder.into();
        self
    }

    /// Set the document file name instead of deriving it from the date and host
    pub fn with_output_filename(mut self, filename: &str) -> Self {
        self.config.output_filename = Some(filename.to_string());
        self
    }

    /// Set the number of pages fetched at once
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Set the WebDriver endpoint
    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.config.webdriver_url = webdriver_url.to_string();
        self
    }

    /// Save the records gathered so far if the crawl aborts
    pub fn with_persist_partial(mut self, persist_partial: bool) -> Self {
        self.config.persist_partial = persist_partial;
        self
    }

    /// Use a custom session backend instead of WebDriver
    pub fn with_session_factory(mut self, factory: Arc<dyn SessionFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Set the observer that receives progress events
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    fn crawler(self) -> CrawlResult<Crawler> {
        let factory: Arc<dyn SessionFactory> = match self.factory {
            Some(factory) => factory,
            None => Arc::new(WebDriverFactory::from_config(&self.config)),
        };
        Ok(Crawler::new(self.config, factory)?.with_observer(self.observer))
    }

    /// Crawl and return the document without writing it anywhere
    pub async fn render(self) -> CrawlResult<Document> {
        self.crawler()?.run().await
    }

    /// Crawl and write the document to disk
    pub async fn write(self) -> CrawlResult<OutputArtifact> {
        self.crawler()?.write_artifact().await
    }
}
