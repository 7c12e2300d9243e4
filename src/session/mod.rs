//! Rendering sessions
//!
//! A session is the capability to load a URL and read the resulting page.
//! The crawler owns its sessions explicitly: they are opened through a
//! [`SessionFactory`], lent out as `&mut dyn Session` to the link extractor
//! and page fetcher, and closed by whoever opened them.

pub mod webdriver;

use crate::errors::CrawlResult;
use async_trait::async_trait;

pub use webdriver::{WebDriverFactory, WebDriverSession};

/// Names the page a session has navigated to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHandle {
    url: String,
}

impl PageHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A browser-like session that can load pages and expose their content
///
/// Sessions are not safe to share across simultaneous navigations; every
/// concurrent fetch needs its own session.
#[async_trait]
pub trait Session: Send {
    /// Loads `url`, making it the current page
    async fn navigate(&mut self, url: &str) -> CrawlResult<PageHandle>;

    /// `href` values of the anchors on the page, in document order
    ///
    /// A browser backend reports them as the browser resolved them, so
    /// relative targets usually arrive absolute.
    async fn anchor_targets(&mut self, page: &PageHandle) -> CrawlResult<Vec<String>>;

    /// Visible text of the page body
    async fn body_text(&mut self, page: &PageHandle) -> CrawlResult<String>;

    /// Releases the underlying automation resource
    async fn close(&mut self) -> CrawlResult<()>;
}

/// Opens new rendering sessions
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> CrawlResult<Box<dyn Session>>;
}
