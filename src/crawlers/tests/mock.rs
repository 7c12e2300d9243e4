//! In-memory sessions serving fixed HTML fixtures

use crate::errors::{CrawlError, CrawlResult};
use crate::parsers::html;
use crate::report::CrawlObserver;
use crate::results::{CrawlRecord, CrawlSummary, OutputArtifact};
use crate::session::{PageHandle, Session, SessionFactory};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
struct MockPage {
    html: String,
    delay: Duration,
    broken: bool,
}

/// A fake website plus counters for what the crawler did with it
#[derive(Debug, Default)]
pub struct MockSite {
    pages: HashMap<String, MockPage>,
    /// Number of sessions that open before the endpoint starts refusing
    open_limit: Option<usize>,
    fail_close: bool,
    resolve_hrefs: bool,
    open_attempts: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
    navigations: Mutex<Vec<String>>,
}

impl MockSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.slow_page(url, html, 0)
    }

    pub fn slow_page(mut self, url: &str, html: &str, delay_ms: u64) -> Self {
        self.pages.insert(
            url.to_string(),
            MockPage {
                html: html.to_string(),
                delay: Duration::from_millis(delay_ms),
                broken: false,
            },
        );
        self
    }

    /// A page that loads but whose text cannot be read
    pub fn broken_page(mut self, url: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            MockPage {
                html: String::new(),
                delay: Duration::ZERO,
                broken: true,
            },
        );
        self
    }

    pub fn failing_open(self) -> Self {
        self.failing_open_after(0)
    }

    /// Opens `limit` sessions, then refuses every further connection
    pub fn failing_open_after(mut self, limit: usize) -> Self {
        self.open_limit = Some(limit);
        self
    }

    /// Report anchors the way a browser does, resolved against the page URL
    pub fn resolving_hrefs(mut self) -> Self {
        self.resolve_hrefs = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    fn lookup(&self, url: &str) -> CrawlResult<&MockPage> {
        self.pages
            .get(url)
            .ok_or_else(|| CrawlError::navigation(url, "ERR_NAME_NOT_RESOLVED"))
    }
}

pub struct MockFactory {
    site: Arc<MockSite>,
}

impl MockFactory {
    pub fn new(site: Arc<MockSite>) -> Arc<Self> {
        Arc::new(Self { site })
    }
}

#[async_trait]
impl SessionFactory for MockFactory {
    async fn open(&self) -> CrawlResult<Box<dyn Session>> {
        let attempt = self.site.open_attempts.fetch_add(1, Ordering::SeqCst);
        if self.site.open_limit.is_some_and(|limit| attempt >= limit) {
            return Err(CrawlError::Resource("connection refused".to_string()));
        }
        self.site.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            site: Arc::clone(&self.site),
            closed: false,
        }))
    }
}

struct MockSession {
    site: Arc<MockSite>,
    closed: bool,
}

#[async_trait]
impl Session for MockSession {
    async fn navigate(&mut self, url: &str) -> CrawlResult<PageHandle> {
        assert!(!self.closed, "navigation on a closed session");
        self.site.navigations.lock().unwrap().push(url.to_string());

        let delay = self.site.lookup(url)?.delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(PageHandle::new(url))
    }

    async fn anchor_targets(&mut self, page: &PageHandle) -> CrawlResult<Vec<String>> {
        let fixture = self.site.lookup(page.url())?;
        let targets = html::anchor_targets(&fixture.html);
        if !self.site.resolve_hrefs {
            return Ok(targets);
        }

        let base = Url::parse(page.url())
            .map_err(|e| CrawlError::navigation(page.url(), e))?;
        Ok(targets
            .into_iter()
            .map(|target| match base.join(&target) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => target,
            })
            .collect())
    }

    async fn body_text(&mut self, page: &PageHandle) -> CrawlResult<String> {
        let fixture = self.site.lookup(page.url())?;
        if fixture.broken {
            return Err(CrawlError::fetch(page.url(), "page has no body element"));
        }
        html::body_text(&fixture.html)
            .ok_or_else(|| CrawlError::fetch(page.url(), "page has no body element"))
    }

    async fn close(&mut self) -> CrawlResult<()> {
        assert!(!self.closed, "session closed twice");
        self.closed = true;
        self.site.closed.fetch_add(1, Ordering::SeqCst);
        if self.site.fail_close {
            return Err(CrawlError::Resource("session already gone".to_string()));
        }
        Ok(())
    }
}

/// Observer that keeps a transcript of the events it saw
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl CrawlObserver for RecordingObserver {
    fn crawl_started(&self, root_url: &str) {
        self.push(format!("started {}", root_url));
    }

    fn links_discovered(&self, _root_url: &str, count: usize) {
        self.push(format!("links {}", count));
    }

    fn fetch_started(&self, index: usize, total: usize, url: &str) {
        self.push(format!("fetch {}/{} {}", index, total, url));
    }

    fn record_completed(&self, index: usize, total: usize, record: &CrawlRecord) {
        self.push(format!("record {}/{} {}", index, total, record.url));
    }

    fn crawl_finished(&self, summary: &CrawlSummary) {
        self.push(format!("finished {}/{}", summary.records, summary.links));
    }

    fn artifact_written(&self, artifact: &OutputArtifact) {
        self.push(format!("artifact {}", artifact.size_bytes));
    }
}
