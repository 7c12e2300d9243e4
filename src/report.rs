use crate::results::{CrawlRecord, CrawlSummary, OutputArtifact};

/// Receives progress from the crawl orchestrator
///
/// Every method has an empty default so observers only implement what they
/// report on. Calls arrive from the orchestrator task, except `fetch_started`
/// which concurrent workers emit as they pick up links.
pub trait CrawlObserver: Send + Sync {
    fn crawl_started(&self, _root_url: &str) {}

    fn links_discovered(&self, _root_url: &str, _count: usize) {}

    fn fetch_started(&self, _index: usize, _total: usize, _url: &str) {}

    fn record_completed(&self, _index: usize, _total: usize, _record: &CrawlRecord) {}

    fn crawl_finished(&self, _summary: &CrawlSummary) {}

    fn artifact_written(&self, _artifact: &OutputArtifact) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}

/// Observer that reports progress through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl CrawlObserver for LogReporter {
    fn crawl_started(&self, root_url: &str) {
        ::log::info!("Top level URL being parsed: {}", root_url);
    }

    fn links_discovered(&self, _root_url: &str, count: usize) {
        ::log::info!("Total links that will be traversed: {}", count);
    }

    fn fetch_started(&self, index: usize, total: usize, url: &str) {
        ::log::info!("[{}/{}] Current link being crawled: {}", index + 1, total, url);
    }

    fn record_completed(&self, index: usize, total: usize, record: &CrawlRecord) {
        ::log::info!(
            "[{}/{}] ✓ {} ({:.2} ms)",
            index + 1,
            total,
            record.url,
            record.fetch_duration_ms()
        );
        ::log::debug!("{} yielded {} bytes of text", record.url, record.content.len());
    }

    fn crawl_finished(&self, summary: &CrawlSummary) {
        ::log::info!(
            "Crawled {} of {} links from {} in {:.2} ms",
            summary.records,
            summary.links,
            summary.root_url,
            summary.elapsed.as_secs_f64() * 1000.0
        );
    }

    fn artifact_written(&self, artifact: &OutputArtifact) {
        ::log::info!("Output file length: {:.2} KB", artifact.size_kb());
        ::log::info!("Markdown file created: {}", artifact.path.display());
    }
}
