use crate::errors::CrawlResult;
use crate::results::CrawlRecord;
use crate::session::Session;
use std::time::Instant;

/// Loads `url` and returns the visible text of its body
pub async fn fetch_text(session: &mut dyn Session, url: &str) -> CrawlResult<String> {
    let page = session.navigate(url).await?;
    session.body_text(&page).await
}

/// Fetches one link and times it
///
/// No reporting happens here; the orchestrator hands the record to its
/// observer.
pub async fn crawl_step(session: &mut dyn Session, url: &str) -> CrawlResult<CrawlRecord> {
    let started = Instant::now();
    let content = fetch_text(session, url).await?;
    Ok(CrawlRecord::new(url.to_string(), content, started.elapsed()))
}
