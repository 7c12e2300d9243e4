use crate::config::CrawlConfig;
use crate::crawlers::fetch::crawl_step;
use crate::crawlers::links::{LinkPolicy, extract_links};
use crate::document::DocumentAssembler;
use crate::errors::{CrawlError, CrawlResult};
use crate::output::{ArtifactWriter, default_filename, prepare_output_path};
use crate::report::{CrawlObserver, NoopObserver};
use crate::results::{CrawlRecord, CrawlSummary, Document, OutputArtifact};
use crate::session::{Session, SessionFactory};
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

type Job = (usize, String);
type JobResult = (usize, CrawlResult<CrawlRecord>);

/// Drives a single-level crawl: discover the root page's links, fetch each
/// one, and fold the results into a document
pub struct Crawler {
    config: CrawlConfig,
    policy: LinkPolicy,
    factory: Arc<dyn SessionFactory>,
    observer: Arc<dyn CrawlObserver>,
}

impl Crawler {
    /// Create a crawler, validating the configuration
    pub fn new(config: CrawlConfig, factory: Arc<dyn SessionFactory>) -> CrawlResult<Self> {
        config.validate()?;
        let policy = LinkPolicy::from_config(&config)?;

        Ok(Self {
            config,
            policy,
            factory,
            observer: Arc::new(NoopObserver),
        })
    }

    /// Set the observer that receives progress events
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawls and returns the document held in memory
    pub async fn run(&self) -> CrawlResult<Document> {
        let mut assembler = DocumentAssembler::in_memory(&self.config.root_url);
        self.run_into(&mut assembler).await?;
        Ok(assembler.into_document())
    }

    /// Crawls and writes the document to `{output_folder}/{output_filename}`
    pub async fn write_artifact(&self) -> CrawlResult<OutputArtifact> {
        let filename = match &self.config.output_filename {
            Some(name) => name.clone(),
            None => default_filename(&self.config.root_url, chrono::Local::now().date_naive())?,
        };
        let path = prepare_output_path(&self.config.output_folder, &filename)?;
        ::log::debug!("Writing document to {}", path.display());

        let writer = ArtifactWriter::create(path)?;
        let mut assembler = DocumentAssembler::begin(writer, &self.config.root_url)?;
        let outcome = self.run_into(&mut assembler).await;

        let writer = match assembler.finish() {
            Ok(writer) => writer,
            Err(e) => return Err(outcome.err().unwrap_or(CrawlError::Io(e))),
        };

        match outcome {
            Ok(_) => {
                let artifact = writer.commit()?;
                self.observer.artifact_written(&artifact);
                Ok(artifact)
            }
            Err(e) if self.config.persist_partial => match writer.commit() {
                Ok(artifact) => {
                    ::log::warn!(
                        "Crawl aborted; partial document saved to {}",
                        artifact.path.display()
                    );
                    self.observer.artifact_written(&artifact);
                    Err(CrawlError::Partial {
                        path: artifact.path,
                        source: Box::new(e),
                    })
                }
                Err(commit_error) => {
                    ::log::error!("Failed to save partial document: {}", commit_error);
                    Err(e)
                }
            },
            Err(e) => {
                if let Err(discard_error) = writer.discard() {
                    ::log::warn!("Failed to remove unfinished document: {}", discard_error);
                }
                Err(e)
            }
        }
    }

    /// Crawls, appending one section per link to `assembler` in link order
    ///
    /// Every session opened here is closed before returning, whether the
    /// crawl succeeded or not.
    pub async fn run_into<W: Write>(
        &self,
        assembler: &mut DocumentAssembler<W>,
    ) -> CrawlResult<CrawlSummary> {
        let started = Instant::now();
        let root_url = self.config.root_url.as_str();
        self.observer.crawl_started(root_url);

        let mut session = self.factory.open().await?;
        let links = if self.config.max_concurrency <= 1 {
            let outcome = self.crawl_sequentially(session.as_mut(), assembler).await;
            release(session, outcome).await?
        } else {
            // Workers bring their own sessions
            let discovered = extract_links(session.as_mut(), root_url, &self.policy).await;
            let links = release(session, discovered).await?;
            self.observer.links_discovered(root_url, links.len());
            self.crawl_concurrently(&links, assembler).await?;
            links.len()
        };

        let summary = CrawlSummary {
            root_url: root_url.to_string(),
            links,
            records: assembler.sections(),
            elapsed: started.elapsed(),
        };
        self.observer.crawl_finished(&summary);
        Ok(summary)
    }

    /// One session, one navigation at a time
    async fn crawl_sequentially<W: Write>(
        &self,
        session: &mut dyn Session,
        assembler: &mut DocumentAssembler<W>,
    ) -> CrawlResult<usize> {
        let root_url = self.config.root_url.as_str();
        let links = extract_links(session, root_url, &self.policy).await?;
        let total = links.len();
        self.observer.links_discovered(root_url, total);

        for (index, url) in links.iter().enumerate() {
            self.observer.fetch_started(index, total, url);
            let record = crawl_step(session, url).await?;
            assembler.append(&record)?;
            self.observer.record_completed(index, total, &record);
        }

        Ok(total)
    }

    /// Fetches with up to `max_concurrency` sessions, appending in link order
    async fn crawl_concurrently<W: Write>(
        &self,
        links: &[String],
        assembler: &mut DocumentAssembler<W>,
    ) -> CrawlResult<()> {
        let total = links.len();
        if total == 0 {
            return Ok(());
        }

        let (job_tx, job_rx) = mpsc::channel::<Job>(total);
        for (index, url) in links.iter().enumerate() {
            job_tx
                .send((index, url.clone()))
                .await
                .map_err(|_| CrawlError::Resource("job queue closed early".to_string()))?;
        }
        drop(job_tx);

        let jobs = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<JobResult>(self.config.max_concurrency);
        let abort = Arc::new(AtomicBool::new(false));

        let mut workers = JoinSet::new();
        for id in 0..self.config.max_concurrency.min(total) {
            workers.spawn(run_worker(Worker {
                id,
                total,
                factory: Arc::clone(&self.factory),
                observer: Arc::clone(&self.observer),
                jobs: Arc::clone(&jobs),
                results: result_tx.clone(),
                abort: Arc::clone(&abort),
            }));
        }
        drop(result_tx);

        let outcome = self
            .append_in_order(&mut result_rx, total, assembler)
            .await;

        // Stop the remaining workers and wait for their sessions to close
        abort.store(true, Ordering::SeqCst);
        drop(result_rx);

        let mut release_error = None;
        while let Some(joined) = workers.join_next().await {
            let released = joined.unwrap_or_else(|e| {
                Err(CrawlError::Resource(format!("worker task failed: {}", e)))
            });
            if let Err(e) = released {
                ::log::warn!("{}", e);
                release_error.get_or_insert(e);
            }
        }

        outcome?;
        match release_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Buffers out-of-order results until the next expected index arrives
    async fn append_in_order<W: Write>(
        &self,
        results: &mut mpsc::Receiver<JobResult>,
        total: usize,
        assembler: &mut DocumentAssembler<W>,
    ) -> CrawlResult<()> {
        let mut pending = BTreeMap::new();
        let mut next = 0;

        while next < total {
            let Some((index, result)) = results.recv().await else {
                return Err(CrawlError::Resource(
                    "workers stopped before every link was fetched".to_string(),
                ));
            };
            pending.insert(index, result?);

            while let Some(record) = pending.remove(&next) {
                assembler.append(&record)?;
                self.observer.record_completed(next, total, &record);
                next += 1;
            }
        }

        Ok(())
    }
}

/// Closes `session`, keeping the crawl's own error if both fail
async fn release<T>(mut session: Box<dyn Session>, outcome: CrawlResult<T>) -> CrawlResult<T> {
    let closed = session.close().await;
    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_error)) => {
            ::log::warn!("Failed to close session after crawl error: {}", close_error);
            Err(e)
        }
    }
}

struct Worker {
    id: usize,
    total: usize,
    factory: Arc<dyn SessionFactory>,
    observer: Arc<dyn CrawlObserver>,
    jobs: Arc<Mutex<mpsc::Receiver<Job>>>,
    results: mpsc::Sender<JobResult>,
    abort: Arc<AtomicBool>,
}

/// Pulls links off the shared queue until it is empty or the crawl aborts
///
/// The session is opened lazily on the first job, so idle workers never
/// connect.
async fn run_worker(worker: Worker) -> CrawlResult<()> {
    ::log::trace!("Worker {} starting", worker.id);
    let mut session: Option<Box<dyn Session>> = None;

    while !worker.abort.load(Ordering::SeqCst) {
        let job = worker.jobs.lock().await.recv().await;
        let Some((index, url)) = job else {
            break;
        };

        if session.is_none() {
            match worker.factory.open().await {
                Ok(opened) => session = Some(opened),
                Err(e) => {
                    let _ = worker.results.send((index, Err(e))).await;
                    break;
                }
            }
        }
        let Some(active) = session.as_deref_mut() else {
            break;
        };

        worker.observer.fetch_started(index, worker.total, &url);
        let result = crawl_step(active, &url).await;
        let failed = result.is_err();
        if worker.results.send((index, result)).await.is_err() || failed {
            break;
        }
    }

    ::log::debug!("Worker {} finished", worker.id);
    match session.as_deref_mut() {
        Some(active) => active.close().await,
        None => Ok(()),
    }
}
