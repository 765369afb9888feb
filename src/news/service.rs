//! News service: the crawl cycle orchestrator.
//!
//! One [`NewsService`] owns the collection, the snapshot store and the
//! source registry. A crawl cycle fetches and normalizes every source in
//! registry order, merges the results, ranks and truncates, then saves.
//! Cycles are serialized by the lock around the working collection and
//! readers only ever see a fully ranked collection.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::news::collection::{Collection, SharedCollection};
use crate::news::fetcher::{FeedFetcher, HttpFetcher};
use crate::news::normalize::normalize;
use crate::news::registry::{default_sources, Source};
use crate::news::store::SnapshotStore;
use crate::news::types::{Entry, DEFAULT_SOURCE_DELAY_MS, MAX_ENTRIES};

/// A source that produced no entries in a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Source display name.
    pub source: String,
    /// Error description.
    pub error: String,
}

/// Outcome of one crawl cycle.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// When the cycle started.
    pub started_at: DateTime<Utc>,
    /// When the cycle finished.
    pub finished_at: DateTime<Utc>,
    /// Sources fetched and parsed successfully, in registry order.
    pub succeeded: Vec<String>,
    /// Sources skipped because of a fetch or parse error.
    pub failed: Vec<SourceFailure>,
    /// Entries added by the merge.
    pub added: usize,
    /// Entries dropped by retention.
    pub evicted: usize,
    /// Collection size after the cycle.
    pub total: usize,
}

/// Service that crawls the registered sources into one collection.
pub struct NewsService<F: FeedFetcher = HttpFetcher> {
    fetcher: F,
    sources: Vec<Source>,
    store: SnapshotStore,
    working: Mutex<Collection>,
    shared: SharedCollection,
    source_delay: Duration,
    max_entries: usize,
}

impl NewsService<HttpFetcher> {
    /// Build a service for the compiled-in sources from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.crawler)?;
        Ok(Self::new(fetcher, SnapshotStore::new(&config.storage.path))
            .with_source_delay(Duration::from_millis(config.crawler.source_delay_ms))
            .with_max_entries(config.crawler.max_entries))
    }
}

impl<F: FeedFetcher> NewsService<F> {
    /// Create a service polling the compiled-in sources.
    pub fn new(fetcher: F, store: SnapshotStore) -> Self {
        Self {
            fetcher,
            sources: default_sources(),
            store,
            working: Mutex::new(Collection::new()),
            shared: SharedCollection::new(),
            source_delay: Duration::from_millis(DEFAULT_SOURCE_DELAY_MS),
            max_entries: MAX_ENTRIES,
        }
    }

    /// Replace the source list.
    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    /// Set the delay between consecutive sources.
    pub fn with_source_delay(mut self, delay: Duration) -> Self {
        self.source_delay = delay;
        self
    }

    /// Set the retention window.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sources in polling order.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// The fetcher used for every source.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Current entries, newest first once a cycle has run.
    pub fn entries(&self) -> Arc<Vec<Entry>> {
        self.shared.snapshot()
    }

    /// Read handle for consumers outside the service (the web API).
    pub fn reader(&self) -> SharedCollection {
        self.shared.clone()
    }

    /// Hydrate the collection from the snapshot store.
    ///
    /// Returns the number of entries loaded. On error the collection is
    /// left as it was.
    pub async fn load(&self) -> Result<usize> {
        let mut working = self.working.lock().await;
        let loaded = Collection::from_entries(self.store.load().await?);
        let count = loaded.len();
        self.shared.publish(loaded.entries().to_vec());
        *working = loaded;

        info!(
            "Loaded {} entries from {}",
            count,
            self.store.path().display()
        );
        Ok(count)
    }

    /// Run one crawl cycle over all sources.
    ///
    /// Fetch and parse failures are logged and recorded in the report.
    /// Ranking and saving always run, even if every source failed. Only a
    /// failed save makes the cycle fail; the in-memory collection still
    /// reflects the cycle in that case.
    pub async fn crawl_all_sources(&self) -> Result<CrawlReport> {
        let mut working = self.working.lock().await;
        let started_at = Utc::now();
        info!("Starting crawl of {} source(s)", self.sources.len());

        let mut next = working.clone();
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        let mut added = 0;

        for (index, source) in self.sources.iter().enumerate() {
            info!("Crawling: {}", source.name);
            match self.crawl_source(source, &mut next).await {
                Ok(count) => {
                    debug!("{}: {} new entries", source.name, count);
                    added += count;
                    succeeded.push(source.name.clone());
                }
                Err(e) => {
                    if e.is_source_local() {
                        warn!("Failed to crawl {}: {}", source.name, e);
                    } else {
                        error!("Failed to crawl {}: {}", source.name, e);
                    }
                    failed.push(SourceFailure {
                        source: source.name.clone(),
                        error: e.to_string(),
                    });
                }
            }

            if index + 1 < self.sources.len() && !self.source_delay.is_zero() {
                tokio::time::sleep(self.source_delay).await;
            }
        }

        let evicted = next.rank_and_truncate(self.max_entries);
        let total = next.len();
        self.shared.publish(next.entries().to_vec());
        *working = next;

        if let Err(e) = self.store.save(working.entries()).await {
            error!("Failed to save entries: {}", e);
            return Err(e);
        }

        info!(
            "Crawl complete: {} entries ({} new, {} evicted, {} source(s) failed)",
            total,
            added,
            evicted,
            failed.len()
        );

        Ok(CrawlReport {
            started_at,
            finished_at: Utc::now(),
            succeeded,
            failed,
            added,
            evicted,
            total,
        })
    }

    /// Fetch, normalize and merge one source. Returns the number added.
    async fn crawl_source(&self, source: &Source, collection: &mut Collection) -> Result<usize> {
        let body = self.fetcher.fetch(&source.url).await?;
        let entries = normalize(&body, &source.name)?;
        debug!("{}: parsed {} item(s)", source.name, entries.len());
        Ok(collection.merge(entries))
    }
}
