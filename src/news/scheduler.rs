//! Background crawler for newsdesk.
//!
//! A single actor task owns every crawl trigger: one cycle immediately at
//! startup, one per interval tick after that, and on-demand requests sent
//! through a [`CrawlerHandle`]. Running everything on one task means two
//! cycles never overlap.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info};

use crate::error::{NewsError, Result};
use crate::news::fetcher::FeedFetcher;
use crate::news::service::{CrawlReport, NewsService};

/// Default crawl interval in seconds (1 hour).
pub const DEFAULT_CRAWL_INTERVAL_SECS: u64 = 3600;

/// Messages accepted by the crawler task.
enum CrawlerMessage {
    CrawlNow(oneshot::Sender<Result<CrawlReport>>),
    Shutdown,
}

/// Handle for communicating with the crawler task.
#[derive(Clone)]
pub struct CrawlerHandle {
    sender: mpsc::Sender<CrawlerMessage>,
}

impl CrawlerHandle {
    /// Run a crawl cycle now and wait for its report.
    ///
    /// Queued behind any cycle already running.
    pub async fn crawl_now(&self) -> Result<CrawlReport> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(CrawlerMessage::CrawlNow(reply))
            .await
            .map_err(|_| NewsError::Scheduler("crawler task is not running".to_string()))?;
        response
            .await
            .map_err(|_| NewsError::Scheduler("crawler task stopped".to_string()))?
    }

    /// Signal the crawler task to stop after the current cycle.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(CrawlerMessage::Shutdown).await;
    }
}

/// Spawn the crawler task on the current runtime.
///
/// The first cycle starts immediately; later cycles run every `period`.
/// Ticks missed while a cycle is running are skipped.
pub fn spawn_crawler<F: FeedFetcher>(
    service: Arc<NewsService<F>>,
    period: Duration,
) -> CrawlerHandle {
    let (sender, mut receiver) = mpsc::channel(8);

    tokio::spawn(async move {
        info!(
            "Crawler started (interval: {} seconds)",
            period.as_secs()
        );

        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The first tick completes immediately: startup crawl.
        timer.tick().await;
        run_cycle(&service, "Initial").await;

        loop {
            tokio::select! {
                // A due tick runs before queued requests.
                biased;
                _ = timer.tick() => {
                    run_cycle(&service, "Scheduled").await;
                }
                msg = receiver.recv() => match msg {
                    Some(CrawlerMessage::CrawlNow(reply)) => {
                        let result = service.crawl_all_sources().await;
                        if let Err(e) = &result {
                            error!("Requested crawl failed: {}", e);
                        }
                        let _ = reply.send(result);
                    }
                    Some(CrawlerMessage::Shutdown) | None => {
                        info!("Crawler stopped");
                        break;
                    }
                },
            }
        }
    });

    CrawlerHandle { sender }
}

async fn run_cycle<F: FeedFetcher>(service: &NewsService<F>, label: &str) {
    if let Err(e) = service.crawl_all_sources().await {
        error!("{} crawl failed: {}", label, e);
    }
}
