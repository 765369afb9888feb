//! newsdesk - AI news feed aggregator
//!
//! Polls a fixed set of RSS/Atom feeds on a schedule, merges their items
//! into one deduplicated, newest-first collection of at most 100 entries,
//! and persists it as a JSON snapshot served over a small read API.

pub mod config;
pub mod error;
pub mod logging;
pub mod news;
pub mod web;

pub use config::Config;
pub use error::{NewsError, Result};
pub use news::{
    spawn_crawler, CrawlReport, CrawlerHandle, Entry, FeedFetcher, HttpFetcher, MemoryFetcher,
    NewsService, SharedCollection, SnapshotStore, Source, TimestampSource,
};
pub use web::WebServer;
