//! News ingestion for newsdesk.
//!
//! Feed fetch → normalize → merge → rank → truncate → persist.

pub mod collection;
pub mod fetcher;
pub mod normalize;
pub mod registry;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod types;

pub use collection::{Collection, SharedCollection};
pub use fetcher::{validate_url, FeedFetcher, HttpFetcher, MemoryFetcher};
pub use normalize::{normalize, normalize_at, parse_published, DateFormat, DATE_FORMATS};
pub use registry::{default_sources, Source, DEFAULT_SOURCES};
pub use scheduler::{spawn_crawler, CrawlerHandle, DEFAULT_CRAWL_INTERVAL_SECS};
pub use service::{CrawlReport, NewsService, SourceFailure};
pub use store::SnapshotStore;
pub use types::{entry_id, Entry, TimestampSource, MAX_ENTRIES, MAX_FEED_SIZE};
