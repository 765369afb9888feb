//! News types for newsdesk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Retention window: maximum number of entries kept after ranking.
pub const MAX_ENTRIES: usize = 100;

/// Maximum feed size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// Default delay between two consecutive sources in milliseconds.
pub const DEFAULT_SOURCE_DELAY_MS: u64 = 1000;

/// Separator substituted for spaces in the title part of an entry id.
pub const ID_TITLE_SEPARATOR: char = '-';

/// Where an entry's `published_at` came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampSource {
    /// Parsed from the date the feed supplied.
    #[default]
    Parsed,
    /// The feed date was missing or unparseable; ingestion time was used.
    Inferred,
}

/// One ingested article.
///
/// Field names are part of the snapshot format and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Article title, whitespace-trimmed.
    pub title: String,
    /// Article URL, whitespace-trimmed.
    pub link: String,
    /// Summary text, whitespace-trimmed. May be empty.
    pub description: String,
    /// Display name of the originating feed.
    pub source: String,
    /// Publish time.
    pub published_at: DateTime<Utc>,
    /// Identity key derived from title and link.
    pub id: String,
    /// Whether `published_at` was parsed or inferred.
    #[serde(default)]
    pub timestamp_source: TimestampSource,
}

impl Entry {
    /// Build an entry from raw field values.
    ///
    /// Trims every text field and derives the identity key from the
    /// trimmed title and link.
    pub fn new(
        title: &str,
        link: &str,
        description: &str,
        source: impl Into<String>,
        published_at: DateTime<Utc>,
        timestamp_source: TimestampSource,
    ) -> Self {
        let title = title.trim().to_string();
        let link = link.trim().to_string();
        let id = entry_id(&title, &link);
        Self {
            title,
            link,
            description: description.trim().to_string(),
            source: source.into(),
            published_at,
            id,
            timestamp_source,
        }
    }

    /// Re-trim the text fields and recompute the id.
    ///
    /// Snapshots written by older versions keyed entries on untrimmed
    /// titles and links.
    pub fn normalized(self) -> Self {
        Self::new(
            &self.title,
            &self.link,
            &self.description,
            self.source,
            self.published_at,
            self.timestamp_source,
        )
    }

    /// Whether the publish time is the ingestion-time fallback.
    pub fn has_inferred_timestamp(&self) -> bool {
        self.timestamp_source == TimestampSource::Inferred
    }
}

/// Compute the identity key for a (title, link) pair.
///
/// Spaces in the title become `-` and the link is appended after another
/// `-`. Readable, but two titles that differ only in space-vs-dash collide.
pub fn entry_id(title: &str, link: &str) -> String {
    let title = title.replace(' ', &ID_TITLE_SEPARATOR.to_string());
    format!("{title}{ID_TITLE_SEPARATOR}{link}")
}
