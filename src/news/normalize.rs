//! Entry normalizer.
//!
//! Turns the raw bytes of one feed into [`Entry`] values. RSS 2.0 is read
//! with the `rss` crate so the raw `pubDate` text is available for
//! [`parse_published`]; anything else (Atom, RSS 1.0, JSON Feed) goes
//! through `feed-rs`, whose own date handling is used.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

use crate::error::{NewsError, Result};
use crate::news::types::{Entry, TimestampSource};

/// Date-time layouts tried for a feed's publish date, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `Mon, 02 Jan 2006 15:04:05 MST`
    Rfc1123,
    /// `Mon, 02 Jan 2006 15:04:05 -0700`
    Rfc1123Numeric,
    /// `2006-01-02T15:04:05Z`
    Iso8601Utc,
    /// `2006-01-02T15:04:05-07:00`
    Iso8601Offset,
}

/// Priority order used by [`parse_published`].
pub const DATE_FORMATS: [DateFormat; 4] = [
    DateFormat::Rfc1123,
    DateFormat::Rfc1123Numeric,
    DateFormat::Iso8601Utc,
    DateFormat::Iso8601Offset,
];

/// RFC-1123 after the weekday prefix. Seconds may carry a fraction.
const RFC1123_LAYOUT: &str = "%d %b %Y %H:%M:%S%.f";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

impl DateFormat {
    /// Parse `value` with this layout.
    ///
    /// The weekday name must be well-formed but is not checked against
    /// the date. Fractional seconds are accepted in every layout.
    pub fn parse(self, value: &str) -> Option<DateTime<Utc>> {
        match self {
            DateFormat::Rfc1123 => parse_rfc1123_named_zone(strip_weekday(value)?),
            DateFormat::Rfc1123Numeric => DateTime::parse_from_str(
                strip_weekday(value)?,
                &format!("{RFC1123_LAYOUT} %z"),
            )
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
            DateFormat::Iso8601Utc => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.fZ")
                .ok()
                .map(|naive| naive.and_utc()),
            DateFormat::Iso8601Offset => {
                DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%:z")
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        }
    }
}

/// Drop a leading `Ddd, ` weekday.
fn strip_weekday(value: &str) -> Option<&str> {
    let (weekday, rest) = value.split_once(", ")?;
    WEEKDAYS.contains(&weekday).then_some(rest)
}

/// RFC-1123 with a zone abbreviation. Unknown abbreviations read as UTC.
fn parse_rfc1123_named_zone(value: &str) -> Option<DateTime<Utc>> {
    let (stamp, zone) = value.rsplit_once(' ')?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(stamp, RFC1123_LAYOUT).ok()?;
    let offset = FixedOffset::east_opt(zone_offset_hours(zone) * 3600)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn zone_offset_hours(zone: &str) -> i32 {
    match zone.to_ascii_uppercase().as_str() {
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        _ => 0,
    }
}

/// Resolve a publish timestamp.
///
/// The first layout in [`DATE_FORMATS`] that parses wins. Missing or
/// unparseable values fall back to `now`, tagged as inferred.
pub fn parse_published(raw: Option<&str>, now: DateTime<Utc>) -> (DateTime<Utc>, TimestampSource) {
    let value = raw.map(str::trim).unwrap_or_default();
    DATE_FORMATS
        .iter()
        .find_map(|format| format.parse(value))
        .map(|dt| (dt, TimestampSource::Parsed))
        .unwrap_or((now, TimestampSource::Inferred))
}

/// Normalize a feed body using the current time as the fallback timestamp.
pub fn normalize(bytes: &[u8], source: &str) -> Result<Vec<Entry>> {
    normalize_at(bytes, source, Utc::now())
}

/// Normalize a feed body, using `now` for entries without a usable date.
pub fn normalize_at(bytes: &[u8], source: &str, now: DateTime<Utc>) -> Result<Vec<Entry>> {
    match rss::Channel::read_from(bytes) {
        Ok(channel) => Ok(from_channel(&channel, source, now)),
        Err(rss_err) => match feed_rs::parser::parse(bytes) {
            Ok(feed) => Ok(from_feed(feed, source, now)),
            Err(_) => Err(NewsError::Parse(format!(
                "failed to parse feed: {}",
                rss_err
            ))),
        },
    }
}

fn from_channel(channel: &rss::Channel, source: &str, now: DateTime<Utc>) -> Vec<Entry> {
    channel
        .items()
        .iter()
        .map(|item| {
            let (published_at, timestamp_source) = parse_published(item.pub_date(), now);
            Entry::new(
                item.title().unwrap_or_default(),
                item.link().unwrap_or_default(),
                item.description().unwrap_or_default(),
                source,
                published_at,
                timestamp_source,
            )
        })
        .collect()
}

fn from_feed(feed: feed_rs::model::Feed, source: &str, now: DateTime<Utc>) -> Vec<Entry> {
    feed.entries
        .into_iter()
        .map(|entry| {
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default();
            let description = entry
                .summary
                .map(|t| t.content)
                .or(entry.content.and_then(|c| c.body))
                .unwrap_or_default();
            let (published_at, timestamp_source) = match entry.published.or(entry.updated) {
                Some(dt) => (dt, TimestampSource::Parsed),
                None => (now, TimestampSource::Inferred),
            };

            Entry::new(
                &title,
                &link,
                &description,
                source,
                published_at,
                timestamp_source,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_rfc1123_named_zone() {
        let (dt, src) = parse_published(Some("Mon, 02 Jan 2006 15:04:05 MST"), now());
        assert_eq!(dt, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5).unwrap());
        assert_eq!(src, TimestampSource::Parsed);

        let (dt, _) = parse_published(Some("Tue, 10 Jun 2025 14:30:00 GMT"), now());
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 6, 10, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc1123_numeric_zone() {
        assert_eq!(DateFormat::Rfc1123.parse("Tue, 10 Jun 2025 14:30:00 +0200"), None);

        let (dt, src) = parse_published(Some("Tue, 10 Jun 2025 14:30:00 +0200"), now());
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 6, 10, 12, 30, 0).unwrap());
        assert_eq!(src, TimestampSource::Parsed);
    }

    #[test]
    fn test_parse_iso8601_variants() {
        let (dt, _) = parse_published(Some("2025-06-10T14:30:00Z"), now());
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 6, 10, 14, 30, 0).unwrap());

        let (dt, src) = parse_published(Some("2025-06-10T14:30:00-07:00"), now());
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 6, 10, 21, 30, 0).unwrap());
        assert_eq!(src, TimestampSource::Parsed);
    }

    #[test]
    fn test_parse_ignores_mismatched_weekday() {
        // 10 Jun 2025 was a Tuesday.
        let (dt, src) = parse_published(Some("Mon, 10 Jun 2025 14:30:00 +0000"), now());
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 6, 10, 14, 30, 0).unwrap());
        assert_eq!(src, TimestampSource::Parsed);

        let (dt, src) = parse_published(Some("Mon, 10 Jun 2025 14:30:00 GMT"), now());
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 6, 10, 14, 30, 0).unwrap());
        assert_eq!(src, TimestampSource::Parsed);
    }

    #[test]
    fn test_parse_rejects_malformed_weekday() {
        assert_eq!(DateFormat::Rfc1123.parse("Xyz, 10 Jun 2025 14:30:00 GMT"), None);
        assert_eq!(
            DateFormat::Rfc1123Numeric.parse("10 Jun 2025 14:30:00 +0000"),
            None
        );
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let (dt, src) = parse_published(Some("2025-06-10T14:30:00.123Z"), now());
        assert_eq!(
            dt,
            Utc.with_ymd_and_hms(2025, 6, 10, 14, 30, 0).unwrap()
                + chrono::Duration::milliseconds(123)
        );
        assert_eq!(src, TimestampSource::Parsed);

        let (dt, src) = parse_published(Some("2025-06-10T14:30:00.5+02:00"), now());
        assert_eq!(
            dt,
            Utc.with_ymd_and_hms(2025, 6, 10, 12, 30, 0).unwrap()
                + chrono::Duration::milliseconds(500)
        );
        assert_eq!(src, TimestampSource::Parsed);
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let (dt, src) = parse_published(Some("\n  2025-06-10T14:30:00Z  \n"), now());
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 6, 10, 14, 30, 0).unwrap());
        assert_eq!(src, TimestampSource::Parsed);
    }

    #[test]
    fn test_parse_falls_back_to_now() {
        assert_eq!(
            parse_published(Some("yesterday afternoon"), now()),
            (now(), TimestampSource::Inferred)
        );
        assert_eq!(
            parse_published(None, now()),
            (now(), TimestampSource::Inferred)
        );
    }

    #[test]
    fn test_normalize_rss_items() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>AI Feed</title>
    <item>
      <title>  New Model Launch  </title>
      <link> https://example.com/launch </link>
      <description>  Details inside.  </description>
      <pubDate>Tue, 10 Jun 2025 14:30:00 +0000</pubDate>
    </item>
    <item>
      <title>Undated Post</title>
      <link>https://example.com/undated</link>
    </item>
  </channel>
</rss>"#;

        let entries = normalize_at(rss.as_bytes(), "AI Feed", now()).unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].title, "New Model Launch");
        assert_eq!(entries[0].link, "https://example.com/launch");
        assert_eq!(entries[0].description, "Details inside.");
        assert_eq!(entries[0].source, "AI Feed");
        assert_eq!(entries[0].id, "New-Model-Launch-https://example.com/launch");
        assert_eq!(
            entries[0].published_at,
            Utc.with_ymd_and_hms(2025, 6, 10, 14, 30, 0).unwrap()
        );
        assert!(!entries[0].has_inferred_timestamp());

        assert_eq!(entries[1].description, "");
        assert_eq!(entries[1].published_at, now());
        assert!(entries[1].has_inferred_timestamp());
    }

    #[test]
    fn test_normalize_same_title_different_links() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>X</title>
    <item><title>Model Release</title><link>/a</link></item>
    <item><title>Model Release</title><link>/b</link></item>
  </channel>
</rss>"#;

        let entries = normalize_at(rss.as_bytes(), "X", now()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "Model-Release-/a");
        assert_eq!(entries[1].id, "Model-Release-/b");
    }

    #[test]
    fn test_normalize_missing_fields_become_empty() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>X</title>
    <item><guid>only-a-guid</guid></item>
  </channel>
</rss>"#;

        let entries = normalize_at(rss.as_bytes(), "X", now()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "");
        assert_eq!(entries[0].link, "");
        assert_eq!(entries[0].id, "-");
    }

    #[test]
    fn test_normalize_empty_channel() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;

        let entries = normalize_at(rss.as_bytes(), "Empty", now()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_normalize_atom_feed() {
        let atom = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <id>urn:uuid:feed</id>
  <updated>2025-01-02T00:00:00Z</updated>
  <entry>
    <id>urn:uuid:1</id>
    <title>Atom Entry</title>
    <link href="https://example.com/entry"/>
    <summary>Entry summary</summary>
    <updated>2025-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

        let entries = normalize_at(atom.as_bytes(), "Atom", now()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Atom Entry");
        assert_eq!(entries[0].link, "https://example.com/entry");
        assert_eq!(entries[0].description, "Entry summary");
        assert_eq!(
            entries[0].published_at,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(entries[0].timestamp_source, TimestampSource::Parsed);
    }

    #[test]
    fn test_normalize_invalid_markup() {
        let result = normalize_at(b"This is not XML", "Broken", now());
        assert!(matches!(result, Err(NewsError::Parse(_))));
        assert!(result.unwrap_err().is_source_local());
    }
}
