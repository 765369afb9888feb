//! Source registry: the feeds every crawl cycle polls, in order.

/// A feed to poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Display name, copied into every entry from this feed.
    pub name: String,
    /// Feed endpoint URL.
    pub url: String,
}

impl Source {
    /// Create a new source.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Compiled-in feed list as (display name, endpoint URL).
pub const DEFAULT_SOURCES: &[(&str, &str)] = &[
    (
        "TechCrunch AI",
        "https://techcrunch.com/tag/artificial-intelligence/feed/",
    ),
    ("VentureBeat AI", "https://venturebeat.com/category/ai/feed/"),
    ("AI News", "https://artificialintelligence-news.com/feed/"),
];

/// The compiled-in registry, in polling order.
pub fn default_sources() -> Vec<Source> {
    DEFAULT_SOURCES
        .iter()
        .map(|(name, url)| Source::new(*name, *url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_order() {
        let sources = default_sources();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["TechCrunch AI", "VentureBeat AI", "AI News"]);
    }

    #[test]
    fn test_default_sources_are_valid_urls() {
        for source in default_sources() {
            let url = url::Url::parse(&source.url).unwrap();
            assert_eq!(url.scheme(), "https", "{} should use https", source.name);
        }
    }
}
