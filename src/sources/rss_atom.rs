use feed_rs::parser;
use reqwest::blocking::Client;

use crate::config::FeedConfig;
use crate::domain::FeedItem;
use crate::errors::{HeraldError, HeraldResult};
use crate::sources::traits::FeedSource;
use crate::text;

pub struct RssAtomSource {
    client: Client,
}

impl RssAtomSource {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn parse_bytes(bytes: &[u8]) -> HeraldResult<feed_rs::model::Feed> {
        parser::parse(bytes).map_err(|e| HeraldError::FeedParse(e.to_string()))
    }

    /// Parse items from raw feed bytes, document order preserved
    pub fn items_from_bytes(bytes: &[u8]) -> HeraldResult<Vec<FeedItem>> {
        let parsed = Self::parse_bytes(bytes)?;

        let items: Vec<FeedItem> = parsed
            .entries
            .into_iter()
            .map(|entry| {
                let title = entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "Untitled".to_string());

                let link = entry
                    .links
                    .into_iter()
                    .next()
                    .map(|l| l.href)
                    .unwrap_or_default();

                let id = entry_id(&entry.id, &link, &title);

                let summary = entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| entry.content.and_then(|c| c.body))
                    .map(|html| text::html_to_text(&html))
                    .unwrap_or_default();

                let published = entry.published.or(entry.updated);

                FeedItem::new(id, title)
                    .with_link(link)
                    .with_summary(summary)
                    .with_published(published)
            })
            .collect();

        Ok(items)
    }
}

/// Prefer the entry's own guid/id; fall back to link+title so items from
/// guid-less feeds still get a stable identifier
fn entry_id(id: &str, link: &str, title: &str) -> String {
    if id.is_empty() {
        format!("{}::{}", link, title)
    } else {
        id.to_string()
    }
}

impl Default for RssAtomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for RssAtomSource {
    fn fetch_items(&self, feed: &FeedConfig) -> HeraldResult<Vec<FeedItem>> {
        let response = self.client.get(&feed.feed_url).send()?;
        let bytes = response.bytes()?;

        Self::items_from_bytes(&bytes)
    }
}
