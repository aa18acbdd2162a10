use chrono::{DateTime, Utc};
use webhook::{Embed, WebhookMessage, EMBED_DESCRIPTION_LIMIT, EMBED_TITLE_LIMIT};

use super::FeedItem;
use crate::config::FeedConfig;
use crate::text;

#[derive(Debug, Clone)]
pub struct Notification {
    pub feed_name: String,
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn from_item(feed: &FeedConfig, item: &FeedItem) -> Self {
        Self {
            feed_name: feed.name.clone(),
            title: item.title.clone(),
            link: item.link.clone(),
            summary: item.summary.clone(),
            published: item.published,
        }
    }

    /// Build the Discord message, truncating fields to the embed limits
    pub fn to_message(&self) -> WebhookMessage {
        let mut embed = Embed::new().with_title(text::truncate(&self.title, EMBED_TITLE_LIMIT));

        if !self.link.is_empty() {
            embed = embed.with_url(self.link.clone());
        }

        if !self.summary.is_empty() {
            embed = embed.with_description(text::truncate(&self.summary, EMBED_DESCRIPTION_LIMIT));
        }

        if let Some(published) = self.published {
            embed = embed.with_timestamp(published.to_rfc3339());
        }

        WebhookMessage::embed(embed)
    }

    /// One-line rendering for dry runs and logs: "{feed}: {title} {link}"
    pub fn format(&self) -> String {
        let mut line = format!("{}: {}", self.feed_name, self.title);

        if !self.link.is_empty() {
            line.push(' ');
            line.push_str(&self.link);
        }

        line
    }
}
