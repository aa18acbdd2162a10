//! Discord webhook bindings for Rust
//! Provides a blocking client that posts embed messages to a webhook URL

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of an embed title, per the Discord embed schema
pub const EMBED_TITLE_LIMIT: usize = 256;

/// Maximum length of an embed description, per the Discord embed schema
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Webhook rate limited")]
    RateLimited,
    #[error("Payload too large")]
    PayloadTooLarge,
    #[error("Webhook returned status {code}: {body}")]
    Status { code: u16, body: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO8601 timestamp rendered in the embed footer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

impl WebhookMessage {
    /// Build a message carrying a single embed
    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }
}

pub struct WebhookClient {
    client: Client,
}

impl WebhookClient {
    pub fn new() -> Result<Self, WebhookError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Post a message to a webhook URL
    pub fn execute(&self, webhook_url: &str, message: &WebhookMessage) -> Result<(), WebhookError> {
        let response = self.client.post(webhook_url).json(message).send()?;

        let status = response.status();

        // Check for 429 Too Many Requests and 413 Payload Too Large specifically
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WebhookError::RateLimited);
        }
        if status == reqwest::StatusCode::PAYLOAD_TOO_LARGE {
            return Err(WebhookError::PayloadTooLarge);
        }

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(WebhookError::Status {
                code: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Post a message to a webhook URL with a one-off client
pub fn execute(webhook_url: &str, message: &WebhookMessage) -> Result<(), WebhookError> {
    WebhookClient::new()?.execute(webhook_url, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_message_shape() {
        let message = WebhookMessage::embed(
            Embed::new()
                .with_title("Release 1.2.3")
                .with_url("https://example.com/release")
                .with_description("Patch notes"),
        );

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["embeds"][0]["title"], "Release 1.2.3");
        assert_eq!(value["embeds"][0]["url"], "https://example.com/release");
        assert_eq!(value["embeds"][0]["description"], "Patch notes");
    }

    #[test]
    fn test_unset_fields_omitted() {
        let message = WebhookMessage::embed(Embed::new().with_title("Only a title"));

        let value = serde_json::to_value(&message).unwrap();
        let embed = value["embeds"][0].as_object().unwrap();
        assert!(!embed.contains_key("url"));
        assert!(!embed.contains_key("description"));
        assert!(!embed.contains_key("timestamp"));
        assert!(!embed.contains_key("color"));
        assert!(value.as_object().unwrap().get("content").is_none());
    }

    #[test]
    fn test_text_message_has_no_embeds() {
        let message = WebhookMessage::text("plain announcement");

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["content"], "plain announcement");
        assert!(value["embeds"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_embed_with_timestamp_and_color() {
        let embed = Embed::new()
            .with_title("t")
            .with_timestamp("2024-01-15T12:00:00+00:00")
            .with_color(0x00B0F4);

        let value = serde_json::to_value(&embed).unwrap();
        assert_eq!(value["timestamp"], "2024-01-15T12:00:00+00:00");
        assert_eq!(value["color"], 0x00B0F4);
    }
}
