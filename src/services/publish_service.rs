use std::time::{Duration, Instant};

use webhook::WebhookClient;

use crate::domain::Notification;
use crate::errors::HeraldResult;
use crate::services::traits::Notifier;

/// Posts notifications to Discord, keeping a minimum delay between
/// consecutive sends so a burst of new items does not trip the
/// webhook rate limit.
pub struct DiscordNotifier {
    client: WebhookClient,
    min_delay: Duration,
    last_send: Option<Instant>,
}

impl DiscordNotifier {
    pub fn new(min_delay: Duration) -> HeraldResult<Self> {
        let client = WebhookClient::new()?;

        Ok(Self {
            client,
            min_delay,
            last_send: None,
        })
    }

    fn throttle(&self) {
        if let Some(last) = self.last_send {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                std::thread::sleep(self.min_delay - elapsed);
            }
        }
    }
}

impl Notifier for DiscordNotifier {
    fn send(&mut self, webhook_url: &str, notification: &Notification) -> HeraldResult<()> {
        self.throttle();

        let result = self.client.execute(webhook_url, &notification.to_message());
        self.last_send = Some(Instant::now());

        result?;
        Ok(())
    }
}
