use tracing::{debug, error, info, warn};

use crate::config::FeedConfig;
use crate::domain::Notification;
use crate::secrets::SecretStore;
use crate::services::dedup;
use crate::services::traits::Notifier;
use crate::sources::FeedSource;
use crate::state::SeenState;

/// Outcome counters for one run, reported back to the CLI
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub feeds_fetched: usize,
    pub feeds_skipped: usize,
    pub items_new: usize,
    pub items_posted: usize,
    pub items_failed: usize,
}

/// One tick of the fetch/dedupe/post pipeline. Feed-level failures are
/// logged and skipped; item-level publish failures leave the item
/// unseen so the next run retries it. Only a successful post marks an
/// id as seen.
pub struct Pipeline<S: FeedSource, N: Notifier, K: SecretStore> {
    source: S,
    notifier: N,
    secrets: K,
}

impl<S: FeedSource, N: Notifier, K: SecretStore> Pipeline<S, N, K> {
    pub fn new(source: S, notifier: N, secrets: K) -> Self {
        Self {
            source,
            notifier,
            secrets,
        }
    }

    pub fn run(&mut self, feeds: &[FeedConfig], state: &mut SeenState, dry_run: bool) -> RunReport {
        let mut report = RunReport::default();

        for feed in feeds {
            // Resolve the webhook before fetching; a feed without its
            // secret can't be posted anyway
            let webhook_url = if dry_run {
                None
            } else {
                match self.secrets.resolve(&feed.webhook_secret) {
                    Some(url) => Some(url),
                    None => {
                        warn!(feed = %feed.name, secret = %feed.webhook_secret, "webhook secret not set, skipping feed");
                        report.feeds_skipped += 1;
                        continue;
                    }
                }
            };

            info!(feed = %feed.name, url = %feed.feed_url, "fetching feed");

            let items = match self.source.fetch_items(feed) {
                Ok(items) => items,
                Err(e) => {
                    warn!(feed = %feed.name, error = %e, "fetch failed, skipping feed");
                    report.feeds_skipped += 1;
                    continue;
                }
            };
            report.feeds_fetched += 1;

            let mut new_items = dedup::filter_unseen(items, state, &feed.name);
            if new_items.is_empty() {
                debug!(feed = %feed.name, "no new items");
                continue;
            }
            report.items_new += new_items.len();

            // Oldest first, so the channel reads chronologically
            dedup::oldest_first(&mut new_items);

            for item in &new_items {
                let notification = Notification::from_item(feed, item);

                if dry_run {
                    println!("  [dry run] {}", notification.format());
                    continue;
                }

                let webhook_url = webhook_url.as_deref().unwrap_or_default();
                match self.notifier.send(webhook_url, &notification) {
                    Ok(()) => {
                        info!(feed = %feed.name, title = %item.title, "posted");
                        state.mark_seen(&feed.name, &item.id);
                        report.items_posted += 1;
                    }
                    Err(e) => {
                        // Not marked seen, so the next run retries it
                        error!(feed = %feed.name, title = %item.title, error = %e, "post failed");
                        report.items_failed += 1;
                    }
                }
            }
        }

        report
    }
}
