use crate::config::FeedConfig;
use crate::domain::FeedItem;
use crate::errors::HeraldResult;

#[cfg_attr(test, mockall::automock)]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse a feed into items, document order preserved
    fn fetch_items(&self, feed: &FeedConfig) -> HeraldResult<Vec<FeedItem>>;
}
