use std::collections::HashSet;

use crate::domain::FeedItem;
use crate::state::SeenState;

/// Keep only items whose id has not been posted for this feed, source
/// order preserved. Ids repeated within the same fetch are kept once.
/// Pure: reads state, never mutates it.
pub fn filter_unseen(items: Vec<FeedItem>, state: &SeenState, feed_name: &str) -> Vec<FeedItem> {
    let mut yielded: HashSet<String> = HashSet::new();

    items
        .into_iter()
        .filter(|item| {
            if state.is_seen(feed_name, &item.id) {
                return false;
            }
            yielded.insert(item.id.clone())
        })
        .collect()
}

/// Order items oldest-first so a channel reads chronologically; items
/// without a timestamp sort first. Stable, so document order breaks ties.
pub fn oldest_first(items: &mut [FeedItem]) {
    items.sort_by_key(|item| item.published);
}
