use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{HeraldError, HeraldResult};

/// Ids remembered per feed; older entries are dropped past this cap
pub const MAX_SEEN_PER_FEED: usize = 100;

/// Persisted record of already-posted item ids, keyed by feed name.
/// On disk this is plain `{"feed": ["id", ...]}` JSON.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenState {
    entries: BTreeMap<String, Vec<String>>,

    #[serde(skip)]
    dirty: bool,
}

impl SeenState {
    /// Load state from disk. A missing or unreadable file yields empty
    /// state; a corrupt file is logged and also yields empty state so a
    /// bad write can never wedge the pipeline.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read state file, starting empty");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt state file, starting empty");
                Self::default()
            }
        }
    }

    pub fn is_seen(&self, feed_name: &str, id: &str) -> bool {
        self.entries
            .get(feed_name)
            .map(|ids| ids.iter().any(|seen| seen == id))
            .unwrap_or(false)
    }

    pub fn seen_ids(&self, feed_name: &str) -> &[String] {
        self.entries
            .get(feed_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Record an id as posted. Keeps the most recent MAX_SEEN_PER_FEED
    /// ids per feed.
    pub fn mark_seen(&mut self, feed_name: &str, id: &str) {
        if self.is_seen(feed_name, id) {
            return;
        }

        let ids = self.entries.entry(feed_name.to_string()).or_default();
        ids.push(id.to_string());

        if ids.len() > MAX_SEEN_PER_FEED {
            let excess = ids.len() - MAX_SEEN_PER_FEED;
            ids.drain(0..excess);
        }

        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist the state if anything changed since load. The file is
    /// replaced wholesale via a temp file in the same directory, so a
    /// failed write leaves the previous state intact.
    ///
    /// Returns whether a write happened.
    pub fn save_if_changed(&self, path: &Path) -> HeraldResult<bool> {
        if !self.dirty {
            return Ok(false);
        }

        let json = serde_json::to_vec_pretty(&self)
            .map_err(|e| HeraldError::State(format!("could not serialize state: {}", e)))?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.persist(path)
            .map_err(|e| HeraldError::State(format!("could not replace {}: {}", path.display(), e)))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_empty() {
        let state = SeenState::load(Path::new("/nonexistent/state.json"));
        assert!(!state.is_dirty());
        assert!(state.seen_ids("cs2").is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{broken").unwrap();

        let state = SeenState::load(&path);
        assert!(state.seen_ids("cs2").is_empty());
    }

    #[test]
    fn test_mark_and_check_seen() {
        let mut state = SeenState::default();

        assert!(!state.is_seen("cs2", "guid-1"));
        state.mark_seen("cs2", "guid-1");
        assert!(state.is_seen("cs2", "guid-1"));
        assert!(!state.is_seen("dota", "guid-1"));
    }

    #[test]
    fn test_mark_seen_twice_is_noop() {
        let mut state = SeenState::default();
        state.mark_seen("cs2", "guid-1");
        state.mark_seen("cs2", "guid-1");

        assert_eq!(state.seen_ids("cs2"), ["guid-1"]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut state = SeenState::default();
        for i in 0..(MAX_SEEN_PER_FEED + 25) {
            state.mark_seen("cs2", &format!("guid-{}", i));
        }

        let ids = state.seen_ids("cs2");
        assert_eq!(ids.len(), MAX_SEEN_PER_FEED);
        // Oldest ids were dropped, newest kept
        assert_eq!(ids[0], "guid-25");
        assert_eq!(ids[ids.len() - 1], format!("guid-{}", MAX_SEEN_PER_FEED + 24));
    }

    #[test]
    fn test_save_skipped_when_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let state = SeenState::default();
        let written = state.save_if_changed(&path).unwrap();

        assert!(!written);
        assert!(!path.exists());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = SeenState::default();
        state.mark_seen("cs2", "guid-1");
        state.mark_seen("cs2", "guid-2");
        state.mark_seen("dota", "guid-9");

        assert!(state.save_if_changed(&path).unwrap());

        let reloaded = SeenState::load(&path);
        assert_eq!(reloaded.seen_ids("cs2"), ["guid-1", "guid-2"]);
        assert_eq!(reloaded.seen_ids("dota"), ["guid-9"]);
        assert!(!reloaded.is_dirty());
    }

    #[test]
    fn test_saved_file_is_plain_json_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = SeenState::default();
        state.mark_seen("cs2", "guid-1");
        state.save_if_changed(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["cs2"][0], "guid-1");
    }

    #[test]
    fn test_save_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"cs2": ["old"]}"#).unwrap();

        let mut state = SeenState::load(&path);
        state.mark_seen("cs2", "new");
        state.save_if_changed(&path).unwrap();

        let reloaded = SeenState::load(&path);
        assert_eq!(reloaded.seen_ids("cs2"), ["old", "new"]);
    }
}
