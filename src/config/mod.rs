use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{HeraldError, HeraldResult};

const DEFAULT_THROTTLE_MS: u64 = 1200;

/// One watched feed: where to fetch it and which environment variable
/// holds its webhook URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub feed_url: String,
    pub webhook_secret: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feeds_path: PathBuf,
    pub state_path: PathBuf,
    pub throttle: Duration,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Load .env from the executable's directory, falling back to the
    /// current directory. Must run before CLI parsing so env-backed
    /// arguments see the values.
    pub fn load_env_files() {
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        dotenvy::dotenv().ok();
    }

    /// Default location for a data file: next to the executable when
    /// known, otherwise the working directory
    fn default_path(file_name: &str) -> PathBuf {
        Self::exe_dir()
            .map(|d| d.join(file_name))
            .unwrap_or_else(|| PathBuf::from(file_name))
    }

    pub fn resolve(feeds: Option<PathBuf>, state: Option<PathBuf>) -> HeraldResult<Self> {
        let feeds_path = feeds.unwrap_or_else(|| Self::default_path("feeds.json"));
        let state_path = state.unwrap_or_else(|| Self::default_path("state.json"));

        let throttle_ms = match std::env::var("HERALD_THROTTLE_MS") {
            Ok(value) => value.parse::<u64>().map_err(|_| {
                HeraldError::Config(format!("HERALD_THROTTLE_MS is not a number: {}", value))
            })?,
            Err(_) => DEFAULT_THROTTLE_MS,
        };

        Ok(Self {
            feeds_path,
            state_path,
            throttle: Duration::from_millis(throttle_ms),
        })
    }
}

/// Load and validate the feed list
pub fn load_feeds(path: &Path) -> HeraldResult<Vec<FeedConfig>> {
    if !path.exists() {
        return Err(HeraldError::Config(format!(
            "feeds file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let feeds: Vec<FeedConfig> = serde_json::from_str(&content)
        .map_err(|e| HeraldError::Config(format!("invalid feeds file: {}", e)))?;

    validate_feeds(&feeds)?;
    Ok(feeds)
}

fn validate_feeds(feeds: &[FeedConfig]) -> HeraldResult<()> {
    let mut names = HashSet::new();

    for feed in feeds {
        if feed.name.trim().is_empty() {
            return Err(HeraldError::Config(
                "feed with empty name".to_string(),
            ));
        }

        if !names.insert(feed.name.as_str()) {
            return Err(HeraldError::Config(format!(
                "duplicate feed name: {}",
                feed.name
            )));
        }

        Url::parse(&feed.feed_url)
            .map_err(|e| HeraldError::InvalidUrl(format!("{}: {}", feed.feed_url, e)))?;

        if feed.webhook_secret.trim().is_empty() {
            return Err(HeraldError::Config(format!(
                "feed {} has no webhook_secret",
                feed.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn feed(name: &str) -> FeedConfig {
        FeedConfig {
            name: name.to_string(),
            feed_url: "https://example.com/feed.xml".to_string(),
            webhook_secret: "DISCORD_WEBHOOK_TEST".to_string(),
        }
    }

    #[test]
    fn test_load_feeds_missing_file_is_config_error() {
        let result = load_feeds(Path::new("/nonexistent/feeds.json"));
        assert!(matches!(result, Err(HeraldError::Config(_))));
    }

    #[test]
    fn test_load_feeds_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();

        let result = load_feeds(file.path());
        assert!(matches!(result, Err(HeraldError::Config(_))));
    }

    #[test]
    fn test_load_feeds_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = r#"[
            {"name": "cs2", "feed_url": "https://example.com/a.xml", "webhook_secret": "DISCORD_WEBHOOK_CS2"},
            {"name": "dota", "feed_url": "https://example.com/b.xml", "webhook_secret": "DISCORD_WEBHOOK_DOTA"}
        ]"#;
        file.write_all(json.as_bytes()).unwrap();

        let feeds = load_feeds(file.path()).unwrap();
        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[0].name, "cs2");
        assert_eq!(feeds[1].webhook_secret, "DISCORD_WEBHOOK_DOTA");
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let mut bad = feed("");
        bad.name = "  ".to_string();
        let result = validate_feeds(&[bad]);
        assert!(matches!(result, Err(HeraldError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let result = validate_feeds(&[feed("cs2"), feed("cs2")]);
        assert!(matches!(result, Err(HeraldError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut bad = feed("cs2");
        bad.feed_url = "not a url".to_string();
        let result = validate_feeds(&[bad]);
        assert!(matches!(result, Err(HeraldError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        let mut bad = feed("cs2");
        bad.webhook_secret = String::new();
        let result = validate_feeds(&[bad]);
        assert!(matches!(result, Err(HeraldError::Config(_))));
    }

    #[test]
    fn test_validate_accepts_good_feeds() {
        assert!(validate_feeds(&[feed("cs2"), feed("dota")]).is_ok());
    }

    #[test]
    fn test_resolve_uses_explicit_paths() {
        let config = Config::resolve(
            Some(PathBuf::from("/tmp/feeds.json")),
            Some(PathBuf::from("/tmp/state.json")),
        )
        .unwrap();

        assert_eq!(config.feeds_path, PathBuf::from("/tmp/feeds.json"));
        assert_eq!(config.state_path, PathBuf::from("/tmp/state.json"));
        assert_eq!(config.throttle, Duration::from_millis(1200));
    }
}
