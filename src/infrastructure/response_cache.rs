// Passive on-disk cache for API response bodies, backed by sled
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CacheSettings {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_expire_after")]
    pub expire_after_secs: u64,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".cache")
}

fn default_expire_after() -> u64 {
    3600
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            expire_after_secs: default_expire_after(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    url: String,
    stored_at: i64,
    body: String,
}

/// Entries are keyed by the SHA-256 of the request URL. Read and write
/// failures degrade to a cache miss.
#[derive(Clone)]
pub struct ResponseCache {
    db: sled::Db,
    expire_after: Duration,
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.db.len())
            .field("expire_after", &self.expire_after)
            .finish()
    }
}

fn cache_key(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

impl ResponseCache {
    /// Open (or create) the cache database under `dir`
    pub fn open(dir: impl AsRef<Path>, expire_after: Duration) -> Result<Self, sled::Error> {
        Ok(Self {
            db: sled::open(dir)?,
            expire_after,
        })
    }

    pub fn from_settings(settings: &CacheSettings) -> Result<Self, sled::Error> {
        Self::open(
            &settings.dir,
            Duration::from_secs(settings.expire_after_secs),
        )
    }

    pub async fn get(&self, url: &str) -> Option<String> {
        self.get_at(url, chrono::Utc::now().timestamp()).await
    }

    /// Cached body for `url` if it is younger than the expiry at time `now`
    pub async fn get_at(&self, url: &str, now: i64) -> Option<String> {
        let key = cache_key(url);

        // sled calls block; keep them off the runtime thread
        let db = self.db.clone();
        let lookup = key.clone();
        let raw = match tokio::task::spawn_blocking(move || db.get(lookup)).await {
            Ok(Ok(Some(raw))) => raw,
            Ok(Ok(None)) => return None,
            Ok(Err(e)) => {
                tracing::warn!("Failed to read cache entry for {}: {}", url, e);
                return None;
            }
            Err(e) => {
                tracing::warn!("Cache lookup task failed: {}", e);
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache entry {}: {}", key, e);
                return None;
            }
        };

        if entry.url != url {
            return None;
        }

        let age = now.saturating_sub(entry.stored_at);
        let expire_after = i64::try_from(self.expire_after.as_secs()).unwrap_or(i64::MAX);
        if age < 0 || age >= expire_after {
            tracing::debug!("Cache entry for {} expired ({}s old)", url, age);
            if let Err(e) = self.db.remove(&key) {
                tracing::warn!("Failed to drop expired cache entry {}: {}", key, e);
            }
            return None;
        }

        Some(entry.body)
    }

    pub async fn put(&self, url: &str, body: &str) {
        self.put_at(url, body, chrono::Utc::now().timestamp()).await;
    }

    pub async fn put_at(&self, url: &str, body: &str, now: i64) {
        let entry = CacheEntry {
            url: url.to_string(),
            stored_at: now,
            body: body.to_string(),
        };
        let raw = match serde_json::to_vec(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to encode cache entry for {}: {}", url, e);
                return;
            }
        };

        let db = self.db.clone();
        let key = cache_key(url);
        match tokio::task::spawn_blocking(move || db.insert(key, raw)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::warn!("Failed to write cache entry for {}: {}", url, e);
                return;
            }
            Err(e) => {
                tracing::warn!("Cache write task failed: {}", e);
                return;
            }
        }

        if let Err(e) = self.db.flush_async().await {
            tracing::warn!("Failed to flush response cache: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality?latitude=50";

    fn open(dir: &Path, expire_after_secs: u64) -> ResponseCache {
        ResponseCache::open(dir, Duration::from_secs(expire_after_secs)).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open(dir.path(), 3600);

        cache.put_at(URL, "{\"ok\":true}", 1_000).await;

        assert_eq!(cache.get_at(URL, 1_000).await.as_deref(), Some("{\"ok\":true}"));
        assert_eq!(cache.get_at(URL, 4_599).await.as_deref(), Some("{\"ok\":true}"));
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss_and_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open(dir.path(), 3600);

        cache.put_at(URL, "body", 1_000).await;

        assert_eq!(cache.get_at(URL, 4_600).await, None);
        assert!(!cache.db.contains_key(cache_key(URL)).unwrap());
    }

    #[tokio::test]
    async fn test_entries_are_keyed_by_url() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open(dir.path(), 3600);

        cache.put_at(URL, "first", 0).await;
        cache.put_at("https://example.com/other", "second", 0).await;

        assert_eq!(cache.get_at(URL, 1).await.as_deref(), Some("first"));
        assert_eq!(
            cache.get_at("https://example.com/other", 1).await.as_deref(),
            Some("second")
        );
        assert_eq!(cache.get_at("https://example.com/missing", 1).await, None);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = open(dir.path(), 3600);

        cache.db.insert(cache_key(URL), &b"not json"[..]).unwrap();

        assert_eq!(cache.get_at(URL, 0).await, None);
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested");

        {
            let cache = open(&path, 60);
            cache.put_at(URL, "body", 0).await;
        }

        let reopened = open(&path, 60);
        assert_eq!(reopened.get_at(URL, 30).await.as_deref(), Some("body"));
    }

    #[test]
    fn test_open_fails_when_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cache");
        std::fs::write(&file, b"occupied").unwrap();

        assert!(ResponseCache::open(&file, Duration::from_secs(60)).is_err());
    }
}
