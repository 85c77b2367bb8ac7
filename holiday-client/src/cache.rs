//! Response cache
//!
//! A key → JSON payload map with a per-entry time-to-live. An entry is valid
//! while `now - captured_at < ttl`; expired entries are treated as misses and
//! overwritten by the next fetch. Concurrent misses on the same key each run
//! their producer: there is no single-flight coalescing.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::debug;

use crate::error::Result;

/// Default time-to-live of cached entries
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: serde_json::Value,
    captured_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.captured_at) < self.ttl
    }
}

/// Thread-safe TTL cache of decoded responses
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fresh entry for `key` decoded as `T`, if any
    pub fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let payload = {
            let entries = self.entries.lock().unwrap();
            let entry = entries.get(key)?;
            if !entry.is_fresh(Instant::now()) {
                return None;
            }
            entry.payload.clone()
        };

        match serde_json::from_value(payload) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Cached value for {} has a different shape: {}", key, e);
                None
            }
        }
    }

    /// Stores `value` under `key`, replacing any previous entry
    pub fn store<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let payload = serde_json::to_value(value)?;
        self.entries.lock().unwrap().insert(
            key.to_string(),
            CacheEntry {
                payload,
                captured_at: Instant::now(),
                ttl,
            },
        );
        Ok(())
    }

    /// Returns the cached value or runs `producer` and caches its result
    ///
    /// A failing producer leaves the cache untouched.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, producer: F, ttl: Duration) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.lookup(key) {
            debug!("Cache hit for key: {}", key);
            return Ok(value);
        }

        debug!("Cache miss for key: {}", key);
        let value = producer().await?;
        self.store(key, &value, ttl)?;
        Ok(value)
    }

    /// Removes one entry
    pub fn invalidate(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    /// Removes every entry
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
