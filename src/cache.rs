//! In-memory cache for expensive listing responses.
//!
//! Entries never expire and are never evicted; staleness is an accepted
//! tradeoff and the caller clears the cache explicitly when it notices.
//! The cache is an explicit handle rather than module-level global state:
//! [`ResponseCache::shared`] hands out clones of one process-wide instance
//! for callers that want the traditional cross-client sharing, while
//! [`ResponseCache::new`] yields an isolated cache.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

static SHARED: Lazy<ResponseCache> = Lazy::new(ResponseCache::new);

/// Cheaply clonable cache handle; clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: Arc<Mutex<HashMap<String, serde_json::Value>>>,
}

/// Snapshot of cache state for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: usize,
}

impl ResponseCache {
    /// A fresh, empty cache not connected to the shared instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clone of the process-wide cache shared by every client that does
    /// not bring its own.
    pub fn shared() -> Self {
        SHARED.clone()
    }

    pub fn get_json<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let value = entries.get(key)?.clone();
        drop(entries);
        serde_json::from_value(value).ok()
    }

    pub fn put_json<T>(&self, key: impl Into<String>, value: &T) -> bool
    where
        T: Serialize,
    {
        let Ok(value) = serde_json::to_value(value) else {
            return false;
        };
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.into(), value);
        true
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_what_set_stored() {
        let cache = ResponseCache::new();
        cache.put_json("k", &vec![1u32, 2, 3]);
        assert_eq!(cache.get_json::<Vec<u32>>("k"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn missing_key_is_none() {
        let cache = ResponseCache::new();
        assert_eq!(cache.get_json::<Vec<u32>>("absent"), None);
    }

    #[test]
    fn clear_empties_the_store() {
        let cache = ResponseCache::new();
        cache.put_json("a", &1u32);
        cache.put_json("b", &2u32);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get_json::<u32>("a"), None);
    }

    #[test]
    fn clones_share_one_store() {
        let cache = ResponseCache::new();
        let alias = cache.clone();
        alias.put_json("k", &"v");
        assert_eq!(cache.get_json::<String>("k"), Some("v".to_string()));
    }

    #[test]
    fn shared_handles_point_at_the_same_store() {
        let a = ResponseCache::shared();
        let b = ResponseCache::shared();
        a.put_json("shared-smoke", &42u32);
        assert_eq!(b.get_json::<u32>("shared-smoke"), Some(42));
        a.clear();
    }
}
