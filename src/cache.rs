use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::GeoLocation;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Concurrent map whose entries expire a fixed time after insertion
pub struct TtlCache<K, V> {
    entries: DashMap<K, (V, Instant)>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Fetch a live entry; an expired one is evicted on the way out
    pub fn get(&self, key: &K) -> Option<V> {
        {
            let entry = self.entries.get(key)?;
            let (value, expires_at) = entry.value();
            if *expires_at > Instant::now() {
                return Some(value.clone());
            }
        }

        // A concurrent insert may have refreshed the slot since the read guard dropped
        self.entries
            .remove_if(key, |_, (_, expires_at)| *expires_at <= Instant::now());
        None
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(key, (value, Instant::now() + self.ttl));
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let now = Instant::now();
        self.entries.retain(|_, (_, expires_at)| *expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// Entry count, expired entries included until purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Successful geocoding lookups keyed by normalized location text
pub type GeoCache = Arc<TtlCache<String, GeoLocation>>;

pub fn create_geo_cache(ttl: Duration) -> GeoCache {
    Arc::new(TtlCache::new(ttl))
}

/// "  London, GB " and "london, gb" share one cache slot
pub fn normalize_location_key(location: &str) -> String {
    location.trim().to_lowercase()
}

/// Purge expired geocoding entries once an hour for the life of the process
pub fn spawn_geo_cache_janitor(cache: GeoCache) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = cache.purge_expired();
            if removed > 0 {
                tracing::debug!(
                    removed = removed,
                    remaining = cache.len(),
                    "Geocoding cache purge completed"
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> GeoLocation {
        GeoLocation {
            name: "London".to_string(),
            lat: 51.5073,
            lon: -0.1276,
            country: "GB".to_string(),
            state: Some("England".to_string()),
        }
    }

    #[test]
    fn test_hit_returns_inserted_value() {
        let cache = create_geo_cache(Duration::from_secs(60));
        cache.insert(normalize_location_key("London"), london());

        assert_eq!(cache.get(&"london".to_string()), Some(london()));
    }

    #[test]
    fn test_miss_on_unknown_key() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get(&"paris".to_string()), None);
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_millis(1));
        cache.insert("key".to_string(), 7);
        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(cache.get(&"key".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired_reports_removed_count() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_millis(1));
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_normalize_location_key() {
        assert_eq!(normalize_location_key("  London, GB "), "london, gb");
        assert_eq!(normalize_location_key("NEW YORK"), "new york");
    }
}
