use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Thread-safe TTL map for expensive lookups keyed by string.
///
/// Uses the Arc<Mutex<>> pattern for safe concurrent access across tasks.
/// Entries never get evicted; an expired entry simply stops being returned
/// and is overwritten by the next `put`. The key space is expected to stay
/// small (a fixed set of cities plus ad-hoc coordinates).
///
/// The TTL boundary is inclusive: an entry is still served when its age
/// equals the TTL exactly, and expires only once the age strictly exceeds
/// it.
///
/// Concurrent fetches for the same cold key are allowed; racing `put`s
/// resolve as last-write-wins.
#[derive(Clone)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, Entry<V>>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the cached value unless its age strictly exceeds the TTL.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn put(&self, key: String, value: V) {
        self.put_at(key, value, Instant::now());
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let entries = self.entries.lock().unwrap();
        let entry = entries.get(key)?;
        if now.duration_since(entry.inserted_at) > self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    fn put_at(&self, key: String, value: V, now: Instant) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_get_after_put() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.put("12.97,77.59".to_string(), "sunny".to_string());
        assert_eq!(cache.get("12.97,77.59"), Some("sunny".to_string()));
    }

    #[test]
    fn test_get_missing_key() {
        let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = TtlCache::new(Duration::from_millis(1000));
        let start = Instant::now();
        cache.put_at("k".to_string(), 42, start);

        // Exactly at the TTL the entry is still valid.
        assert_eq!(cache.get_at("k", start + Duration::from_millis(1000)), Some(42));
        // One millisecond past, it is gone.
        assert_eq!(cache.get_at("k", start + Duration::from_millis(1001)), None);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.put("k".to_string(), 1);
        cache.put("k".to_string(), 2);
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_rewrite_resets_age() {
        let cache = TtlCache::new(Duration::from_millis(1000));
        let start = Instant::now();
        cache.put_at("k".to_string(), 1, start);
        cache.put_at("k".to_string(), 2, start + Duration::from_millis(900));

        // The second put restarts the clock for the key.
        assert_eq!(cache.get_at("k", start + Duration::from_millis(1500)), Some(2));
        assert_eq!(cache.get_at("k", start + Duration::from_millis(2000)), None);
    }

    #[test]
    fn test_concurrent_access() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let mut handles = vec![];

        for i in 0..10 {
            let cache_clone = cache.clone();
            let handle = thread::spawn(move || {
                let key = format!("city_{i}");
                cache_clone.put(key.clone(), i);
                assert_eq!(cache_clone.get(&key), Some(i));
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
