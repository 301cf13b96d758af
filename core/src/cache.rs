use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// A small TTL cache, explicitly constructed and passed to whoever needs it
/// rather than living in a process-wide singleton. Entries expire on read;
/// an expired hit is evicted and reported as a miss.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, (V, Instant)>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(key, (value, now));
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&mut self, key: &K, now: Instant) -> Option<V> {
        match self.entries.get(key) {
            Some((_, stored)) if now.duration_since(*stored) > self.ttl => {
                self.entries.remove(key);
                None
            }
            Some((value, _)) => Some(value.clone()),
            None => None,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert_at("a", 1, t0);
        assert_eq!(cache.get_at(&"a", t0 + Duration::from_secs(59)), Some(1));
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert_at("a", 1, t0);
        assert_eq!(cache.get_at(&"a", t0 + Duration::from_secs(61)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_miss() {
        let mut cache: TtlCache<&str, i32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get(&"nope"), None);
    }

    #[test]
    fn test_insert_refreshes_timestamp() {
        let t0 = Instant::now();
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert_at("a", 1, t0);
        cache.insert_at("a", 2, t0 + Duration::from_secs(50));
        assert_eq!(cache.get_at(&"a", t0 + Duration::from_secs(100)), Some(2));
    }

    #[test]
    fn test_clear() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
