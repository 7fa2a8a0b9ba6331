//! Serialization cache for style objects.

use std::collections::HashMap;

use crate::value::{StyleObject, StyleObjectId, WeakStyleObject};

struct CacheEntry {
    object: WeakStyleObject,
    text: String,
}

/// Serialized text of style objects, keyed by object identity.
///
/// Entries for objects that have since been dropped are pruned when the
/// cache fills up; if that is not enough, half of the entries are evicted.
pub(crate) struct ObjectCache {
    entries: HashMap<StyleObjectId, CacheEntry>,
    max_size: usize,
}

impl ObjectCache {
    /// Create a cache holding at most `max_size` entries.
    pub(crate) fn with_capacity(max_size: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(max_size.min(1024)),
            max_size,
        }
    }

    /// Cached text for `object`.
    pub(crate) fn get(&self, object: &StyleObject) -> Option<&str> {
        self.entries.get(&object.id()).map(|e| e.text.as_str())
    }

    /// Cache the serialized text of `object`.
    pub(crate) fn insert(&mut self, object: &StyleObject, text: String) {
        if self.max_size == 0 {
            return;
        }
        if self.entries.len() >= self.max_size {
            self.prune();
        }
        self.entries.insert(
            object.id(),
            CacheEntry {
                object: object.downgrade(),
                text,
            },
        );
    }

    /// Drop every entry.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn prune(&mut self) {
        self.entries.retain(|_, e| e.object.is_alive());
        if self.entries.len() >= self.max_size {
            let target = self.entries.len() / 2;
            let keys: Vec<_> = self.entries.keys().take(target).copied().collect();
            for key in keys {
                self.entries.remove(&key);
            }
        }
        tracing::trace!(
            target: crate::logging::targets::RESOLVE,
            remaining = self.entries.len(),
            "pruned object cache"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object() -> StyleObject {
        StyleObject::from_iter([("color", "red")])
    }

    #[test]
    fn cache_basic_operations() {
        let mut cache = ObjectCache::with_capacity(8);
        let obj = object();
        assert!(cache.get(&obj).is_none());

        cache.insert(&obj, "color:red;".to_string());
        assert_eq!(cache.get(&obj), Some("color:red;"));
        assert_eq!(cache.get(&obj.clone()), Some("color:red;"));
        assert!(cache.get(&object()).is_none());
    }

    #[test]
    fn cache_prunes_dropped_objects_first() {
        let mut cache = ObjectCache::with_capacity(2);
        let kept = object();
        cache.insert(&kept, "a".to_string());
        {
            let dropped = object();
            cache.insert(&dropped, "b".to_string());
        }

        let next = object();
        cache.insert(&next, "c".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&kept), Some("a"));
        assert_eq!(cache.get(&next), Some("c"));
    }

    #[test]
    fn cache_evicts_half_when_full_of_live_objects() {
        let mut cache = ObjectCache::with_capacity(4);
        let objects: Vec<_> = (0..4).map(|_| object()).collect();
        for obj in &objects {
            cache.insert(obj, String::new());
        }
        assert_eq!(cache.len(), 4);

        let extra = object();
        cache.insert(&extra, String::new());
        assert_eq!(cache.len(), 3);
        assert!(cache.get(&extra).is_some());
    }

    #[test]
    fn cache_disabled_with_zero_capacity() {
        let mut cache = ObjectCache::with_capacity(0);
        cache.insert(&object(), String::new());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn cache_clear() {
        let mut cache = ObjectCache::with_capacity(4);
        let obj = object();
        cache.insert(&obj, String::new());
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
