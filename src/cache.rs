//! Content-addressed result cache.
//!
//! Bounded and recency-ordered: a hit promotes the entry to most recently
//! used, and an insert at capacity evicts the least recently used entry.
//! Keys are blake3 hashes of the raw input, so identical content shares one
//! entry regardless of where it came from. The mutex makes read-check-insert
//! on a single key atomic for concurrent parse operations.

use crate::agent::ParsedAgent;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

pub struct ContentCache {
    entries: Option<Mutex<LruCache<blake3::Hash, Arc<ParsedAgent>>>>,
}

impl ContentCache {
    /// A disabled cache (or one with zero capacity) never stores anything.
    pub fn new(enabled: bool, capacity: usize) -> Self {
        let entries = if enabled {
            NonZeroUsize::new(capacity).map(|capacity| Mutex::new(LruCache::new(capacity)))
        } else {
            None
        };
        Self { entries }
    }

    /// Look up a previously parsed result, promoting it to most recently used.
    pub fn get(&self, key: &blake3::Hash) -> Option<Arc<ParsedAgent>> {
        self.entries.as_ref()?.lock().get(key).cloned()
    }

    /// Insert a parse result, evicting the least recently used entry at
    /// capacity. The entry is replaced as a whole, never partially updated.
    pub fn insert(&self, key: blake3::Hash, agent: Arc<ParsedAgent>) {
        if let Some(entries) = &self.entries {
            entries.lock().put(key, agent);
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .as_ref()
            .map(|entries| entries.lock().len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hash raw document content for cache addressing.
pub fn content_hash(content: &str) -> blake3::Hash {
    blake3::hash(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ParsedAgent;
    use crate::diagnostics::DiagnosticsReport;
    use crate::document::AgentDocument;
    use crate::format::DocumentFormat;

    fn entry(label: &str) -> Arc<ParsedAgent> {
        Arc::new(ParsedAgent::new(
            AgentDocument::default(),
            DiagnosticsReport::new(),
            DocumentFormat::StructuredJson,
            label.to_string(),
        ))
    }

    #[test]
    fn at_capacity_the_least_recently_used_entry_is_evicted() {
        let cache = ContentCache::new(true, 2);
        let (a, b, c) = (content_hash("a"), content_hash("b"), content_hash("c"));

        cache.insert(a, entry("a"));
        cache.insert(b, entry("b"));
        cache.insert(c, entry("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&a).is_none());
        assert!(cache.get(&b).is_some());
        assert!(cache.get(&c).is_some());
    }

    #[test]
    fn a_hit_promotes_the_entry_out_of_eviction_order() {
        let cache = ContentCache::new(true, 2);
        let (a, b, c) = (content_hash("a"), content_hash("b"), content_hash("c"));

        cache.insert(a, entry("a"));
        cache.insert(b, entry("b"));
        assert!(cache.get(&a).is_some());
        cache.insert(c, entry("c"));

        assert!(cache.get(&a).is_some());
        assert!(cache.get(&b).is_none());
    }

    #[test]
    fn disabled_cache_stores_nothing() {
        let cache = ContentCache::new(false, 100);
        cache.insert(content_hash("a"), entry("a"));
        assert!(cache.is_empty());
        assert!(cache.get(&content_hash("a")).is_none());
    }

    #[test]
    fn identical_content_hashes_identically() {
        assert_eq!(content_hash("same"), content_hash("same"));
        assert_ne!(content_hash("same"), content_hash("different"));
    }
}
