use lru::LruCache;
use std::num::NonZeroUsize;

/// One entry of the external item registry, resolved for a wire id.
///
/// `identifier` is the namespaced source-protocol name (`"game:carrot"`);
/// variant behavior predicates only ever see the stripped form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMapping {
    identifier: String,
}

impl ItemMapping {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The identifier with its protocol namespace removed.
    pub fn stripped_identifier(&self) -> &str {
        match self.identifier.split_once(':') {
            Some((_, rest)) => rest,
            None => &self.identifier,
        }
    }

    pub fn is_empty_hand(&self) -> bool {
        self.stripped_identifier() == "air"
    }
}

/// Narrow interface over the external asset/mapping tables.
pub trait MappingSource {
    fn resolve(&self, wire_id: u32) -> Option<ItemMapping>;
}

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64) / (total as f64)
        }
    }
}

/// Session-owned LRU front for item mapping lookups.
///
/// Mapping tables are large and shared; sessions touch a small hot set of
/// wire ids (held items, interaction targets), so each session keeps its own
/// bounded cache. Unknown wire ids are not cached.
pub struct MappingCache {
    cache: LruCache<u32, ItemMapping>,
    source: Box<dyn MappingSource + Send>,
    stats: CacheStats,
}

impl MappingCache {
    pub fn new(capacity: usize, source: Box<dyn MappingSource + Send>) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            source,
            stats: CacheStats::default(),
        }
    }

    pub fn resolve(&mut self, wire_id: u32) -> Option<ItemMapping> {
        if let Some(mapping) = self.cache.get(&wire_id) {
            self.stats.hits += 1;
            return Some(mapping.clone());
        }

        self.stats.misses += 1;
        let mapping = self.source.resolve(wire_id)?;
        if self.cache.len() == self.cache.cap().get() {
            self.stats.evictions += 1;
        }
        self.cache.put(wire_id, mapping.clone());
        Some(mapping)
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
