//! Expansion result cache.
//!
//! Keyed by `(graph, degree)`. Entries expire a fixed interval after
//! insertion and are evicted least-recently-used once the configured
//! bound is exceeded. The bound is either a total serialized byte size
//! or an entry count, never both. A disabled cache accepts every call
//! and stores nothing, so callers never branch on configuration.
//!
//! Coherence is the caller's contract: every committed mutation on a
//! graph must call `invalidate_graph` for it, which drops the cached
//! results at every degree.

use std::collections::VecDeque;
use std::time::Instant;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use weft_core::{CacheBound, CacheConfig, GraphId, GraphResult, WeftError, WeftResult};

type CacheKey = (GraphId, i64);

struct Entry {
    result: GraphResult,
    bytes: u64,
    inserted: Instant,
}

#[derive(Default)]
struct Inner {
    map: FxHashMap<CacheKey, Entry>,
    /// Recency order, least recent at the front.
    order: VecDeque<CacheKey>,
    total_bytes: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Inner {
    fn remove(&mut self, key: &CacheKey) -> Option<Entry> {
        let entry = self.map.remove(key)?;
        self.total_bytes -= entry.bytes;
        self.order.retain(|k| k != key);
        Some(entry)
    }

    fn touch(&mut self, key: &CacheKey) {
        self.order.retain(|k| k != key);
        self.order.push_back(*key);
    }
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub bytes: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// TTL and LRU bounded cache of expansion results.
pub struct ExpansionCache {
    config: CacheConfig,
    inner: Mutex<Inner>,
}

impl ExpansionCache {
    /// Build a cache from a validated configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Whether lookups can ever hit.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Look up the cached expansion for a graph at a degree.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get(&self, graph: &GraphId, degree: i64) -> Option<GraphResult> {
        if !self.config.enabled {
            return None;
        }
        let key = (*graph, degree);
        let mut inner = self.inner.lock();
        let fresh = match inner.map.get(&key) {
            Some(entry) => entry.inserted.elapsed() < self.config.ttl,
            None => false,
        };
        if !fresh {
            inner.remove(&key);
            inner.misses += 1;
            return None;
        }
        inner.touch(&key);
        inner.hits += 1;
        inner.map.get(&key).map(|e| e.result.clone())
    }

    /// Store an expansion result, evicting least-recently-used entries
    /// until the configured bound holds again.
    pub fn put(&self, graph: &GraphId, degree: i64, result: &GraphResult) -> WeftResult<()> {
        if !self.config.enabled {
            return Ok(());
        }
        let bytes = match self.config.bound {
            CacheBound::Bytes(limit) => {
                let cost = serialized_size(result)?;
                // An oversized result would evict the whole cache and
                // still not fit; skip it.
                if cost > limit {
                    return Ok(());
                }
                cost
            }
            CacheBound::Entries(_) => 0,
        };

        let key = (*graph, degree);
        let mut inner = self.inner.lock();
        inner.remove(&key);
        inner.map.insert(
            key,
            Entry {
                result: result.clone(),
                bytes,
                inserted: Instant::now(),
            },
        );
        inner.total_bytes += bytes;
        inner.order.push_back(key);

        while self.over_bound(&inner) {
            let Some(oldest) = inner.order.front().copied() else {
                break;
            };
            inner.remove(&oldest);
            inner.evictions += 1;
        }
        Ok(())
    }

    fn over_bound(&self, inner: &Inner) -> bool {
        match self.config.bound {
            CacheBound::Bytes(limit) => inner.total_bytes > limit,
            CacheBound::Entries(limit) => inner.map.len() > limit,
        }
    }

    /// Drop every cached result for a graph, at all degrees.
    pub fn invalidate_graph(&self, graph: &GraphId) {
        let mut inner = self.inner.lock();
        let stale: Vec<CacheKey> = inner
            .map
            .keys()
            .filter(|(g, _)| g == graph)
            .copied()
            .collect();
        for key in stale {
            inner.remove(&key);
        }
    }

    /// Drop everything.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.map.clear();
        inner.order.clear();
        inner.total_bytes = 0;
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            entries: inner.map.len(),
            bytes: inner.total_bytes,
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
        }
    }
}

/// Serialized size of a result, the unit of the byte bound.
fn serialized_size(result: &GraphResult) -> WeftResult<u64> {
    let encoded =
        serde_json::to_string(result).map_err(|e| WeftError::serialization(e.to_string()))?;
    Ok(encoded.len() as u64)
}
