//! Resolution cache in front of a [`Resolver`].
//!
//! The cache is an optimization, never a source of truth:
//!
//! - **Hits** return the cached [`HandlerType`] without calling the resolver
//! - **Misses** call the resolver and store the result on success
//! - **Failures** are never stored, so a later lookup resolves again
//! - **Eviction** may drop any entry at any time; the next lookup re-resolves
//!
//! Concurrent misses on the same name may both reach the resolver. That is
//! acceptable because resolution is deterministic; the last writer wins.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::trace;

use crate::resolver::{HandlerType, ResolveError, Resolver};

/// Cache metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that reached the resolver
    pub misses: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Entries currently cached
    pub entries: usize,
}

/// Concurrent name to handler-type cache.
///
/// Backed by a sharded [`DashMap`], so lookups on different names never
/// contend on a single lock. With a non-zero capacity, inserting into a full
/// cache first evicts an arbitrary entry.
#[derive(Debug)]
pub struct HandlerCache {
    entries: DashMap<String, HandlerType>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl HandlerCache {
    /// Create a cache holding at most `capacity` entries (0 = unbounded)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Create a cache without a size bound
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Resolve `name`, consulting the cache first.
    pub fn resolve<R: Resolver + ?Sized>(
        &self,
        resolver: &R,
        name: &str,
    ) -> Result<HandlerType, ResolveError> {
        // Clone out of the shard guard before doing anything else
        let cached = self.entries.get(name).map(|entry| entry.value().clone());
        if let Some(ty) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(command = name, handler = %ty, "Returning handler type from cache");
            return Ok(ty);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let ty = resolver.load(name)?;
        trace!(command = name, handler = %ty, "Putting handler type into cache");
        self.store(name, ty.clone());
        Ok(ty)
    }

    fn store(&self, name: &str, ty: HandlerType) {
        if self.capacity > 0 && !self.entries.contains_key(name) {
            while self.entries.len() >= self.capacity {
                // The iterator holds a shard read lock; release it before removing
                let victim = self.entries.iter().next().map(|e| e.key().clone());
                match victim {
                    Some(key) => {
                        if self.entries.remove(&key).is_some() {
                            self.evictions.fetch_add(1, Ordering::Relaxed);
                            trace!(command = %key, "Evicted handler type from cache");
                        }
                    }
                    None => break,
                }
            }
        }
        self.entries.insert(name.to_string(), ty);
    }

    /// Drop the entry for `name`, if cached
    pub fn invalidate(&self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Whether `name` is currently cached
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity (0 = unbounded)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

impl Default for HandlerCache {
    fn default() -> Self {
        Self::unbounded()
    }
}
