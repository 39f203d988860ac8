//! Explicit memoization keyed on input content.
//!
//! Derived views (redistribution plans, fitted pricing models) are pure
//! functions of a loaded table. The caller owns a [`MemoCache`] per view and
//! passes the content hash of the input; a different hash recomputes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use retailpulse_ai::PricingRecord;
use retailpulse_inventory::{InventoryRecord, SurplusPolicy};

/// Stable content hashing for records holding `f64` fields.
pub trait ContentHash {
    fn content_hash<H: Hasher>(&self, state: &mut H);
}

impl ContentHash for InventoryRecord {
    fn content_hash<H: Hasher>(&self, state: &mut H) {
        self.product().hash(state);
        self.store().hash(state);
        self.stock().to_bits().hash(state);
        self.threshold().to_bits().hash(state);
    }
}

impl ContentHash for PricingRecord {
    fn content_hash<H: Hasher>(&self, state: &mut H) {
        self.product().hash(state);
        self.store().hash(state);
        self.price().to_bits().hash(state);
        self.sales().to_bits().hash(state);
        self.storage().to_bits().hash(state);
    }
}

impl ContentHash for SurplusPolicy {
    fn content_hash<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }
}

impl<T: ContentHash> ContentHash for [T] {
    fn content_hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self {
            item.content_hash(state);
        }
    }
}

impl<A: ContentHash + ?Sized, B: ContentHash + ?Sized> ContentHash for (&A, &B) {
    fn content_hash<H: Hasher>(&self, state: &mut H) {
        self.0.content_hash(state);
        self.1.content_hash(state);
    }
}

/// Content hash of a table (order-sensitive).
pub fn fingerprint<T: ContentHash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.content_hash(&mut hasher);
    hasher.finish()
}

/// Hit/miss counters for a cache.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Single-entry memo cache: holds the value computed for the latest key.
#[derive(Debug)]
pub struct MemoCache<V> {
    entry: Option<(u64, Arc<V>)>,
    stats: CacheStats,
}

impl<V> Default for MemoCache<V> {
    fn default() -> Self {
        Self {
            entry: None,
            stats: CacheStats::default(),
        }
    }
}

impl<V> MemoCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: u64) -> Option<Arc<V>> {
        match &self.entry {
            Some((k, v)) if *k == key => Some(v.clone()),
            _ => None,
        }
    }

    pub fn get_or_compute(&mut self, key: u64, compute: impl FnOnce() -> V) -> Arc<V> {
        match self.try_get_or_compute(key, || Ok::<V, core::convert::Infallible>(compute())) {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }

    /// As [`MemoCache::get_or_compute`]; a failed computation leaves the cache unchanged.
    pub fn try_get_or_compute<E>(&mut self, key: u64, compute: impl FnOnce() -> Result<V, E>) -> Result<Arc<V>, E> {
        if let Some(v) = self.get(key) {
            self.stats.hits += 1;
            return Ok(v);
        }
        self.stats.misses += 1;
        let value = Arc::new(compute()?);
        self.entry = Some((key, value.clone()));
        Ok(value)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
