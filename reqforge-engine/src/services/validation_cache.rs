//! Validation result cache
//!
//! TTL keyed store `document id -> ValidationResult`, owned by one engine.
//!
//! # Behavior
//! - Entries expire lazily: a read finding `elapsed > ttl` drops the entry
//!   and reports a miss.
//! - A write supersedes any previous entry for the id.
//! - Above `max_entries`, expired entries are swept first, then the oldest
//!   writes are evicted (FIFO) until the ceiling holds.
//!
//! The lock is a plain mutex held only for map operations; nothing awaits
//! while holding it.

use crate::types::ValidationResult;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default entry lifetime (5 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Default entry ceiling
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1_000;

#[derive(Debug, Clone)]
struct CacheEntry {
    result: ValidationResult,
    cached_at: Instant,
    /// Write sequence number, matches the FIFO queue slot that owns it
    sequence: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Write order; slots whose sequence no longer matches are stale
    order: VecDeque<(String, u64)>,
    next_sequence: u64,
}

impl CacheState {
    fn compact_order(&mut self) {
        let entries = &self.entries;
        self.order
            .retain(|(id, sequence)| entries.get(id).is_some_and(|e| e.sequence == *sequence));
    }
}

/// Cache counters snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped by the size ceiling
    pub evictions: u64,
    /// Entries dropped because their TTL ran out
    pub expirations: u64,
}

/// TTL + size-bounded result cache
#[derive(Debug)]
pub struct ValidationCache {
    ttl: Duration,
    max_entries: usize,
    state: Mutex<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl Default for ValidationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL, DEFAULT_CACHE_MAX_ENTRIES)
    }
}

impl ValidationCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            state: Mutex::new(CacheState::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Map operations cannot leave the state half-written, so a poisoned
        // lock is still usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up a live entry
    pub fn get(&self, id: &str) -> Option<ValidationResult> {
        let mut state = self.lock();

        let expired = match state.entries.get(id) {
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Some(entry) => entry.cached_at.elapsed() > self.ttl,
        };

        if expired {
            state.entries.remove(id);
            self.expirations.fetch_add(1, Ordering::Relaxed);
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(document_id = %id, "Cache entry expired");
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        state.entries.get(id).map(|entry| entry.result.clone())
    }

    /// Store a result, superseding any previous entry for `id`
    pub fn put(&self, id: &str, result: ValidationResult) {
        let mut state = self.lock();

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.entries.insert(
            id.to_string(),
            CacheEntry {
                result,
                cached_at: Instant::now(),
                sequence,
            },
        );
        state.order.push_back((id.to_string(), sequence));

        if state.entries.len() > self.max_entries {
            self.enforce_ceiling(&mut state);
        } else if state.order.len() > self.max_entries.saturating_mul(2) {
            // Repeated rewrites of the same ids leave stale slots behind
            state.compact_order();
        }
    }

    fn enforce_ceiling(&self, state: &mut CacheState) {
        let ttl = self.ttl;
        let before = state.entries.len();
        state.entries.retain(|_, entry| entry.cached_at.elapsed() <= ttl);
        let swept = before - state.entries.len();
        if swept > 0 {
            self.expirations.fetch_add(swept as u64, Ordering::Relaxed);
        }

        state.compact_order();

        let CacheState { entries, order, .. } = state;
        let mut evicted = 0u64;
        while entries.len() > self.max_entries {
            let Some((id, _)) = order.pop_front() else {
                break;
            };
            entries.remove(&id);
            evicted += 1;
        }

        if evicted > 0 {
            self.evictions.fetch_add(evicted, Ordering::Relaxed);
            warn!(
                evicted,
                swept,
                max_entries = self.max_entries,
                "Validation cache over capacity, evicted oldest entries"
            );
        }
    }

    /// Drop one entry; returns whether it was present
    pub fn invalidate(&self, id: &str) -> bool {
        self.lock().entries.remove(id).is_some()
    }

    /// Drop every entry (counters are kept)
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }
}
