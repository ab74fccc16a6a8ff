//! Concurrency Controller
//!
//! Counting-semaphore slots for bounded parallelism. One limiter instance
//! guards engine-wide validations; a fresh one per document guards its
//! rule checkers.
//!
//! A slot is held by an RAII [`SlotGuard`]: dropping it (normal return,
//! early return, panic unwind or task cancellation) returns the permit and
//! decrements the in-flight counter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Default)]
struct SlotCounters {
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    total_acquired: AtomicUsize,
}

/// Bounded slot pool
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    name: &'static str,
    limit: usize,
    semaphore: Arc<Semaphore>,
    counters: Arc<SlotCounters>,
}

/// Held slot; released on drop
#[derive(Debug)]
pub struct SlotGuard {
    _permit: OwnedSemaphorePermit,
    counters: Arc<SlotCounters>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ConcurrencyLimiter {
    /// `limit` must be at least 1; config validation rejects zero
    pub fn new(name: &'static str, limit: usize) -> Self {
        Self {
            name,
            limit,
            semaphore: Arc::new(Semaphore::new(limit)),
            counters: Arc::new(SlotCounters::default()),
        }
    }

    /// Wait for a free slot
    ///
    /// Only fails if the semaphore was closed, which this type never does.
    pub async fn acquire(&self) -> Result<SlotGuard, AcquireError> {
        let permit = self.semaphore.clone().acquire_owned().await?;

        let current = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        self.counters.total_acquired.fetch_add(1, Ordering::Relaxed);

        tracing::trace!(limiter = self.name, in_flight = current, "Slot acquired");

        Ok(SlotGuard {
            _permit: permit,
            counters: Arc::clone(&self.counters),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    /// Highest in-flight count observed since creation
    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn total_acquired(&self) -> usize {
        self.counters.total_acquired.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::task::JoinSet;

    #[tokio::test]
    async fn test_guard_releases_on_drop() {
        let limiter = ConcurrencyLimiter::new("test", 2);

        let first = limiter.acquire().await.unwrap();
        let _second = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available(), 0);
        assert_eq!(limiter.in_flight(), 2);

        drop(first);
        assert_eq!(limiter.available(), 1);
        assert_eq!(limiter.in_flight(), 1);
        assert_eq!(limiter.peak_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_acquire_waits_for_release() {
        let limiter = ConcurrencyLimiter::new("test", 1);
        let held = limiter.acquire().await.unwrap();

        let waiter = {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.acquire().await.map(|_| ()) })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(held);
        waiter.await.unwrap().unwrap();
        assert_eq!(limiter.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_slot_released_when_task_panics() {
        let limiter = ConcurrencyLimiter::new("test", 1);

        let task = {
            let limiter = limiter.clone();
            tokio::spawn(async move {
                let _guard = limiter.acquire().await.unwrap();
                panic!("work failed");
            })
        };
        assert!(task.await.is_err());

        assert_eq!(limiter.in_flight(), 0);
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_peak_never_exceeds_limit() {
        let limiter = ConcurrencyLimiter::new("test", 3);
        let mut tasks = JoinSet::new();

        for _ in 0..20 {
            let limiter = limiter.clone();
            tasks.spawn(async move {
                let _guard = limiter.acquire().await.unwrap();
                tokio::time::sleep(Duration::from_millis(5)).await;
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap();
        }

        assert!(limiter.peak_in_flight() <= 3);
        assert_eq!(limiter.total_acquired(), 20);
        assert_eq!(limiter.in_flight(), 0);
    }
}
