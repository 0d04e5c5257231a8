//! Cancellable deferred tasks keyed by target
//!
//! Scheduling a task for a key cancels whatever was pending for that key, so
//! a burst of schedules runs only the last task, one delay after the burst.

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct PendingTask {
    generation: u64,
    token: CancellationToken,
}

/// Debouncer for async side effects
pub struct Debouncer {
    delay: Duration,
    /// Pending tasks indexed by key
    pending: Arc<DashMap<String, PendingTask>>,
    next_generation: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the quiet period unless another task is scheduled for
    /// `key` first. Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, key: &str, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        if let Some(previous) = self.pending.insert(
            key.to_string(),
            PendingTask {
                generation,
                token: token.clone(),
            },
        ) {
            previous.token.cancel();
        }

        let pending = Arc::clone(&self.pending);
        let key = key.to_string();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    log::trace!("[DEBOUNCE] Superseded task for '{}'", key);
                }
                _ = tokio::time::sleep(delay) => {
                    pending.remove_if(&key, |_, task| task.generation == generation);
                    task().await;
                }
            }
        });
    }

    /// Cancel the pending task for `key`. Returns true if one was pending.
    pub fn cancel(&self, key: &str) -> bool {
        match self.pending.remove(key) {
            Some((_, task)) => {
                task.token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    /// Get the number of pending tasks
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
