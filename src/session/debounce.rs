//! Per-surface debounce scheduling
//!
//! Keystrokes arrive far faster than detection should run. Each surface gets
//! a single pending slot: scheduling while a task is pending replaces it,
//! so only the trailing edge of a typing burst triggers detection.

use crate::highlight::surface::SurfaceId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default quiet period before a pending detection fires
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trailing-edge debouncer keyed by surface
pub struct DebounceScheduler {
    delay: Duration,
    pending: Mutex<HashMap<SurfaceId, JoinHandle<()>>>,
}

impl DebounceScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Schedule `task` to run after the quiet period
    ///
    /// Replaces and aborts any task already pending for the surface. Must be
    /// called from within a tokio runtime.
    pub fn schedule<F>(&self, surface_id: SurfaceId, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        if let Some(previous) = self.lock().insert(surface_id, handle) {
            previous.abort();
        }
    }

    /// Drop the surface's pending task, if any
    pub fn cancel(&self, surface_id: SurfaceId) {
        if let Some(handle) = self.lock().remove(&surface_id) {
            handle.abort();
        }
    }

    /// Drop every pending task
    pub fn cancel_all(&self) {
        for (_, handle) in self.lock().drain() {
            handle.abort();
        }
    }

    /// Whether the surface has a task waiting to fire
    pub fn is_pending(&self, surface_id: SurfaceId) -> bool {
        self.lock()
            .get(&surface_id)
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SurfaceId, JoinHandle<()>>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            for (_, handle) in pending.drain() {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_only_trailing_call_fires() {
        let scheduler = DebounceScheduler::new(Duration::from_millis(100));
        let id = SurfaceId::new();
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let fired = Arc::clone(&fired);
            scheduler.schedule(id, async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let scheduler = DebounceScheduler::new(Duration::from_millis(100));
        let id = SurfaceId::new();
        let fired = Arc::new(AtomicUsize::new(0));

        {
            let fired = Arc::clone(&fired);
            scheduler.schedule(id, async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        scheduler.cancel(id);

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_surfaces_debounce_independently() {
        let scheduler = DebounceScheduler::new(Duration::from_millis(100));
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let fired = Arc::clone(&fired);
            scheduler.schedule(SurfaceId::new(), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 3);
    }
}
