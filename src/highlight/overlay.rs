//! Overlay lifecycle management
//!
//! Tracks the active highlight regions per surface and retires them after a
//! fixed display duration. Each applied batch carries a generation number;
//! the expiry timer only removes the batch it was armed for, so a newer
//! batch is never torn down by an older batch's timer.

use crate::highlight::placer::HighlightRegion;
use crate::highlight::surface::SurfaceId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default display duration before regions auto-expire
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_secs(5);

struct RegionBatch {
    generation: u64,
    regions: Vec<HighlightRegion>,
    expiry: Option<JoinHandle<()>>,
}

impl Drop for RegionBatch {
    fn drop(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.abort();
        }
    }
}

/// Owns the visible highlight batches and their expiry timers
///
/// At most one batch is active per surface; applying a new batch replaces
/// the previous one atomically. All operations are idempotent and safe to
/// call for surfaces with no active batch.
pub struct OverlayLifecycleManager {
    display_duration: Duration,
    batches: Arc<Mutex<HashMap<SurfaceId, RegionBatch>>>,
    generations: AtomicU64,
}

impl OverlayLifecycleManager {
    pub fn new(display_duration: Duration) -> Self {
        Self {
            display_duration,
            batches: Arc::new(Mutex::new(HashMap::new())),
            generations: AtomicU64::new(0),
        }
    }

    /// Replace the surface's active batch with `regions`
    ///
    /// An empty batch clears the surface. Arms a timer that removes the
    /// batch after the display duration unless a newer batch has replaced
    /// it first. Must be called from within a tokio runtime.
    pub fn apply(&self, surface_id: SurfaceId, regions: Vec<HighlightRegion>) {
        if regions.is_empty() {
            self.clear(surface_id);
            return;
        }

        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(
            surface = %surface_id,
            regions = regions.len(),
            generation,
            "Applying highlight batch"
        );

        // Insert before arming the timer: the lock is held across the spawn,
        // so the timer cannot observe the map without this batch in it
        let mut guard = self.lock();
        guard.insert(
            surface_id,
            RegionBatch {
                generation,
                regions,
                expiry: None,
            },
        );

        let expiry = {
            let batches = Arc::clone(&self.batches);
            let duration = self.display_duration;
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                let mut guard = match batches.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                let current = guard
                    .get(&surface_id)
                    .is_some_and(|batch| batch.generation == generation);
                if current {
                    if let Some(mut batch) = guard.remove(&surface_id) {
                        // The timer finishing is the expiry; nothing to abort
                        batch.expiry = None;
                    }
                    tracing::debug!(surface = %surface_id, generation, "Highlight batch expired");
                }
            })
        };

        if let Some(batch) = guard.get_mut(&surface_id) {
            batch.expiry = Some(expiry);
        }
    }

    /// Remove the surface's active batch, if any
    ///
    /// Aborts the pending expiry timer so it cannot fire against a future
    /// batch. Safe to call repeatedly.
    pub fn clear(&self, surface_id: SurfaceId) {
        let removed = self.lock().remove(&surface_id);
        if removed.is_some() {
            tracing::debug!(surface = %surface_id, "Cleared highlight batch");
        }
    }

    /// Remove every active batch
    pub fn clear_all(&self) {
        self.lock().clear();
    }

    /// Snapshot of the surface's currently visible regions
    pub fn active_regions(&self, surface_id: SurfaceId) -> Vec<HighlightRegion> {
        self.lock()
            .get(&surface_id)
            .map(|batch| batch.regions.clone())
            .unwrap_or_default()
    }

    /// Number of surfaces with a visible batch
    pub fn active_surface_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SurfaceId, RegionBatch>> {
        match self.batches.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for OverlayLifecycleManager {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_DURATION)
    }
}
