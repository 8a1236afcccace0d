//! End-to-end detection pipeline
//!
//! Wires surfaces, debounce, detection, placement, and overlay into one
//! object. Surfaces are held weakly: a surface the host has dropped is
//! pruned on the next touch and never detected against again. Every
//! detection pass is stamped with a per-surface generation number taken at
//! snapshot time; a pass whose generation is no longer current by the time
//! its results arrive is discarded, so a slow response can never paint
//! highlights computed from superseded text.

use crate::detection::merger::DetectionMerger;
use crate::domain::events::{DetectionEvent, DetectionSink, LogSink};
use crate::domain::result::Result;
use crate::highlight::overlay::OverlayLifecycleManager;
use crate::highlight::placer::HighlightPlacer;
use crate::highlight::surface::{Surface, SurfaceId};
use crate::remote::client::RemoteDetector;
use crate::session::debounce::DebounceScheduler;
use crate::session::settings::{LabelSettings, SettingsStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

struct SurfaceEntry {
    surface: Weak<dyn Surface>,
    generation: Arc<AtomicU64>,
}

/// Owns one detection session per registered surface
pub struct DetectionPipeline {
    merger: DetectionMerger,
    remote: Arc<dyn RemoteDetector>,
    placer: HighlightPlacer,
    overlay: Arc<OverlayLifecycleManager>,
    debounce: DebounceScheduler,
    sink: Arc<dyn DetectionSink>,
    settings: Mutex<LabelSettings>,
    settings_store: Arc<dyn SettingsStore>,
    surfaces: Mutex<HashMap<SurfaceId, SurfaceEntry>>,
}

impl DetectionPipeline {
    pub fn new(
        merger: DetectionMerger,
        remote: Arc<dyn RemoteDetector>,
        overlay: Arc<OverlayLifecycleManager>,
        debounce: DebounceScheduler,
        settings_store: Arc<dyn SettingsStore>,
    ) -> Result<Self> {
        let settings = settings_store.load()?;
        Ok(Self {
            merger,
            remote,
            placer: HighlightPlacer::new(),
            overlay,
            debounce,
            sink: Arc::new(LogSink),
            settings: Mutex::new(settings),
            settings_store,
            surfaces: Mutex::new(HashMap::new()),
        })
    }

    /// Replace the default logging sink
    pub fn with_sink(mut self, sink: Arc<dyn DetectionSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Register a surface for detection
    ///
    /// Only a weak reference is kept; dropping the surface elsewhere is
    /// enough to end its sessions. Registration also prunes entries whose
    /// surfaces are already gone.
    pub fn register(&self, surface: &Arc<dyn Surface>) {
        let id = surface.id();
        let mut surfaces = self.lock_surfaces();
        surfaces.retain(|_, entry| entry.surface.strong_count() > 0);
        surfaces.entry(id).or_insert_with(|| SurfaceEntry {
            surface: Arc::downgrade(surface),
            generation: Arc::new(AtomicU64::new(0)),
        });
        tracing::debug!(surface = %id, registered = surfaces.len(), "Surface registered");
    }

    /// Drop a surface's registration, pending work, and overlay
    pub fn unregister(&self, surface_id: SurfaceId) {
        self.lock_surfaces().remove(&surface_id);
        self.debounce.cancel(surface_id);
        self.overlay.clear(surface_id);
    }

    /// Handle one input event on a registered surface
    ///
    /// Advances the surface's generation immediately, so any in-flight
    /// session for older text discards its results, then schedules a
    /// debounced detection pass.
    pub fn input_event(self: &Arc<Self>, surface_id: SurfaceId) {
        let Some(generation) = self.bump_generation(surface_id) else {
            tracing::debug!(surface = %surface_id, "Input on unregistered surface ignored");
            return;
        };

        let pipeline = Arc::clone(self);
        self.debounce.schedule(surface_id, async move {
            pipeline.run_session(surface_id, generation).await;
        });
    }

    /// Run one detection session immediately, bypassing the debounce
    pub async fn detect_now(self: &Arc<Self>, surface_id: SurfaceId) {
        let Some(generation) = self.bump_generation(surface_id) else {
            return;
        };
        Arc::clone(self).run_session(surface_id, generation).await;
    }

    /// Clear the surface's visible highlights
    pub fn clear_overlay(&self, surface_id: SurfaceId) {
        self.overlay.clear(surface_id);
    }

    /// Current label settings snapshot
    ///
    /// Label settings scope the redaction label set sent on
    /// `replace_with_fake` requests; detection and highlighting always
    /// cover every label.
    pub fn label_settings(&self) -> LabelSettings {
        self.lock_settings().clone()
    }

    /// Replace the whole label enablement map, persisting the change
    pub fn set_enabled_labels(
        &self,
        overrides: HashMap<crate::domain::EntityType, bool>,
    ) -> Result<()> {
        let snapshot = {
            let mut settings = self.lock_settings();
            settings.replace(overrides);
            settings.clone()
        };
        self.settings_store.save(&snapshot)
    }

    /// Enable or disable one label, persisting the change
    pub fn set_label_enabled(
        &self,
        entity_type: crate::domain::EntityType,
        enabled: bool,
    ) -> Result<()> {
        let snapshot = {
            let mut settings = self.lock_settings();
            settings.set_enabled(entity_type, enabled);
            settings.clone()
        };
        self.settings_store.save(&snapshot)
    }

    async fn run_session(self: Arc<Self>, surface_id: SurfaceId, generation: u64) {
        let Some((surface, counter)) = self.lookup(surface_id) else {
            tracing::debug!(surface = %surface_id, "Surface dropped before session start");
            self.overlay.clear(surface_id);
            return;
        };

        let snapshot = surface.text();
        if snapshot.trim().is_empty() {
            self.overlay.clear(surface_id);
            return;
        }

        let result = self.merger.detect(&snapshot, self.remote.as_ref()).await;

        // Text changed while the remote call was in flight
        if counter.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                surface = %surface_id,
                generation,
                "Discarding stale detection result"
            );
            return;
        }

        if result.entities.is_empty() {
            self.overlay.clear(surface_id);
        } else {
            let regions = self
                .placer
                .place(surface.as_ref(), &result.entities, &snapshot);
            self.overlay.apply(surface_id, regions);
        }

        let event = DetectionEvent::from_result(surface.descriptor(), &result);
        self.sink.on_detection(&event);
    }

    fn bump_generation(&self, surface_id: SurfaceId) -> Option<u64> {
        let surfaces = self.lock_surfaces();
        let entry = surfaces.get(&surface_id)?;
        if entry.surface.strong_count() == 0 {
            return None;
        }
        Some(entry.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn lookup(&self, surface_id: SurfaceId) -> Option<(Arc<dyn Surface>, Arc<AtomicU64>)> {
        let mut surfaces = self.lock_surfaces();
        let entry = surfaces.get(&surface_id)?;
        match entry.surface.upgrade() {
            Some(surface) => Some((surface, Arc::clone(&entry.generation))),
            None => {
                surfaces.remove(&surface_id);
                None
            }
        }
    }

    fn lock_surfaces(&self) -> std::sync::MutexGuard<'_, HashMap<SurfaceId, SurfaceEntry>> {
        match self.surfaces.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_settings(&self) -> std::sync::MutexGuard<'_, LabelSettings> {
        match self.settings.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
