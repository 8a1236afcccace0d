//! Highlight geometry, placement, and overlay lifecycle

pub mod geometry;
pub mod overlay;
pub mod placer;
pub mod surface;

pub use geometry::{Point, Rect};
pub use overlay::OverlayLifecycleManager;
pub use placer::{HighlightPlacer, HighlightRegion, RegionKind};
pub use surface::{
    FlatMetrics, Geometry, MonospaceMetrics, StructuredText, Surface, SurfaceId,
};
