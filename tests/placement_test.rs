//! Highlight placement tests over flat and structured surfaces

use piiwarden::domain::entity::{Entity, EntityType};
use piiwarden::domain::errors::GeometryError;
use piiwarden::domain::events::{SurfaceDescriptor, SurfaceKind};
use piiwarden::highlight::geometry::{Point, Rect};
use piiwarden::highlight::placer::{HighlightPlacer, RegionKind};
use piiwarden::highlight::surface::{
    Geometry, MonospaceMetrics, StructuredText, Surface, SurfaceId,
};

const CHAR_W: f32 = 8.0;
const LINE_H: f32 = 16.0;

struct FlatSurface {
    id: SurfaceId,
    text: String,
    metrics: MonospaceMetrics,
}

impl FlatSurface {
    fn new(text: &str) -> Self {
        Self {
            id: SurfaceId::new(),
            text: text.to_string(),
            metrics: MonospaceMetrics::new(Point { x: 10.0, y: 20.0 }, CHAR_W, LINE_H),
        }
    }
}

impl Surface for FlatSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }
    fn descriptor(&self) -> SurfaceDescriptor {
        SurfaceDescriptor::new(SurfaceKind::Flat, "input", "Message", "test.local")
    }
    fn text(&self) -> String {
        self.text.clone()
    }
    fn geometry(&self) -> Geometry<'_> {
        Geometry::Flat(&self.metrics)
    }
    fn bounding_box(&self) -> Result<Rect, GeometryError> {
        Ok(Rect::new(0.0, 0.0, 500.0, 40.0))
    }
}

/// Structured surface with fixed leaves; each leaf renders on its own line
struct LeafSurface {
    id: SurfaceId,
    leaves: Vec<String>,
}

impl LeafSurface {
    fn new(leaves: &[&str]) -> Self {
        Self {
            id: SurfaceId::new(),
            leaves: leaves.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl StructuredText for LeafSurface {
    fn leaf_count(&self) -> Result<usize, GeometryError> {
        Ok(self.leaves.len())
    }

    fn leaf_len(&self, index: usize) -> Result<usize, GeometryError> {
        self.leaves
            .get(index)
            .map(|l| l.len())
            .ok_or_else(|| GeometryError::MeasurementFailed(format!("no leaf {index}")))
    }

    fn leaf_range_rects(
        &self,
        index: usize,
        start: usize,
        end: usize,
    ) -> Result<Vec<Rect>, GeometryError> {
        if start >= end {
            return Ok(vec![]);
        }
        Ok(vec![Rect::new(
            start as f32 * CHAR_W,
            index as f32 * LINE_H,
            (end - start) as f32 * CHAR_W,
            LINE_H,
        )])
    }
}

impl Surface for LeafSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }
    fn descriptor(&self) -> SurfaceDescriptor {
        SurfaceDescriptor::new(SurfaceKind::Structured, "editor", "", "test.local")
    }
    fn text(&self) -> String {
        self.leaves.concat()
    }
    fn geometry(&self) -> Geometry<'_> {
        Geometry::Structured(self)
    }
    fn bounding_box(&self) -> Result<Rect, GeometryError> {
        Ok(Rect::new(0.0, 0.0, 500.0, 100.0))
    }
}

#[test]
fn test_flat_surface_exact_rect() {
    let surface = FlatSurface::new("email a@b.com here");
    let entity = Entity::new(6, 13, EntityType::Email, 0.9);

    let regions = HighlightPlacer::new().place(&surface, &[entity], &surface.text);
    assert_eq!(regions.len(), 1);
    let rect = regions[0].rect;
    assert_eq!(rect.x, 10.0 + 6.0 * CHAR_W);
    assert_eq!(rect.y, 20.0);
    assert_eq!(rect.w, 7.0 * CHAR_W);
    assert_eq!(rect.h, LINE_H);
    assert_eq!(regions[0].kind, RegionKind::Exact);
}

#[test]
fn test_structured_entity_within_one_leaf() {
    let surface = LeafSurface::new(&["hello ", "a@b.com", " bye"]);
    let text = surface.text();
    // "a@b.com" spans bytes 6..13, entirely inside leaf 1
    let entity = Entity::new(6, 13, EntityType::Email, 0.9);

    let regions = HighlightPlacer::new().place(&surface, &[entity], &text);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].rect.y, 1.0 * LINE_H);
    assert_eq!(regions[0].rect.x, 0.0);
    assert_eq!(regions[0].rect.w, 7.0 * CHAR_W);
}

#[test]
fn test_structured_entity_spanning_leaves_gets_multiple_rects() {
    let surface = LeafSurface::new(&["John ", "Smith"]);
    let text = surface.text();
    let entity = Entity::new(0, 10, EntityType::Person, 0.6);

    let regions = HighlightPlacer::new().place(&surface, &[entity], &text);
    // One rect per intersected leaf
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].rect.y, 0.0);
    assert_eq!(regions[0].rect.w, 5.0 * CHAR_W);
    assert_eq!(regions[1].rect.y, LINE_H);
    assert_eq!(regions[1].rect.w, 5.0 * CHAR_W);
    assert!(regions.iter().all(|r| r.kind == RegionKind::Exact));
}

struct FailingLeafSurface {
    id: SurfaceId,
}

impl StructuredText for FailingLeafSurface {
    fn leaf_count(&self) -> Result<usize, GeometryError> {
        Err(GeometryError::SurfaceDetached("widget removed".into()))
    }
    fn leaf_len(&self, _: usize) -> Result<usize, GeometryError> {
        Err(GeometryError::SurfaceDetached("widget removed".into()))
    }
    fn leaf_range_rects(&self, _: usize, _: usize, _: usize) -> Result<Vec<Rect>, GeometryError> {
        Err(GeometryError::SurfaceDetached("widget removed".into()))
    }
}

impl Surface for FailingLeafSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }
    fn descriptor(&self) -> SurfaceDescriptor {
        SurfaceDescriptor::new(SurfaceKind::Structured, "editor", "", "test.local")
    }
    fn text(&self) -> String {
        "a@b.com".to_string()
    }
    fn geometry(&self) -> Geometry<'_> {
        Geometry::Structured(self)
    }
    fn bounding_box(&self) -> Result<Rect, GeometryError> {
        Ok(Rect::new(50.0, 200.0, 300.0, 60.0))
    }
}

#[test]
fn test_structured_failure_falls_back_to_badge() {
    let surface = FailingLeafSurface { id: SurfaceId::new() };
    let entity = Entity::new(0, 7, EntityType::Email, 0.9);

    let regions = HighlightPlacer::new().place(&surface, &[entity], "a@b.com");
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].kind, RegionKind::Badge);
    // Anchored to the surface's bounding box, above its top edge
    assert!(regions[0].rect.y < 200.0);
    assert!(regions[0].rect.x > 50.0);
}

#[test]
fn test_multibyte_prefix_measured_by_chars() {
    // Two 2-byte chars before the match
    let surface = FlatSurface::new("éé a@b.com");
    let text = surface.text();
    let entity = Entity::new(5, 12, EntityType::Email, 0.9);

    let regions = HighlightPlacer::new().place(&surface, &[entity], &text);
    assert_eq!(regions.len(), 1);
    // Prefix "éé " is 3 chars, not 5 bytes
    assert_eq!(regions[0].rect.x, 10.0 + 3.0 * CHAR_W);
}
