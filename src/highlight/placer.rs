//! Offset-to-screen highlight placement
//!
//! Maps validated entity spans into screen-space regions on the originating
//! surface. Geometry is never cached across detection passes: scroll
//! position, viewport, and text content may all have changed, so every call
//! recomputes from scratch.

use crate::domain::entity::Entity;
use crate::domain::entity::EntityType;
use crate::domain::errors::GeometryError;
use crate::highlight::geometry::Rect;
use crate::highlight::surface::{Geometry, Surface};
use serde::{Deserialize, Serialize};

/// Badge square size, in page units
const BADGE_SIZE: f32 = 20.0;
/// Gap between a badge and the surface's top edge
const BADGE_GAP: f32 = 4.0;
/// Longest snippet echoed into a region label
const LABEL_SNIPPET_MAX: usize = 40;

/// How a region marks its entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// Rectangle covering the entity text itself
    Exact,
    /// Caption-style indicator near the surface, used when precise geometry
    /// was unavailable
    Badge,
}

/// One rendered highlight region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightRegion {
    pub rect: Rect,
    pub entity_type: EntityType,
    pub label_text: String,
    pub kind: RegionKind,
}

/// Converts a validated entity list plus a live text snapshot into regions
#[derive(Debug, Default)]
pub struct HighlightPlacer;

impl HighlightPlacer {
    pub fn new() -> Self {
        Self
    }

    /// Place highlight regions for every entity on the surface
    ///
    /// Per-entity isolation: one entity's geometry failure degrades that
    /// entity to a badge (or, if even the bounding box is gone, a logged
    /// skip) without aborting the rest of the batch. Entities whose spans do
    /// not fit the snapshot are clamped, then dropped if still malformed.
    pub fn place(
        &self,
        surface: &dyn Surface,
        entities: &[Entity],
        snapshot: &str,
    ) -> Vec<HighlightRegion> {
        let mut regions = Vec::new();

        for entity in entities {
            let Some(entity) = clamp_entity(entity, snapshot) else {
                tracing::warn!(
                    start = entity.start,
                    end = entity.end,
                    len = snapshot.len(),
                    "Dropping malformed entity before placement"
                );
                continue;
            };

            match self.place_entity(surface, &entity, snapshot) {
                Ok(mut placed) => regions.append(&mut placed),
                Err(e) => {
                    tracing::debug!(error = %e, entity_type = %entity.entity_type, "Geometry failed, degrading to badge");
                    match self.badge_region(surface, &entity, snapshot) {
                        Ok(badge) => regions.push(badge),
                        Err(e) => {
                            tracing::warn!(error = %e, "Surface gone, cannot place badge");
                        }
                    }
                }
            }
        }

        regions
    }

    fn place_entity(
        &self,
        surface: &dyn Surface,
        entity: &Entity,
        snapshot: &str,
    ) -> Result<Vec<HighlightRegion>, GeometryError> {
        let rects = match surface.geometry() {
            Geometry::Flat(metrics) => {
                let origin = metrics.content_origin()?;
                let prefix_width = metrics.measure_width(&snapshot[..entity.start])?;
                let span_width = metrics.measure_width(entity.span(snapshot))?;
                vec![Rect::new(
                    origin.x + prefix_width,
                    origin.y,
                    span_width,
                    metrics.line_height(),
                )]
            }
            Geometry::Structured(structured) => {
                self.structured_rects(structured, entity.start, entity.end)?
            }
        };

        if rects.is_empty() {
            // Snapshot and widget text diverged mid-pass
            return Err(GeometryError::RangeOutOfBounds {
                start: entity.start,
                end: entity.end,
                len: snapshot.len(),
            });
        }

        let label = region_label(entity, snapshot);
        Ok(rects
            .into_iter()
            .map(|rect| HighlightRegion {
                rect,
                entity_type: entity.entity_type,
                label_text: label.clone(),
                kind: RegionKind::Exact,
            })
            .collect())
    }

    /// Walk the leaves in document order, accumulating a running offset, and
    /// query each leaf that intersects `[start, end)`; a leaf may return more
    /// than one rectangle when the range wraps visually
    fn structured_rects(
        &self,
        structured: &dyn crate::highlight::surface::StructuredText,
        start: usize,
        end: usize,
    ) -> Result<Vec<Rect>, GeometryError> {
        let mut rects = Vec::new();
        let mut offset = 0usize;

        for index in 0..structured.leaf_count()? {
            let len = structured.leaf_len(index)?;
            let leaf_start = offset;
            let leaf_end = offset + len;
            offset = leaf_end;

            if leaf_end <= start {
                continue;
            }
            if leaf_start >= end {
                break;
            }

            let local_start = start.max(leaf_start) - leaf_start;
            let local_end = end.min(leaf_end) - leaf_start;
            if local_start < local_end {
                rects.extend(structured.leaf_range_rects(index, local_start, local_end)?);
            }
        }

        Ok(rects)
    }

    fn badge_region(
        &self,
        surface: &dyn Surface,
        entity: &Entity,
        snapshot: &str,
    ) -> Result<HighlightRegion, GeometryError> {
        let bb = surface.bounding_box()?;
        Ok(HighlightRegion {
            rect: Rect::new(
                bb.x + bb.w - BADGE_SIZE,
                bb.y - BADGE_SIZE - BADGE_GAP,
                BADGE_SIZE,
                BADGE_SIZE,
            ),
            entity_type: entity.entity_type,
            label_text: region_label(entity, snapshot),
            kind: RegionKind::Badge,
        })
    }
}

/// Clamp an entity's span to the snapshot; None when nothing valid remains
fn clamp_entity(entity: &Entity, snapshot: &str) -> Option<Entity> {
    let mut start = entity.start.min(snapshot.len());
    let mut end = entity.end.min(snapshot.len());
    while start > 0 && !snapshot.is_char_boundary(start) {
        start -= 1;
    }
    while end > 0 && !snapshot.is_char_boundary(end) {
        end -= 1;
    }
    if start < end {
        Some(Entity::new(start, end, entity.entity_type, entity.confidence))
    } else {
        None
    }
}

fn region_label(entity: &Entity, snapshot: &str) -> String {
    let mut snippet = entity.span(snapshot);
    if snippet.len() > LABEL_SNIPPET_MAX {
        let mut cut = LABEL_SNIPPET_MAX;
        while !snippet.is_char_boundary(cut) {
            cut -= 1;
        }
        snippet = &snippet[..cut];
    }
    format!("{}: {}", entity.entity_type, snippet)
}
