//! Surface abstraction over editable text widgets
//!
//! A surface is an identity-stable handle to one editable text-bearing UI
//! element. It exposes exactly one of two geometry capabilities:
//!
//! - **flat**: a linear character buffer with no positional query; highlight
//!   positions are approximated by measuring substring widths with the
//!   surface's font metrics;
//! - **structured**: document-ordered text leaves supporting sub-range to
//!   rectangle queries, which handle line wraps exactly.
//!
//! Callers depend only on [`Surface`]; only the placer branches on the
//! capability. Surfaces own no detection state; everything is keyed
//! externally by [`SurfaceId`] with weak association.

use crate::domain::errors::GeometryError;
use crate::domain::events::SurfaceDescriptor;
use crate::highlight::geometry::{Point, Rect};
use uuid::Uuid;

/// Stable identity for one surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Geometry capability of a surface
pub enum Geometry<'a> {
    /// Buffer-only widget; widths approximated via font metrics
    Flat(&'a dyn FlatMetrics),
    /// Widget supporting exact sub-range to rectangle queries
    Structured(&'a dyn StructuredText),
}

/// An editable text-bearing UI element
pub trait Surface: Send + Sync {
    /// Stable identity, valid for the surface's lifetime
    fn id(&self) -> SurfaceId;

    /// Loggable identity information
    fn descriptor(&self) -> SurfaceDescriptor;

    /// Live snapshot of the surface's text
    fn text(&self) -> String;

    /// The surface's geometry capability
    fn geometry(&self) -> Geometry<'_>;

    /// Bounding box of the whole surface, used for badge fallback placement
    fn bounding_box(&self) -> Result<Rect, GeometryError>;
}

/// Font-metric measurement for flat surfaces
///
/// Measurements reflect the rendered widths of substrings; they are exact for
/// single-line content and an approximation once text wraps.
pub trait FlatMetrics {
    /// Rendered width of `text` in page units
    fn measure_width(&self, text: &str) -> Result<f32, GeometryError>;

    /// Height of one rendered line
    fn line_height(&self) -> f32;

    /// Page position of the first character (content box origin)
    fn content_origin(&self) -> Result<Point, GeometryError>;
}

/// Leaf-walk interface for structured surfaces
///
/// Leaves are the text-bearing nodes of the widget in document order. Byte
/// offsets within a leaf index that leaf's own text.
pub trait StructuredText {
    /// Number of text leaves currently in the widget
    fn leaf_count(&self) -> Result<usize, GeometryError>;

    /// Byte length of one leaf's text
    fn leaf_len(&self, index: usize) -> Result<usize, GeometryError>;

    /// Rectangles covering the byte range `start..end` of one leaf's text;
    /// wrapped ranges return one rectangle per visual line
    fn leaf_range_rects(
        &self,
        index: usize,
        start: usize,
        end: usize,
    ) -> Result<Vec<Rect>, GeometryError>;
}

/// Headless fixed-advance [`FlatMetrics`] implementation
///
/// Every char advances by the same width. Used by tests and the CLI's
/// highlight preview; real hosts substitute measured font metrics.
#[derive(Debug, Clone)]
pub struct MonospaceMetrics {
    pub origin: Point,
    pub char_width: f32,
    pub line_height: f32,
}

impl MonospaceMetrics {
    pub fn new(origin: Point, char_width: f32, line_height: f32) -> Self {
        Self {
            origin,
            char_width,
            line_height,
        }
    }
}

impl FlatMetrics for MonospaceMetrics {
    fn measure_width(&self, text: &str) -> Result<f32, GeometryError> {
        Ok(text.chars().count() as f32 * self.char_width)
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn content_origin(&self) -> Result<Point, GeometryError> {
        Ok(self.origin)
    }
}
