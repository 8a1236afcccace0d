//! Core domain types and models

pub mod entity;
pub mod errors;
pub mod events;
pub mod result;

pub use entity::{Candidate, DetectionResult, DetectionSource, Entity, EntityType};
pub use errors::{GeometryError, RemoteError, WardenError};
pub use events::{DetectionEvent, DetectionSink, LogSink, SurfaceDescriptor, SurfaceKind};
pub use result::Result;
