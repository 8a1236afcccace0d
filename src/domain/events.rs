//! Detection events emitted to the host UI
//!
//! After every completed merge the pipeline emits one [`DetectionEvent`] for
//! consumption by an external status/log panel. Events carry the entity text
//! so the panel can display it without re-reading the surface.

use crate::domain::entity::{DetectionResult, Entity, EntityType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which geometry model a surface supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Linear character buffer, no positional query (input/textarea)
    Flat,
    /// Supports sub-range to rectangle queries (rich editors)
    Structured,
}

/// Stable, loggable identity information for a surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceDescriptor {
    /// Geometry capability
    pub kind: SurfaceKind,
    /// Element identifier on the page, if any
    pub element_id: String,
    /// Placeholder or accessible label, if any
    pub placeholder: String,
    /// Host the surface lives on
    pub host: String,
}

impl SurfaceDescriptor {
    pub fn new(
        kind: SurfaceKind,
        element_id: impl Into<String>,
        placeholder: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            element_id: element_id.into(),
            placeholder: placeholder.into(),
            host: host.into(),
        }
    }
}

impl std::fmt::Display for SurfaceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?}#{} on {} ({})",
            self.kind, self.element_id, self.host, self.placeholder
        )
    }
}

/// One detected entity as reported to the host UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedEntity {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// The matched text itself
    pub text: String,
    pub confidence: f32,
    pub start: usize,
    pub end: usize,
}

/// Event emitted after every completed detection pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub timestamp: DateTime<Utc>,
    pub surface: SurfaceDescriptor,
    pub entities: Vec<ReportedEntity>,
    pub total_count: usize,
}

impl DetectionEvent {
    /// Build an event from a completed detection result
    pub fn from_result(surface: SurfaceDescriptor, result: &DetectionResult) -> Self {
        let entities: Vec<ReportedEntity> = result
            .entities
            .iter()
            .filter(|e| e.is_valid_for(&result.original_text))
            .map(|e: &Entity| ReportedEntity {
                entity_type: e.entity_type,
                text: e.span(&result.original_text).to_string(),
                confidence: e.confidence,
                start: e.start,
                end: e.end,
            })
            .collect();
        let total_count = entities.len();

        Self {
            timestamp: Utc::now(),
            surface,
            entities,
            total_count,
        }
    }
}

/// Receiver for detection events (the host status/log panel)
pub trait DetectionSink: Send + Sync {
    fn on_detection(&self, event: &DetectionEvent);
}

/// Default sink that writes structured tracing events
#[derive(Debug, Default)]
pub struct LogSink;

impl DetectionSink for LogSink {
    fn on_detection(&self, event: &DetectionEvent) {
        tracing::info!(
            surface = %event.surface,
            total_count = event.total_count,
            types = ?event
                .entities
                .iter()
                .map(|e| e.entity_type.label())
                .collect::<Vec<_>>(),
            "PII detected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::DetectionSource;

    #[test]
    fn test_event_from_result() {
        let text = "mail me at a@b.com";
        let result = DetectionResult {
            original_text: text.to_string(),
            anonymized_text: text.to_string(),
            entities: vec![Entity::new(11, 18, EntityType::Email, 0.9)],
            source: DetectionSource::LocalFallback,
        };
        let descriptor = SurfaceDescriptor::new(
            SurfaceKind::Flat,
            "prompt-textarea",
            "Message",
            "chat.example.com",
        );

        let event = DetectionEvent::from_result(descriptor, &result);
        assert_eq!(event.total_count, 1);
        assert_eq!(event.entities[0].text, "a@b.com");
    }

    #[test]
    fn test_event_drops_malformed_entities() {
        let result = DetectionResult {
            original_text: "short".to_string(),
            anonymized_text: "short".to_string(),
            entities: vec![Entity::new(2, 40, EntityType::Phone, 0.8)],
            source: DetectionSource::LocalFallback,
        };
        let descriptor = SurfaceDescriptor::new(SurfaceKind::Flat, "", "", "example.com");

        let event = DetectionEvent::from_result(descriptor, &result);
        assert_eq!(event.total_count, 0);
    }
}
