//! Merging of remote and local detection results
//!
//! The remote service is the baseline when it answers; local extraction fills
//! two gaps: PERSON augmentation when the remote list has none, and a full
//! fallback pass when the remote call fails. Only the remote path produces
//! real redaction, so the fallback's `anonymized_text` is the original text.

use crate::detection::disambiguator::Disambiguator;
use crate::detection::extractor::EntityExtractor;
use crate::domain::entity::{DetectionResult, DetectionSource, Entity, EntityType};
use crate::remote::client::RemoteDetector;
use crate::remote::models::RemoteDetection;

/// Combines remote results with local extraction
pub struct DetectionMerger {
    extractor: EntityExtractor,
    disambiguator: Disambiguator,
}

impl DetectionMerger {
    pub fn new(extractor: EntityExtractor, disambiguator: Disambiguator) -> Self {
        Self {
            extractor,
            disambiguator,
        }
    }

    /// Merger with the built-in default patterns
    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(EntityExtractor::new()?, Disambiguator::new()))
    }

    /// Run one full detection pass: call the remote service, then merge
    ///
    /// Remote failures are logged and recovered, never surfaced as errors.
    pub async fn detect(&self, text: &str, remote: &dyn RemoteDetector) -> DetectionResult {
        match remote.detect_pii(text).await {
            Ok(remote_result) => self.merge(text, remote_result),
            Err(e) => {
                tracing::warn!(error = %e, "Remote detection failed, using local fallback");
                self.local_only(text)
            }
        }
    }

    /// Merge a successful remote result with local PERSON augmentation
    ///
    /// If the remote entity list contains zero PERSON entities, a local
    /// PERSON-only pass runs and all validated local PERSON entities are
    /// appended. No cross-source de-duplication is performed.
    pub fn merge(&self, text: &str, remote_result: RemoteDetection) -> DetectionResult {
        let mut entities = self.sanitize_remote_entities(text, &remote_result);

        let remote_has_person = entities
            .iter()
            .any(|e| e.entity_type == EntityType::Person);
        if !remote_has_person {
            let candidates = self.extractor.scan_types(text, &[EntityType::Person]);
            let local_persons = self.disambiguator.validate_all(&candidates, text);
            tracing::debug!(
                count = local_persons.len(),
                "Augmenting remote result with local PERSON entities"
            );
            entities.extend(local_persons);
        }

        DetectionResult {
            original_text: text.to_string(),
            anonymized_text: remote_result.anonymized_text,
            entities,
            source: DetectionSource::Remote,
        }
    }

    /// Full local pass across all entity types
    ///
    /// No redaction is applied locally, so `anonymized_text` equals the input.
    pub fn local_only(&self, text: &str) -> DetectionResult {
        let candidates = self.extractor.scan(text);
        let entities = self.disambiguator.validate_all(&candidates, text);

        DetectionResult {
            original_text: text.to_string(),
            anonymized_text: text.to_string(),
            entities,
            source: DetectionSource::LocalFallback,
        }
    }

    /// Convert wire entities to domain entities, dropping malformed ones
    ///
    /// Out-of-bounds offsets are clamped to the text and to char boundaries;
    /// spans that are still empty after clamping, and unknown entity groups,
    /// are dropped with a warning.
    fn sanitize_remote_entities(&self, text: &str, remote: &RemoteDetection) -> Vec<Entity> {
        let mut entities = Vec::with_capacity(remote.entities.len());
        for wire in &remote.entities {
            let entity_type: EntityType = match wire.entity_group.parse() {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(entity_group = %wire.entity_group, "{e}, dropping entity");
                    continue;
                }
            };

            let start = clamp_to_boundary(text, wire.start.min(text.len()));
            let end = clamp_to_boundary(text, wire.end.min(text.len()));
            if start >= end {
                tracing::warn!(
                    start = wire.start,
                    end = wire.end,
                    len = text.len(),
                    "Dropping malformed remote entity span"
                );
                continue;
            }

            entities.push(Entity::new(start, end, entity_type, wire.confidence));
        }
        entities
    }
}

fn clamp_to_boundary(text: &str, mut i: usize) -> usize {
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}
