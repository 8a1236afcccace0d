//! Rule-based entity extractor
//!
//! Produces raw candidate spans from the pattern registry. All rules for a
//! type run independently and all contribute candidates; deduplication and
//! cross-validation are deliberately not performed here (the disambiguator
//! owns false-positive suppression).

use crate::detection::patterns::{MatchRule, PatternRegistry};
use crate::domain::entity::{Candidate, EntityType};
use std::sync::Arc;

/// Rule-driven candidate extractor
///
/// `scan` is a pure function of the input text and the fixed rule table, so
/// repeated calls on the same text yield identical candidates.
pub struct EntityExtractor {
    registry: Arc<PatternRegistry>,
}

impl EntityExtractor {
    /// Create an extractor with the built-in default patterns
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            registry: Arc::new(PatternRegistry::default_patterns()?),
        })
    }

    /// Create an extractor with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Scan text against every rule of every entity type
    pub fn scan(&self, text: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for rule in self.registry.all_rules() {
            self.scan_rule(text, rule, &mut candidates);
        }
        candidates
    }

    /// Scan text against the rules of a subset of entity types
    ///
    /// Used by the merger to run a PERSON-only augmentation pass.
    pub fn scan_types(&self, text: &str, types: &[EntityType]) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for entity_type in types {
            for rule in self.registry.rules_for_type(*entity_type) {
                self.scan_rule(text, rule, &mut candidates);
            }
        }
        candidates
    }

    /// Run one rule over the whole text
    ///
    /// The search position advances to each candidate's end after a match so
    /// zero-width or non-advancing matches cannot loop. A rule with `capture`
    /// yields the capture-group subrange as the candidate, not the full match.
    fn scan_rule(&self, text: &str, rule: &MatchRule, out: &mut Vec<Candidate>) {
        let mut at = 0;
        while at <= text.len() {
            let Some(caps) = rule.regex.captures_at(text, at) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            // Minimum forward progress: one char past the match start
            let floor = next_char_boundary(text, whole.start());

            let span = if rule.capture { caps.get(1) } else { caps.get(0) };
            match span {
                Some(m) if m.start() < m.end() => {
                    out.push(Candidate {
                        start: m.start(),
                        end: m.end(),
                        entity_type: rule.entity_type,
                        confidence: rule.confidence,
                    });
                    at = m.end().max(floor);
                }
                // Empty or non-participating group: skip forward
                _ => at = floor,
            }
        }
    }
}

/// Smallest char boundary strictly greater than `i` (past-the-end terminates
/// the scan loop)
fn next_char_boundary(text: &str, i: usize) -> usize {
    if i >= text.len() {
        return text.len() + 1;
    }
    let mut j = i + 1;
    while j < text.len() && !text.is_char_boundary(j) {
        j += 1;
    }
    j
}
