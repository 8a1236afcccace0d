//! Pattern library for PII detection
//!
//! The registry is fully data-driven: entity type to ordered rule list, loaded
//! from TOML. Control flow never branches on a concrete entity type here;
//! per-type behavior lives in the rule definitions and the disambiguator.

use crate::domain::entity::EntityType;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One pattern group definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regex patterns for this group, in order
    pub patterns: Vec<String>,
    /// Base confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Entity type label
    pub category: String,
    /// When true, capture group 1 is the candidate span
    #[serde(default)]
    pub capture: bool,
}

/// Compiled match rule with metadata
#[derive(Debug, Clone)]
pub struct MatchRule {
    /// Compiled regex
    pub regex: Regex,
    /// Entity type this rule detects
    pub entity_type: EntityType,
    /// Base confidence assigned to candidates from this rule
    pub confidence: f32,
    /// Whether capture group 1 defines the candidate span
    pub capture: bool,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: HashMap<String, PatternDefinition>,
}

/// Registry of compiled match rules, grouped by entity type
pub struct PatternRegistry {
    rules: Vec<MatchRule>,
    rules_by_type: HashMap<EntityType, Vec<MatchRule>>,
}

impl PatternRegistry {
    /// Load a pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Load a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        // Sort groups by name so rule order is deterministic across loads
        let mut definitions: Vec<(String, PatternDefinition)> =
            library.patterns.into_iter().collect();
        definitions.sort_by(|a, b| a.0.cmp(&b.0));

        let mut rules = Vec::new();
        let mut rules_by_type: HashMap<EntityType, Vec<MatchRule>> = HashMap::new();

        for (name, def) in definitions {
            let entity_type: EntityType = def.category.parse().map_err(|e| {
                anyhow::anyhow!("Invalid category in pattern group '{name}': {e}")
            })?;

            if !(0.0..=1.0).contains(&def.confidence) {
                anyhow::bail!(
                    "Confidence out of range in pattern group '{}': {}",
                    name,
                    def.confidence
                );
            }

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str).with_context(|| {
                    format!("Invalid regex in pattern group '{name}': {pattern_str}")
                })?;

                if def.capture && regex.captures_len() < 2 {
                    anyhow::bail!(
                        "Pattern group '{name}' sets capture but rule has no capture group: {pattern_str}"
                    );
                }

                let rule = MatchRule {
                    regex,
                    entity_type,
                    confidence: def.confidence,
                    capture: def.capture,
                };

                rules.push(rule.clone());
                rules_by_type.entry(entity_type).or_default().push(rule);
            }
        }

        Ok(Self {
            rules,
            rules_by_type,
        })
    }

    /// Registry with the built-in default patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// All rules in deterministic order
    pub fn all_rules(&self) -> &[MatchRule] {
        &self.rules
    }

    /// Rules for a specific entity type
    pub fn rules_for_type(&self, entity_type: EntityType) -> &[MatchRule] {
        self.rules_by_type
            .get(&entity_type)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_patterns() {
        let registry = PatternRegistry::default_patterns().unwrap();
        assert!(!registry.all_rules().is_empty());
    }

    #[test]
    fn test_email_rule() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let rules = registry.rules_for_type(EntityType::Email);
        assert!(!rules.is_empty());

        assert!(rules[0].regex.is_match("test@example.com"));
        assert!(!rules[0].regex.is_match("not-an-email"));
    }

    #[test]
    fn test_nric_rule() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let rules = registry.rules_for_type(EntityType::Nric);
        assert!(rules.iter().any(|r| r.regex.is_match("S1234567A")));
    }

    #[test]
    fn test_password_rule_has_capture() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let rules = registry.rules_for_type(EntityType::Password);
        assert!(!rules.is_empty());
        assert!(rules.iter().all(|r| r.capture));
    }

    #[test]
    fn test_invalid_category_rejected() {
        let toml = r#"
[patterns.bogus]
category = "NOT_A_TYPE"
confidence = 0.5
patterns = ['x']
"#;
        assert!(PatternRegistry::from_toml(toml).is_err());
    }

    #[test]
    fn test_capture_without_group_rejected() {
        let toml = r#"
[patterns.bad]
category = "EMAIL"
confidence = 0.5
capture = true
patterns = ['\bx\b']
"#;
        assert!(PatternRegistry::from_toml(toml).is_err());
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let toml = r#"
[patterns.bad]
category = "EMAIL"
confidence = 1.5
patterns = ['x']
"#;
        assert!(PatternRegistry::from_toml(toml).is_err());
    }
}
