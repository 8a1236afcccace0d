//! Entity data model
//!
//! Entities are ephemeral: they are created fresh on every detection pass and
//! never persisted past the highlight cycle that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed enumeration of detectable PII entity types
///
/// The serialized form matches the remote detection service's `entity_group`
/// labels (SCREAMING_SNAKE_CASE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// Email addresses
    Email,
    /// Phone numbers (Singapore mobile/landline formats)
    Phone,
    /// Person names
    Person,
    /// Singapore NRIC / national ID numbers
    Nric,
    /// US Social Security Numbers (remote service may report these)
    Ssn,
    /// Credit card numbers
    CreditCard,
    /// Street addresses
    Address,
    /// Postal codes
    PostalCode,
    /// Dates of birth
    DateOfBirth,
    /// Driver's license numbers
    DriverLicense,
    /// Bank account numbers
    BankAccount,
    /// Work pass / permit numbers
    WorkPass,
    /// Tax identification numbers
    TaxNumber,
    /// Passwords typed in clear text
    Password,
}

impl EntityType {
    /// All entity types, in a fixed order
    pub const ALL: [EntityType; 14] = [
        EntityType::Email,
        EntityType::Phone,
        EntityType::Person,
        EntityType::Nric,
        EntityType::Ssn,
        EntityType::CreditCard,
        EntityType::Address,
        EntityType::PostalCode,
        EntityType::DateOfBirth,
        EntityType::DriverLicense,
        EntityType::BankAccount,
        EntityType::WorkPass,
        EntityType::TaxNumber,
        EntityType::Password,
    ];

    /// Human-readable label, identical to the wire form
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Person => "PERSON",
            Self::Nric => "NRIC",
            Self::Ssn => "SSN",
            Self::CreditCard => "CREDIT_CARD",
            Self::Address => "ADDRESS",
            Self::PostalCode => "POSTAL_CODE",
            Self::DateOfBirth => "DATE_OF_BIRTH",
            Self::DriverLicense => "DRIVER_LICENSE",
            Self::BankAccount => "BANK_ACCOUNT",
            Self::WorkPass => "WORK_PASS",
            Self::TaxNumber => "TAX_NUMBER",
            Self::Password => "PASSWORD",
        }
    }

    /// Types whose surface patterns are too ambiguous to accept without a
    /// nearby keyword (bare digit runs, generic date shapes)
    pub fn requires_context(&self) -> bool {
        matches!(
            self,
            Self::DriverLicense
                | Self::BankAccount
                | Self::WorkPass
                | Self::TaxNumber
                | Self::PostalCode
                | Self::DateOfBirth
        )
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EMAIL" => Ok(Self::Email),
            "PHONE" | "PHONE_NUMBER" => Ok(Self::Phone),
            "PERSON" | "PER" | "NAME" => Ok(Self::Person),
            "NRIC" | "ID" | "ID_NUMBER" => Ok(Self::Nric),
            "SSN" => Ok(Self::Ssn),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "ADDRESS" | "LOC" | "LOCATION" => Ok(Self::Address),
            "POSTAL_CODE" | "POSTCODE" => Ok(Self::PostalCode),
            "DATE_OF_BIRTH" | "DOB" => Ok(Self::DateOfBirth),
            "DRIVER_LICENSE" | "DRIVERS_LICENSE" => Ok(Self::DriverLicense),
            "BANK_ACCOUNT" | "ACCOUNT" => Ok(Self::BankAccount),
            "WORK_PASS" => Ok(Self::WorkPass),
            "TAX_NUMBER" | "TIN" | "EIN" => Ok(Self::TaxNumber),
            "PASSWORD" => Ok(Self::Password),
            other => Err(format!("Unknown entity type: {other}")),
        }
    }
}

/// A raw candidate span produced by the extractor, before disambiguation
///
/// Offsets are byte offsets into the scanned text and always fall on `char`
/// boundaries. Invariant: `start < end <= text.len()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Entity type the matching rule belongs to
    pub entity_type: EntityType,
    /// Base confidence of the matching rule
    pub confidence: f32,
}

impl Candidate {
    /// The matched span of `text`
    pub fn span<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// A validated PII entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Entity type
    pub entity_type: EntityType,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
}

impl Entity {
    /// Create a new entity with a clamped confidence score
    pub fn new(start: usize, end: usize, entity_type: EntityType, confidence: f32) -> Self {
        Self {
            start,
            end,
            entity_type,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// The entity's span of `text`
    pub fn span<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    /// Check the span invariant against a concrete text
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.start < self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}

impl From<Candidate> for Entity {
    fn from(c: Candidate) -> Self {
        Entity::new(c.start, c.end, c.entity_type, c.confidence)
    }
}

/// Where the entities of a [`DetectionResult`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// Remote service result, possibly augmented with local PERSON entities
    Remote,
    /// Full local fallback pass (remote call failed)
    LocalFallback,
}

/// Result of one completed detection pass, immutable once built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    /// The text that was scanned
    pub original_text: String,
    /// Redacted form; equals `original_text` when only local detection ran
    pub anonymized_text: String,
    /// Validated entities, offsets into `original_text`
    pub entities: Vec<Entity>,
    /// Provenance of the entity list
    pub source: DetectionSource,
}

impl DetectionResult {
    /// Total number of detected entities
    pub fn total_count(&self) -> usize {
        self.entities.len()
    }

    /// Whether any PII was detected
    pub fn has_detections(&self) -> bool {
        !self.entities.is_empty()
    }

    /// Entities of a specific type
    pub fn entities_of_type(&self, entity_type: EntityType) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.entity_type == entity_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_round_trip() {
        for t in EntityType::ALL {
            assert_eq!(t.label().parse::<EntityType>().unwrap(), t);
        }
    }

    #[test]
    fn test_entity_type_aliases() {
        assert_eq!("ID".parse::<EntityType>().unwrap(), EntityType::Nric);
        assert_eq!("per".parse::<EntityType>().unwrap(), EntityType::Person);
        assert!("ORG".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_confidence_clamped() {
        let e = Entity::new(0, 4, EntityType::Email, 1.7);
        assert_eq!(e.confidence, 1.0);
    }

    #[test]
    fn test_span_invariant() {
        let text = "call 91234567";
        let e = Entity::new(5, 13, EntityType::Phone, 0.8);
        assert!(e.is_valid_for(text));
        assert_eq!(e.span(text), "91234567");

        let bad = Entity::new(5, 20, EntityType::Phone, 0.8);
        assert!(!bad.is_valid_for(text));
    }

    #[test]
    fn test_entities_of_type() {
        let result = DetectionResult {
            original_text: "x".into(),
            anonymized_text: "x".into(),
            entities: vec![
                Entity::new(0, 1, EntityType::Email, 0.9),
                Entity::new(0, 1, EntityType::Person, 0.8),
            ],
            source: DetectionSource::Remote,
        };
        assert_eq!(result.entities_of_type(EntityType::Person).count(), 1);
        assert_eq!(result.total_count(), 2);
    }
}
