//! Local PII detection
//!
//! Rule-driven extraction, heuristic disambiguation, and merging with the
//! remote service's result. The pattern table is data-driven so tests can
//! enumerate entity types and assert extractor and disambiguator behavior
//! independently of control flow.

pub mod disambiguator;
pub mod extractor;
pub mod merger;
pub mod patterns;

pub use disambiguator::Disambiguator;
pub use extractor::EntityExtractor;
pub use merger::DetectionMerger;
pub use patterns::{MatchRule, PatternRegistry};
