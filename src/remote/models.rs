//! Wire types for the remote detection service

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request body for both detection endpoints' `text` field
#[derive(Debug, Clone, Serialize)]
pub struct DetectRequest<'a> {
    pub text: &'a str,
}

/// Request body for `/replace_with_fake`
#[derive(Debug, Clone, Serialize)]
pub struct ReplaceWithFakeRequest<'a> {
    pub text: &'a str,
    /// Entity-type label to enabled flag; unset labels default to enabled on
    /// the service side
    pub enabled_labels: HashMap<String, bool>,
}

/// One entity as reported by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEntity {
    pub start: usize,
    pub end: usize,
    /// SCREAMING_SNAKE_CASE type label; unknown labels are dropped during
    /// sanitization
    pub entity_group: String,
    #[serde(default)]
    pub confidence: f32,
}

/// Response body shared by `/detect_pii` and `/replace_with_fake`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDetection {
    pub anonymized_text: String,
    #[serde(default)]
    pub entities: Vec<RemoteEntity>,
    /// Echoed input; `/detect_pii` may omit it
    #[serde(default)]
    pub original_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_detect_response() {
        let body = r#"{
            "anonymized_text": "Email me at [EMAIL]",
            "entities": [
                {"start": 12, "end": 28, "entity_group": "EMAIL", "confidence": 0.9}
            ],
            "original_text": "Email me at test@example.com"
        }"#;

        let parsed: RemoteDetection = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.entities.len(), 1);
        assert_eq!(parsed.entities[0].entity_group, "EMAIL");
        assert_eq!(parsed.entities[0].start, 12);
    }

    #[test]
    fn test_missing_entities_defaults_empty() {
        let body = r#"{"anonymized_text": "x"}"#;
        let parsed: RemoteDetection = serde_json::from_str(body).unwrap();
        assert!(parsed.entities.is_empty());
        assert!(parsed.original_text.is_none());
    }

    #[test]
    fn test_serialize_replace_request() {
        let mut enabled_labels = HashMap::new();
        enabled_labels.insert("EMAIL".to_string(), true);
        enabled_labels.insert("PERSON".to_string(), false);

        let req = ReplaceWithFakeRequest {
            text: "hi",
            enabled_labels,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["text"], "hi");
        assert_eq!(json["enabled_labels"]["PERSON"], false);
    }
}
