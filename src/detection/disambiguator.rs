//! Contextual disambiguation of raw candidates
//!
//! Pattern rules alone overmatch badly: capitalized word pairs look like
//! names, bare 6-9 digit runs look like postal codes and bank accounts. This
//! module applies per-type heuristics that discard likely false positives
//! before candidates become entities.

use crate::domain::entity::{Candidate, Entity, EntityType};
use std::collections::{HashMap, HashSet};

/// Width of the context window checked before and after a candidate span, in
/// bytes (clamped to char boundaries)
const CONTEXT_WINDOW: usize = 30;

/// Phrases that disqualify a PERSON candidate outright: greetings, days and
/// months, generic tech/business terms, place names, field-label phrases
const PERSON_DENY_LIST: &[&str] = &[
    // Common phrases
    "thank you",
    "good morning",
    "good afternoon",
    "good evening",
    "good night",
    "how are",
    "nice to",
    "see you",
    "talk to",
    "speak to",
    "email me",
    "phone number",
    "mobile number",
    "contact number",
    "telephone number",
    "user name",
    "full name",
    "first name",
    "last name",
    "display name",
    "company name",
    "business name",
    "file name",
    "folder name",
    // Place names
    "united states",
    "new york",
    "hong kong",
    "kuala lumpur",
    "penang",
    "johor bahru",
    "singapore city",
    "orchard road",
    "marina bay",
    // Time and date related
    "today",
    "tomorrow",
    "yesterday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "january",
    "february",
    "march",
    "april",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
    "morning",
    "afternoon",
    "evening",
    "night",
    // Technology and business terms
    "email",
    "password",
    "account",
    "login",
    "logout",
    "signin",
    "signup",
    "website",
    "internet",
    "google",
    "facebook",
    "twitter",
    "instagram",
    "whatsapp",
    "telegram",
    "linkedin",
    "youtube",
    "microsoft",
    "apple",
    // Field labels and local context that are not names
    "singapore",
    "nric",
    "passport",
    "address",
    "postal code",
    "zip code",
    "street",
    "road",
    "avenue",
    "lane",
    "block",
    "unit",
    "floor",
];

/// Stricter deny list applied only when a candidate has no positive name
/// signal
const PERSON_EXTENDED_DENY_LIST: &[&str] = &[
    "phone number",
    "mobile number",
    "email address",
    "today tomorrow",
    "good morning",
    "thank you",
    "how are",
    "see you",
    "talk to",
];

/// Common surnames and given names; a hit is a positive signal that relaxes
/// the extended deny list
const NAME_LEXICON: &[&str] = &[
    "tan", "lim", "lee", "ng", "ong", "wong", "goh", "teo", "lau", "sia", "chan", "chen", "chong",
    "chua", "gan", "ho", "koh", "low", "neo", "seah", "soh", "tay", "toh", "wee", "yap", "yeo",
    "yeoh", "yong", "yu", "chin", "chew", "foo", "heng", "hong", "hoo", "koo", "lam", "leong",
    "loo", "mok", "sim", "sng", "soo", "thong", "tong", "wang", "woo", "yak", "yam", "yang",
    "ahmad", "hassan", "ibrahim", "ismail", "mohamed", "mohammad", "rahman", "ali", "omar",
    "osman", "salleh", "abdullah", "adam", "hamid", "hussain", "rashid", "singh", "kumar", "raj",
    "rajan", "krishnan", "murugan", "nathan", "ravi", "samy", "devi", "lakshmanan", "suresh",
    "prakash", "menon", "nair", "pillai",
];

/// Stop-words used for the "not all tokens are common words" positive signal
const STOP_WORDS: &[&str] = &[
    "the", "and", "of", "to", "a", "in", "for", "is", "on", "that", "by", "this", "with", "you",
    "it", "not", "or", "be", "are",
];

/// Heuristic validator for raw candidates
pub struct Disambiguator {
    name_lexicon: HashSet<&'static str>,
    stop_words: HashSet<&'static str>,
    context_keywords: HashMap<EntityType, &'static [&'static str]>,
}

impl Disambiguator {
    pub fn new() -> Self {
        let mut context_keywords: HashMap<EntityType, &'static [&'static str]> = HashMap::new();
        context_keywords.insert(
            EntityType::DriverLicense,
            &["license", "licence", "dl", "driver", "driving", "singapore"][..],
        );
        context_keywords.insert(
            EntityType::BankAccount,
            &["account", "bank", "routing", "iban", "swift", "dbs", "ocbc", "uob"][..],
        );
        context_keywords.insert(
            EntityType::WorkPass,
            &["work", "permit", "pass", "employment", "ep", "wp", "dp", "singapore", "foreign"][..],
        );
        context_keywords.insert(
            EntityType::TaxNumber,
            &["tax", "ein", "itin", "tin", "singapore"][..],
        );
        context_keywords.insert(
            EntityType::PostalCode,
            &["postal", "code", "postcode", "singapore", "address"][..],
        );
        context_keywords.insert(
            EntityType::DateOfBirth,
            &["birth", "born", "dob", "birthday", "age"][..],
        );

        Self {
            name_lexicon: NAME_LEXICON.iter().copied().collect(),
            stop_words: STOP_WORDS.iter().copied().collect(),
            context_keywords,
        }
    }

    /// Decide whether a candidate survives disambiguation
    pub fn validate(&self, candidate: &Candidate, full_text: &str) -> bool {
        match candidate.entity_type {
            EntityType::Person => self.validate_person(candidate.span(full_text)),
            t if t.requires_context() => self.has_context_keyword(candidate, full_text),
            // EMAIL, CREDIT_CARD, PHONE, ADDRESS, PASSWORD, NRIC, SSN are
            // accepted as-is once well-formed
            _ => true,
        }
    }

    /// Validate candidates in bulk, preserving order
    pub fn validate_all(&self, candidates: &[Candidate], full_text: &str) -> Vec<Entity> {
        candidates
            .iter()
            .filter(|c| self.validate(c, full_text))
            .map(|c| Entity::from(*c))
            .collect()
    }

    fn validate_person(&self, span: &str) -> bool {
        let tokens: Vec<&str> = span.split_whitespace().collect();
        if tokens.len() < 2 || tokens.len() > 4 {
            return false;
        }
        for token in &tokens {
            if token.is_empty()
                || token.chars().count() > 15
                || !token.chars().all(|c| c.is_ascii_alphabetic())
            {
                return false;
            }
        }

        let lower = span.to_lowercase();
        let lower_tokens: Vec<&str> = lower.split_whitespace().collect();

        if PERSON_DENY_LIST
            .iter()
            .any(|phrase| contains_phrase(&lower_tokens, phrase))
        {
            return false;
        }

        // Positive signal: a lexicon surname/given-name hit, or at least one
        // token that is not a common stop-word
        let lexicon_hit = lower_tokens.iter().any(|t| self.name_lexicon.contains(t));
        let not_all_stop_words = !lower_tokens.iter().all(|t| self.stop_words.contains(t));
        if !(lexicon_hit || not_all_stop_words)
            || (!lexicon_hit
                && PERSON_EXTENDED_DENY_LIST
                    .iter()
                    .any(|phrase| contains_phrase(&lower_tokens, phrase)))
        {
            return false;
        }

        true
    }

    /// Require a type-specific keyword within the fixed window immediately
    /// before or after the candidate span
    fn has_context_keyword(&self, candidate: &Candidate, full_text: &str) -> bool {
        let Some(keywords) = self.context_keywords.get(&candidate.entity_type) else {
            return true;
        };

        let before_start = floor_char_boundary(full_text, candidate.start.saturating_sub(CONTEXT_WINDOW));
        let after_end = ceil_char_boundary(
            full_text,
            (candidate.end + CONTEXT_WINDOW).min(full_text.len()),
        );

        let before = full_text[before_start..candidate.start].to_lowercase();
        let after = full_text[candidate.end..after_end].to_lowercase();
        let context = format!("{before} {after}");

        keywords.iter().any(|k| context.contains(k))
    }
}

impl Default for Disambiguator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole-word phrase containment over a token list
fn contains_phrase(tokens: &[&str], phrase: &str) -> bool {
    let phrase_tokens: Vec<&str> = phrase.split_whitespace().collect();
    if phrase_tokens.is_empty() || phrase_tokens.len() > tokens.len() {
        return false;
    }
    tokens
        .windows(phrase_tokens.len())
        .any(|w| w == phrase_tokens.as_slice())
}

fn floor_char_boundary(text: &str, mut i: usize) -> usize {
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn person_candidate(text: &str) -> Candidate {
        Candidate {
            start: 0,
            end: text.len(),
            entity_type: EntityType::Person,
            confidence: 0.8,
        }
    }

    #[test_case("John Smith", true; "plain two token name accepted")]
    #[test_case("Good Morning", false; "deny listed greeting rejected")]
    #[test_case("X", false; "single token rejected")]
    #[test_case("Tan Wei Ming", true; "lexicon surname accepted")]
    #[test_case("Lim Jun Jie Wei Ming", false; "five tokens rejected")]
    #[test_case("John Smith3", false; "non alphabetic token rejected")]
    #[test_case("Thisnameisfarfartoolong Smith", false; "overlong token rejected")]
    #[test_case("First Name", false; "field label phrase rejected")]
    #[test_case("New York", false; "place name rejected")]
    fn test_person_validation(span: &str, expected: bool) {
        let d = Disambiguator::new();
        assert_eq!(d.validate(&person_candidate(span), span), expected);
    }

    #[test]
    fn test_deny_list_is_whole_word() {
        // "Anthea" contains "the" as a substring but not as a token
        let d = Disambiguator::new();
        let span = "Anthea Tan";
        assert!(d.validate(&person_candidate(span), span));
    }

    #[test]
    fn test_contextual_type_with_keyword_accepted() {
        let d = Disambiguator::new();
        let text = "my license number is S1234567A";
        let start = text.find("S1234567A").unwrap();
        let candidate = Candidate {
            start,
            end: start + "S1234567A".len(),
            entity_type: EntityType::DriverLicense,
            confidence: 0.75,
        };
        assert!(d.validate(&candidate, text));
    }

    #[test]
    fn test_contextual_type_without_keyword_rejected() {
        let d = Disambiguator::new();
        let text = "random text S1234567A end";
        let start = text.find("S1234567A").unwrap();
        let candidate = Candidate {
            start,
            end: start + "S1234567A".len(),
            entity_type: EntityType::DriverLicense,
            confidence: 0.75,
        };
        assert!(!d.validate(&candidate, text));
    }

    #[test]
    fn test_keyword_after_span_counts() {
        let d = Disambiguator::new();
        let text = "123456 is my postal code";
        let candidate = Candidate {
            start: 0,
            end: 6,
            entity_type: EntityType::PostalCode,
            confidence: 0.7,
        };
        assert!(d.validate(&candidate, text));
    }

    #[test]
    fn test_keyword_outside_window_rejected() {
        let d = Disambiguator::new();
        let filler = "x".repeat(40);
        let text = format!("postal {filler} 123456");
        let start = text.len() - 6;
        let candidate = Candidate {
            start,
            end: text.len(),
            entity_type: EntityType::PostalCode,
            confidence: 0.7,
        };
        assert!(!d.validate(&candidate, &text));
    }

    #[test]
    fn test_unconditional_types_pass() {
        let d = Disambiguator::new();
        let text = "test@example.com";
        let candidate = Candidate {
            start: 0,
            end: text.len(),
            entity_type: EntityType::Email,
            confidence: 0.9,
        };
        assert!(d.validate(&candidate, text));
    }

    #[test]
    fn test_validate_all_preserves_order() {
        let d = Disambiguator::new();
        let text = "John Smith and Good Morning and Jane Doe";
        let candidates = vec![
            person_candidate("John Smith"),
            Candidate {
                start: 15,
                end: 27,
                entity_type: EntityType::Person,
                confidence: 0.8,
            },
            Candidate {
                start: 32,
                end: 40,
                entity_type: EntityType::Person,
                confidence: 0.8,
            },
        ];
        let entities = d.validate_all(&candidates, text);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].span(text), "John Smith");
        assert_eq!(entities[1].span(text), "Jane Doe");
    }
}
