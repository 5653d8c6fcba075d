//! Deterministic keyword fallback classifier.
//!
//! Used whenever no LLM provider is usable or a provider call fails. The
//! phrase sets, their priority order and the confidence constants are part
//! of the observable contract.

use crate::shared::constants::{LABEL_HARASSMENT, LABEL_SAFE, LABEL_SPAM, LABEL_TOXIC};

const SPAM_PHRASES: [&str; 3] = ["buy now", "free money", "click here"];
const HARASSMENT_PHRASES: [&str; 3] = ["idiot", "stupid", "hate you"];
const TOXIC_PHRASES: [&str; 3] = ["kill", "die", "bomb"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicVerdict {
    pub label: &'static str,
    pub confidence: f64,
    pub reason: &'static str,
}

/// Classify text by substring membership against the ordered phrase sets.
/// First match wins: spam, then harassment, then toxicity.
pub fn classify_text(text: &str) -> HeuristicVerdict {
    let lower = text.to_lowercase();

    if SPAM_PHRASES.iter().any(|p| lower.contains(p)) {
        return HeuristicVerdict {
            label: LABEL_SPAM,
            confidence: 0.85,
            reason: "Detected common spam phrases.",
        };
    }
    if HARASSMENT_PHRASES.iter().any(|p| lower.contains(p)) {
        return HeuristicVerdict {
            label: LABEL_HARASSMENT,
            confidence: 0.80,
            reason: "Detected abusive language.",
        };
    }
    if TOXIC_PHRASES.iter().any(|p| lower.contains(p)) {
        return HeuristicVerdict {
            label: LABEL_TOXIC,
            confidence: 0.75,
            reason: "Detected highly toxic terms.",
        };
    }

    HeuristicVerdict {
        label: LABEL_SAFE,
        confidence: 0.9,
        reason: "No unsafe indicators found.",
    }
}

/// Fixed verdict for images when no provider is configured. Image bytes are
/// never inspected locally.
pub fn image_stub_verdict() -> HeuristicVerdict {
    HeuristicVerdict {
        label: LABEL_SAFE,
        confidence: 0.8,
        reason: "No unsafe indicators found (stub).",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spam_phrases() {
        for text in ["BUY NOW and save", "get free money today", "just Click Here"] {
            let v = classify_text(text);
            assert_eq!(v.label, "spam", "{}", text);
            assert_eq!(v.confidence, 0.85);
            assert_eq!(v.reason, "Detected common spam phrases.");
        }
    }

    #[test]
    fn test_harassment_phrases() {
        for text in ["you idiot", "that was stupid", "I hate you"] {
            let v = classify_text(text);
            assert_eq!(v.label, "harassment", "{}", text);
            assert_eq!(v.confidence, 0.80);
            assert_eq!(v.reason, "Detected abusive language.");
        }
    }

    #[test]
    fn test_toxic_phrases() {
        for text in ["go kill it", "die trying", "a bomb threat"] {
            let v = classify_text(text);
            assert_eq!(v.label, "toxic", "{}", text);
            assert_eq!(v.confidence, 0.75);
            assert_eq!(v.reason, "Detected highly toxic terms.");
        }
    }

    #[test]
    fn test_safe_when_no_phrase_matches() {
        let v = classify_text("what a lovely afternoon");
        assert_eq!(v.label, "safe");
        assert_eq!(v.confidence, 0.9);
        assert_eq!(v.reason, "No unsafe indicators found.");
    }

    #[test]
    fn test_spam_wins_over_harassment_and_toxicity() {
        // Contains phrases from every set; spam has highest priority
        let v = classify_text("buy now you stupid idiot or die");
        assert_eq!(v.label, "spam");
    }

    #[test]
    fn test_harassment_wins_over_toxicity() {
        let v = classify_text("you stupid thing, go die");
        assert_eq!(v.label, "harassment");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(classify_text("FREE MONEY").label, "spam");
        assert_eq!(classify_text("IdIoT").label, "harassment");
    }

    #[test]
    fn test_image_stub_verdict() {
        let v = image_stub_verdict();
        assert_eq!(v.label, "safe");
        assert_eq!(v.confidence, 0.8);
        assert_eq!(v.reason, "No unsafe indicators found (stub).");
    }
}
