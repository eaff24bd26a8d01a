//! Explicit escalation phrases, English and Krio.
//!
//! Matching is case-insensitive substring containment through
//! [`contains_any`], so `"call doctor"` also fires inside a longer,
//! unrelated sentence.

use crate::nlu::{contains_any, matching_phrases, normalize};

pub const ESCALATION_PHRASES: &[&str] = &[
    // direct
    "escalate", "i want to escalate", "please escalate",
    // a human
    "talk to human", "talk to a human", "speak to human", "speak to a human",
    "i want to talk to a human", "i need to talk to a human",
    "real person", "real person please", "connect me to a person",
    // a health worker
    "call a nurse", "call nurse", "need a nurse", "i need a nurse",
    "call a doctor", "call doctor", "need a doctor", "i need a doctor",
    "speak to nurse", "speak to doctor", "talk to nurse", "talk to doctor",
    "talk to a nurse", "speak to a nurse", "talk to a doctor", "speak to a doctor",
    // help
    "i need help", "help me please", "please help me",
    "connect me to someone", "transfer me", "get someone",
    // Krio
    "a want tok to dokta", "a want tok to nos", "a nid elp",
    "kol dokta", "kol nos", "a want tok to pɔsin",
];

/// `true` if the message asks for a human.
pub fn is_explicit_request(text: &str) -> bool {
    contains_any(&normalize(text), ESCALATION_PHRASES)
}

/// Phrases found in the message, in list order (for logs).
pub fn matched_request_phrases(text: &str) -> Vec<&'static str> {
    matching_phrases(&normalize(text), ESCALATION_PHRASES)
}
