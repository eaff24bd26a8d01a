//! # NLU — Text Normalisation and Matching Primitives
//!
//! Everything that looks at raw user text lives here. The sub-modules are
//! deliberately small and side-effect free:
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`fuzzy`] | Levenshtein similarity and symptom candidate extraction |
//! | [`intent`] | Keyword-overlap intent classifier (telemetry only) |
//! | [`krio`] | "Is this Krio?" marker heuristic |
//!
//! ## Normalisation
//!
//! ```text
//! "  Mi ƐD de  Wɔri " ──NFC──► lower-case ──► collapse spaces ──► "mi ɛd de wɔri"
//! ```
//!
//! NFC matters for Krio: `ɛ` and `ɔ` arrive from WhatsApp keyboards both
//! precomposed and decomposed.
//!
//! ## Substring Matching
//!
//! Intent keywords, escalation phrases, Krio markers and keyword scans all
//! go through [`contains_phrase`]. It is plain substring containment with no
//! word boundaries (`"cold"` matches inside `"scold"`). Existing behaviour
//! depends on that permissiveness; swapping in boundary-aware matching is a
//! one-function change here.

/// Sub-module with similarity scoring and the symptom fuzzy matcher.
pub mod fuzzy;

/// Sub-module with the health intent classifier.
pub mod intent;

/// Sub-module with Krio detection.
pub mod krio;

use unicode_normalization::UnicodeNormalization;

/// Normalises text for matching: NFC, lower-case, trimmed, single spaces.
pub fn normalize(text: &str) -> String {
    let lowered = text.nfc().collect::<String>().to_lowercase();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `true` if `phrase` occurs anywhere inside `haystack`.
///
/// Both sides are expected to be normalised already. An empty phrase never
/// matches.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    !phrase.is_empty() && haystack.contains(phrase)
}

/// `true` if any phrase occurs inside `haystack`.
pub fn contains_any<S: AsRef<str>>(haystack: &str, phrases: &[S]) -> bool {
    phrases
        .iter()
        .any(|p| contains_phrase(haystack, p.as_ref()))
}

/// Every phrase that occurs inside `haystack`, in list order.
pub fn matching_phrases<'p, S: AsRef<str>>(haystack: &str, phrases: &'p [S]) -> Vec<&'p str> {
    phrases
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| contains_phrase(haystack, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_trims_and_collapses() {
        assert_eq!(normalize("  I Have   a HEADACHE \n"), "i have a headache");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalize_composes_krio_vowels() {
        // "e" + combining acute vs precomposed "é"
        assert_eq!(normalize("cafe\u{301}"), normalize("café"));
        assert_eq!(normalize("ƐD DE WƆRI"), "ɛd de wɔri");
    }

    #[test]
    fn containment_has_no_word_boundaries() {
        assert!(contains_any("don't scold me", &["cold"]));
        assert!(!contains_any("all good", &["cold", ""]));
    }

    #[test]
    fn matching_phrases_keeps_list_order() {
        let hits = matching_phrases("fever and cough", &["cough", "rash", "fever"]);
        assert_eq!(hits, vec!["cough", "fever"]);
    }
}
