//! # Krio Detection
//!
//! A heuristic, not a classifier: a message is "likely Krio" when at least
//! [`MIN_MARKERS`] distinct marker words appear in it as substrings. False
//! negatives only cost the resolver its translation step.

use super::{matching_phrases, normalize};

/// Minimum number of distinct markers for a positive detection.
pub const MIN_MARKERS: usize = 2;

/// Common Krio words and fragments (greetings, symptom phrasing, pronoun +
/// aspect markers, Krio spellings of clinical words).
pub const KRIO_MARKERS: &[&str] = &[
    "kushe", "kabo", "kabɔ", "adu", "aw di bodi", "tenki", "tɛnki", "duya", "wetin",
    "de wori", "de pen", "de pɛn", "na ospitul", "go ospitul", "na klinik",
    "mi bodi", "fiba", "a de", "yu de", "wi de", "dɛn de",
    "na ya", "naw naw", "lef am", "noh", "dɛn", "dem",
    "pikin", "uman", "opin", "sik", "bad bad", "siryɔs",
    "smol smol", "smɔl smɔl", "plenty", "bɔku", "komot", "kɔmɔt", "go kam",
    "di bodi", "ed de", "ɛd de", "bele", "bɛlɛ", "kof", "kɔf", "wata",
    "lek", "mek", "foh", "fo", "fɔ", "ya", "dey",
    "fambul", "usai", "aw yu", "a no", "a nɔ", "ondastand", "ɔndastand",
    "gladi", "sabi", "kech", "gud", "fayn", "wɛl", "bɔk ɔp",
    "troway", "trowe", "ronbele", "rɔnbɛlɛ", "edik", "edek", "ɛdɛk",
    "dokto", "dɔktɔ", "nos", "nɔs", "meresin", "mɛrɛsin", "blod", "blɔd",
    "wund", "injuri", "pawa", "wik", "dizi", "swel", "swɛl",
    "brid", "sniz", "shɛk", "bon", "bɔn", "itch", "stif", "posin", "pɔsin",
    "mami", "papa", "dadi", "titi", "boy", "padi", "olrayt", "sun sun",
    "jis nau", "tumara", "yestɛdɛ", "us tɛm", "aw lɔng", "wan wan",
];

/// Distinct markers found in the text.
pub fn marker_hits(text: &str) -> Vec<&'static str> {
    let normalized = normalize(text);
    let mut hits = matching_phrases(&normalized, KRIO_MARKERS);
    hits.dedup();
    hits
}

/// `true` iff at least [`MIN_MARKERS`] distinct markers appear in the text.
pub fn is_likely_krio(text: &str) -> bool {
    marker_hits(text).len() >= MIN_MARKERS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_krio_symptom_phrasing() {
        assert!(is_likely_krio("mi ed de wori"));
        assert!(is_likely_krio("Mi pikin sik bad bad"));
    }

    #[test]
    fn plain_english_is_not_krio() {
        assert!(!is_likely_krio("I have a headache"));
        assert!(!is_likely_krio("xyz nonsense text"));
        assert!(!is_likely_krio(""));
    }

    #[test]
    fn one_marker_is_not_enough() {
        assert_eq!(marker_hits("kushe"), vec!["kushe"]);
        assert!(!is_likely_krio("kushe"));
    }

    #[test]
    fn markers_are_normalised() {
        for m in KRIO_MARKERS {
            assert_eq!(normalize(m), *m);
        }
    }
}
