//! # Fuzzy Matcher — Similarity Scoring for Krio Spelling Variants
//!
//! Krio has no settled spelling on WhatsApp: the same complaint arrives as
//! `ɛdɛk`, `edek`, `edik` or `a get edek`. The [`FuzzyMatcher`] scores user
//! text against the lexicon's non-EMERGENCY
//! [`VariantPhrase`](crate::core::VariantPhrase)s. Emergency phrases are
//! only ever found by the resolver's keyword scan, so a one-word reply
//! contained in `not waking up` cannot escalate.
//!
//! ## Scoring
//!
//! | Case | Score |
//! |------|-------|
//! | equal after normalisation | `1.0` |
//! | one contains the other | `0.8` (fixed, not length-proportional) |
//! | otherwise | `1 - lev(a, b) / max(len a, len b)` |
//!
//! Lengths and edit distance are counted in Unicode scalar values. The fixed
//! containment score is low-precision on purpose: any long sentence that
//! contains a registered phrase scores 0.8.
//!
//! ## Candidate Extraction
//!
//! ```text
//! message
//!   ├── 1. whole message vs every variant → best ≥ 0.7? return [it]
//!   └── 2. sliding windows of 4, 3, then 2 words
//!          → every window match ≥ 0.7, best per symptom key
//! ```
//!
//! Ties always go to the first phrase in lexicon order, so results are
//! deterministic for a fixed lexicon.

use std::sync::Arc;

use super::normalize;
use crate::core::{Lexicon, MatchSource, SymptomMatch, VariantPhrase};

/// Minimum similarity for a match to count.
pub const MATCH_THRESHOLD: f64 = 0.7;

/// Score given when one string contains the other.
pub const CONTAINMENT_SCORE: f64 = 0.8;

/// Window sizes tried by [`FuzzyMatcher::extract_candidates`], longest first.
const WINDOW_SIZES: [usize; 3] = [4, 3, 2];

/// `true` if a score is good enough to accept.
pub fn meets_threshold(score: f64) -> bool {
    score >= MATCH_THRESHOLD
}

/// Levenshtein edit distance over Unicode scalar values.
///
/// Two-row dynamic programme, O(len a × len b) time, O(len b) memory.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Similarity in `[0, 1]` between two arbitrary strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_normalized(&normalize(a), &normalize(b))
}

/// [`similarity`] for inputs that are already normalised.
///
/// When exactly one side is empty the score is `0.0`: an empty string would
/// otherwise be "contained" in every phrase.
pub fn similarity_normalized(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.contains(b) || b.contains(a) {
        return CONTAINMENT_SCORE;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein(a, b);
    // (max - d) / max rather than 1 - d / max: same value, but the exact
    // quotient rounds to the same double as the 0.7 literal at the boundary.
    (max_len - distance) as f64 / max_len as f64
}

/// Matches free text against the lexicon's variant phrases.
#[derive(Clone)]
pub struct FuzzyMatcher {
    lexicon: Arc<Lexicon>,
}

impl FuzzyMatcher {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Best variant for the text, if its score reaches [`MATCH_THRESHOLD`].
    pub fn match_symptom(&self, text: &str) -> Option<SymptomMatch> {
        self.best_variant(&normalize(text))
    }

    fn best_variant(&self, normalized: &str) -> Option<SymptomMatch> {
        if normalized.is_empty() {
            return None;
        }

        let mut best: Option<(f64, &VariantPhrase)> = None;
        for variant in self.lexicon.fuzzy_variants() {
            let score = similarity_normalized(normalized, &variant.phrase);
            if !meets_threshold(score) {
                continue;
            }
            // Strictly greater: the first phrase in lexicon order wins ties.
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, variant));
                if score >= 1.0 {
                    break;
                }
            }
        }

        best.map(|(score, variant)| {
            SymptomMatch::new(
                variant.symptom_key.clone(),
                score,
                MatchSource::Fuzzy,
                variant.phrase.clone(),
            )
        })
    }

    /// All symptom candidates in a message, at most one per symptom key.
    ///
    /// The whole message is tried first; only if it fails are 4-, 3- and
    /// 2-word windows scanned. Candidates keep first-detection order.
    pub fn extract_candidates(&self, message: &str) -> Vec<SymptomMatch> {
        let normalized = normalize(message);
        if let Some(whole) = self.best_variant(&normalized) {
            return vec![whole];
        }

        let words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();
        let mut candidates: Vec<SymptomMatch> = Vec::new();
        for size in WINDOW_SIZES {
            if words.len() < size {
                continue;
            }
            for window in words.windows(size) {
                let Some(found) = self.best_variant(&window.join(" ")) else {
                    continue;
                };
                match candidates.iter_mut().find(|c| c.symptom_key == found.symptom_key) {
                    Some(existing) if found.confidence > existing.confidence => *existing = found,
                    Some(_) => {}
                    None => candidates.push(found),
                }
            }
        }
        candidates
    }

    /// Highest-confidence candidate, first-detected on ties.
    pub fn best_candidate(&self, message: &str) -> Option<SymptomMatch> {
        self.extract_candidates(message)
            .into_iter()
            .fold(None, |best: Option<SymptomMatch>, c| match best {
                Some(b) if b.confidence >= c.confidence => Some(b),
                _ => Some(c),
            })
    }
}
