//! # SymptomMatch — Per-message Resolution Result
//!
//! Created for each incoming message by the
//! [`SymptomResolver`](crate::triage::resolver::SymptomResolver) and consumed
//! immediately by the responder. Never persisted.

use std::fmt;

use serde::Serialize;

/// Which resolver step produced a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchSource {
    /// Plain keyword containment over the original text.
    ExactKeyword,
    /// Edit-distance / containment similarity against variant phrases.
    Fuzzy,
    /// Keyword containment over an English translation of Krio text.
    TranslatedFallback,
    /// Nothing matched; the responder falls back to generic advice.
    Unmatched,
}

impl MatchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchSource::ExactKeyword => "EXACT_KEYWORD",
            MatchSource::Fuzzy => "FUZZY",
            MatchSource::TranslatedFallback => "TRANSLATED_FALLBACK",
            MatchSource::Unmatched => "UNMATCHED",
        }
    }
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved (or explicitly unresolved) symptom.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SymptomMatch {
    /// Canonical symptom key; `None` only when `source` is `Unmatched`.
    pub symptom_key: Option<String>,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    pub source: MatchSource,
    /// Variant phrase or key phrase that produced the match, for logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_phrase: Option<String>,
}

impl SymptomMatch {
    pub fn new(
        symptom_key: impl Into<String>,
        confidence: f64,
        source: MatchSource,
        matched_phrase: impl Into<String>,
    ) -> Self {
        Self {
            symptom_key: Some(symptom_key.into()),
            confidence: confidence.clamp(0.0, 1.0),
            source,
            matched_phrase: Some(matched_phrase.into()),
        }
    }

    /// The terminal "nothing matched" result.
    pub fn unmatched() -> Self {
        Self {
            symptom_key: None,
            confidence: 0.0,
            source: MatchSource::Unmatched,
            matched_phrase: None,
        }
    }

    pub fn is_unmatched(&self) -> bool {
        self.source == MatchSource::Unmatched || self.symptom_key.is_none()
    }

    pub fn key(&self) -> Option<&str> {
        self.symptom_key.as_deref()
    }
}
