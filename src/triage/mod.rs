//! # Triage — Symptom Resolution and Bilingual Answers
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`resolver`] | fuzzy → translation → keyword scan → unmatched |
//! | [`responder`] | urgency-gated bilingual [`StructuredResponse`] |

/// Sub-module with the [`SymptomResolver`].
pub mod resolver;

/// Sub-module with the [`TriageResponder`] and response types.
pub mod responder;

pub use resolver::{SymptomResolver, DEFAULT_TRANSLATION_TIMEOUT};
pub use responder::{ResponseBlock, ResponseKind, StructuredResponse, TriageResponder};
