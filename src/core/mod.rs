//! # Core Module — Fundamental Domain Types
//!
//! This module groups the **fundamental types** the whole triage engine is
//! built on. Every other layer (NLU, triage, escalation, web) speaks in
//! terms of these types:
//!
//! - [`Language`] / [`Bilingual`]: English and Krio, the two languages
//!   every response is rendered in
//! - [`UrgencyTier`]: EMERGENCY > URGENT > MODERATE > ROUTINE
//! - [`EscalationLevel`]: the coarser level a health worker sees
//! - [`SymptomEntry`] / [`VariantPhrase`] / [`Lexicon`]: the static symptom tables
//! - [`SymptomMatch`] / [`MatchSource`]: the per-message resolution result
//! - [`Clock`]: injected time source (real clock or manual test clock)
//!
//! ## Data Flow
//!
//! ```text
//! data/lexicon.json ──load──► Lexicon (Arc, read-only)
//!                                │
//!          message text ──► SymptomMatch ──► StructuredResponse
//! ```

/// Sub-module with [`Language`] and [`Bilingual`].
pub mod language;

/// Sub-module with [`UrgencyTier`] and [`EscalationLevel`].
pub mod urgency;

/// Sub-module with the symptom tables and their load-time validation.
pub mod lexicon;

/// Sub-module with [`SymptomMatch`] and [`MatchSource`].
pub mod symptom;

/// Sub-module with the [`Clock`] abstraction.
pub mod clock;

// Re-exports so callers can write `crate::core::Lexicon` directly.
pub use clock::{Clock, ManualClock, SystemClock};
pub use language::{Bilingual, Language};
pub use lexicon::{Lexicon, LexiconError, LocalizedList, LocalizedText, SymptomEntry, VariantPhrase};
pub use symptom::{MatchSource, SymptomMatch};
pub use urgency::{EscalationLevel, UrgencyTier};
