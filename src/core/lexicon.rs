//! # Lexicon — Static Symptom Tables
//!
//! The [`Lexicon`] is the single source of symptom knowledge: one
//! [`SymptomEntry`] per canonical key (urgency, bilingual advice, home-care
//! tips, follow-up questions) plus the [`VariantPhrase`]s that the fuzzy
//! matcher compares user text against.
//!
//! ## Document Format
//!
//! The built-in tables live in `data/lexicon.json` and are embedded at
//! compile time. An operator may point `KAI_LEXICON_PATH` at another file
//! with the same shape:
//!
//! ```text
//! { "version": 3,
//!   "entries": [
//!     { "key": "headache", "urgency": "moderate",
//!       "advice":    { "en": "...", "kri": "..." },
//!       "home_care": { "en": ["..."], "kri": ["..."] },
//!       "follow_up": { "en": ["..."], "kri": ["..."] },
//!       "variants":  ["edek", "ed de wori", "headache"] } ] }
//! ```
//!
//! ## Load-time Validation
//!
//! | Check | Error |
//! |-------|-------|
//! | key appears twice | [`LexiconError::DuplicateKey`] |
//! | empty English advice | [`LexiconError::MissingEnglishAdvice`] |
//! | EMERGENCY entry with home care / follow-up | [`LexiconError::EmergencyCarriesCare`] |
//! | phrase listed under two keys | [`LexiconError::AmbiguousVariant`] |
//!
//! Any failure is fatal: the server refuses to start rather than triage
//! with a corrupt lexicon. Entry order in the document is the tie-break
//! order for every matcher.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::language::Language;
use super::urgency::UrgencyTier;
use crate::nlu::normalize;

/// Built-in lexicon document, embedded at compile time.
const BUILTIN_LEXICON: &str = include_str!("../../data/lexicon.json");

/// Configuration error raised while loading the lexicon.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("lexicon document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("lexicon has no entries")]
    Empty,
    #[error("duplicate symptom key `{0}`")]
    DuplicateKey(String),
    #[error("symptom `{0}` has no English advice")]
    MissingEnglishAdvice(String),
    #[error("emergency symptom `{0}` carries home-care or follow-up content")]
    EmergencyCarriesCare(String),
    #[error("variant `{phrase}` is mapped to both `{first}` and `{second}`")]
    AmbiguousVariant {
        phrase: String,
        first: String,
        second: String,
    },
    #[error("symptom `{0}` has an empty variant phrase")]
    EmptyVariant(String),
    #[error("variant `{phrase}` points at unknown symptom `{key}`")]
    UnknownSymptom { phrase: String, key: String },
}

/// Advice text: English is mandatory, Krio falls back to English when absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    #[serde(default)]
    pub kri: Option<String>,
}

impl LocalizedText {
    pub fn get(&self, lang: Language) -> &str {
        match lang {
            Language::English => &self.en,
            Language::Krio => self.kri.as_deref().unwrap_or(&self.en),
        }
    }
}

/// Ordered list of strings per language (home-care tips, follow-up questions).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedList {
    #[serde(default)]
    pub en: Vec<String>,
    #[serde(default)]
    pub kri: Vec<String>,
}

impl LocalizedList {
    pub fn get(&self, lang: Language) -> &[String] {
        match lang {
            Language::English => &self.en,
            Language::Krio => &self.kri,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.en.is_empty() && self.kri.is_empty()
    }
}

/// One canonical symptom and everything the responder needs to answer it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymptomEntry {
    /// Unique identifier, e.g. `high_fever`.
    pub key: String,
    /// Urgency tier of the symptom.
    pub urgency: UrgencyTier,
    /// Advice text per language.
    pub advice: LocalizedText,
    /// Home-care tips; always empty for EMERGENCY entries.
    #[serde(default)]
    pub home_care: LocalizedList,
    /// Clarifying questions; always empty for EMERGENCY entries.
    #[serde(default)]
    pub follow_up: LocalizedList,
}

impl SymptomEntry {
    /// Symptom key as plain words (`high_fever` → `high fever`), used by keyword scans.
    pub fn key_phrase(&self) -> String {
        self.key.replace('_', " ")
    }
}

/// A literal spelling (English or Krio) that points at one symptom key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VariantPhrase {
    /// Normalised phrase (NFC, lower-case, single spaces).
    pub phrase: String,
    /// Key of the [`SymptomEntry`] this phrase resolves to.
    pub symptom_key: String,
}

/// Raw document entry: a symptom plus its variant phrases.
#[derive(Deserialize)]
struct DocumentEntry {
    #[serde(flatten)]
    entry: SymptomEntry,
    #[serde(default)]
    variants: Vec<String>,
}

#[derive(Deserialize)]
struct LexiconDocument {
    #[serde(default)]
    version: u32,
    entries: Vec<DocumentEntry>,
}

/// Validated, read-only symptom tables.
///
/// Shared behind an `Arc`; nothing mutates it after [`Lexicon::from_parts`]
/// returns, so any number of readers may use it concurrently.
#[derive(Debug)]
pub struct Lexicon {
    version: u32,
    entries: Vec<SymptomEntry>,
    index: HashMap<String, usize>,
    variants: Vec<VariantPhrase>,
}

impl Lexicon {
    /// Loads the lexicon embedded in the binary.
    pub fn builtin() -> Result<Self, LexiconError> {
        Self::from_json(BUILTIN_LEXICON)
    }

    /// Parses and validates a lexicon document.
    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        let doc: LexiconDocument = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(doc.entries.len());
        let mut variants = Vec::new();
        for DocumentEntry { entry, variants: phrases } in doc.entries {
            for phrase in phrases {
                variants.push(VariantPhrase {
                    phrase,
                    symptom_key: entry.key.clone(),
                });
            }
            entries.push(entry);
        }
        let mut lexicon = Self::from_parts(entries, variants)?;
        lexicon.version = doc.version;
        Ok(lexicon)
    }

    /// Validates entries and variants and builds the lookup index.
    pub fn from_parts(
        entries: Vec<SymptomEntry>,
        variants: Vec<VariantPhrase>,
    ) -> Result<Self, LexiconError> {
        if entries.is_empty() {
            return Err(LexiconError::Empty);
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.key.clone(), i).is_some() {
                return Err(LexiconError::DuplicateKey(entry.key.clone()));
            }
            if entry.advice.en.trim().is_empty() {
                return Err(LexiconError::MissingEnglishAdvice(entry.key.clone()));
            }
            if entry.urgency.is_emergency()
                && !(entry.home_care.is_empty() && entry.follow_up.is_empty())
            {
                return Err(LexiconError::EmergencyCarriesCare(entry.key.clone()));
            }
        }

        let mut owner: HashMap<String, String> = HashMap::new();
        let mut accepted = Vec::with_capacity(variants.len());
        for variant in variants {
            if !index.contains_key(&variant.symptom_key) {
                return Err(LexiconError::UnknownSymptom {
                    phrase: variant.phrase,
                    key: variant.symptom_key,
                });
            }
            let phrase = normalize(&variant.phrase);
            if phrase.is_empty() {
                return Err(LexiconError::EmptyVariant(variant.symptom_key));
            }
            match owner.get(&phrase) {
                Some(first) if *first != variant.symptom_key => {
                    return Err(LexiconError::AmbiguousVariant {
                        phrase,
                        first: first.clone(),
                        second: variant.symptom_key,
                    });
                }
                Some(_) => {
                    tracing::warn!(phrase = %phrase, key = %variant.symptom_key, "Duplicate variant phrase ignored");
                    continue;
                }
                None => {
                    owner.insert(phrase.clone(), variant.symptom_key.clone());
                }
            }
            accepted.push(VariantPhrase {
                phrase,
                symptom_key: variant.symptom_key,
            });
        }

        Ok(Self {
            version: 0,
            entries,
            index,
            variants: accepted,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// All entries in document order.
    pub fn entries(&self) -> &[SymptomEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&SymptomEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Urgency tier of a key, if the key exists.
    pub fn urgency_of(&self, key: &str) -> Option<UrgencyTier> {
        self.get(key).map(|e| e.urgency)
    }

    /// All variant phrases in document order (the matcher's iteration order).
    pub fn variants(&self) -> &[VariantPhrase] {
        &self.variants
    }

    /// Variant phrases the fuzzy matcher may score, in document order.
    ///
    /// EMERGENCY phrases are left out: short replies are contained in long
    /// emergency phrases (`hi` in `breathing hard`) and would escalate.
    /// Emergencies resolve only through the keyword scan.
    pub fn fuzzy_variants(&self) -> impl Iterator<Item = &VariantPhrase> {
        self.variants.iter().filter(move |v| {
            !self
                .urgency_of(&v.symptom_key)
                .is_some_and(|u| u.is_emergency())
        })
    }

    pub fn variants_for(&self, key: &str) -> Vec<&VariantPhrase> {
        self.variants
            .iter()
            .filter(|v| v.symptom_key == key)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
