//! # Language — English and Krio
//!
//! Kai always answers in both languages. [`Language`] identifies one side
//! of a response; [`Bilingual`] carries a fixed pair of strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A language the engine understands and renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    /// English (`en`).
    #[serde(rename = "en")]
    English,
    /// Krio, Sierra Leone Creole (`kri`).
    #[serde(rename = "kri")]
    Krio,
}

impl Language {
    /// Fixed rendering order of a bilingual response: English first, then Krio.
    pub const RENDER_ORDER: [Language; 2] = [Language::English, Language::Krio];

    /// ISO-style code used on the wire (translation API, JSON).
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Krio => "kri",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A pair of texts, one per language.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilingual {
    /// English text.
    pub en: String,
    /// Krio text.
    pub kri: String,
}

impl Bilingual {
    pub fn new(en: impl Into<String>, kri: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            kri: kri.into(),
        }
    }

    /// Text for one side of the pair.
    pub fn get(&self, lang: Language) -> &str {
        match lang {
            Language::English => &self.en,
            Language::Krio => &self.kri,
        }
    }

    /// Plain chat rendering: English, then the Krio
    /// version under a flag marker.
    pub fn to_text(&self) -> String {
        format!("{}\n\n---\n🇸🇱 Na Krio:\n{}", self.en, self.kri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip_through_serde() {
        let json = serde_json::to_string(&Language::Krio).unwrap();
        assert_eq!(json, "\"kri\"");
        let back: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(back, Language::English);
    }

    #[test]
    fn bilingual_text_puts_english_first() {
        let b = Bilingual::new("Rest well", "Res gud gud");
        let text = b.to_text();
        assert!(text.find("Rest well").unwrap() < text.find("Res gud gud").unwrap());
        assert_eq!(b.get(Language::Krio), "Res gud gud");
    }
}
