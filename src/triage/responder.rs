//! # Triage Responder — Bilingual Structured Answers
//!
//! Turns a [`SymptomMatch`] into a [`StructuredResponse`]: one
//! [`ResponseBlock`] per language, always rendered English first.
//!
//! | Match | Block content |
//! |-------|---------------|
//! | EMERGENCY symptom | banner + advice, nothing else |
//! | other symptom | banner + advice + home-care tips + follow-up questions |
//! | unmatched | generic advice (rest, fluids, monitor, offer facility lookup) |
//!
//! The emergency rule is enforced here as well as at lexicon load, so a
//! hand-built entry can never leak home-care text into an emergency.
//!
//! ## Chat Rendering
//!
//! ```text
//! 🔶 **Moderate - Monitor closely**
//!
//! For mild headache, rest and take paracetamol. ...
//!
//! **Home Care Tips:**
//! • Rest well
//!
//! ---
//! 🇸🇱 **Na Krio:**
//!
//! 🔶 **Mɔdɛret - Wach am gud**
//! ...
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::core::{Bilingual, Language, Lexicon, SymptomEntry, SymptomMatch, UrgencyTier};
use crate::escalation::report;

/// Separator placed between the English and Krio blocks.
const KRIO_SEPARATOR: &str = "\n---\n🇸🇱 **Na Krio:**\n\n";

/// What a response is answering.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ResponseKind {
    Symptom { key: String, urgency: UrgencyTier },
    Generic,
    Deflection,
    Handoff,
}

/// One language's half of a response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseBlock {
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    pub advice: String,
    pub home_care: Vec<String>,
    pub follow_up: Vec<String>,
    /// Extra paragraph appended after everything else.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ResponseBlock {
    fn plain(language: Language, advice: impl Into<String>) -> Self {
        Self {
            language,
            banner: None,
            advice: advice.into(),
            home_care: Vec::new(),
            follow_up: Vec::new(),
            notice: None,
        }
    }

    fn home_care_heading(&self) -> &'static str {
        match self.language {
            Language::English => "Home Care Tips:",
            Language::Krio => "Om Kia Tips:",
        }
    }

    fn follow_up_heading(&self) -> &'static str {
        match self.language {
            Language::English => "To help you better, can you tell me:",
            Language::Krio => "Fɔ ɛp yu bɛta, tɛl mi:",
        }
    }

    /// Chat text for this block.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(banner) = &self.banner {
            out.push_str(banner);
            out.push_str("\n\n");
        }
        out.push_str(&self.advice);
        out.push('\n');
        push_list(&mut out, self.home_care_heading(), &self.home_care);
        push_list(&mut out, self.follow_up_heading(), &self.follow_up);
        if let Some(notice) = &self.notice {
            out.push('\n');
            out.push_str(notice);
            out.push('\n');
        }
        out
    }
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n**{heading}**\n"));
    for item in items {
        out.push_str(&format!("• {item}\n"));
    }
}

/// A complete bilingual answer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StructuredResponse {
    pub kind: ResponseKind,
    /// Language the user appears to write in. Both blocks are always present.
    pub preferred_language: Language,
    pub english: ResponseBlock,
    pub krio: ResponseBlock,
}

impl StructuredResponse {
    fn from_pair(kind: ResponseKind, preferred: Language, text: Bilingual) -> Self {
        Self {
            kind,
            preferred_language: preferred,
            english: ResponseBlock::plain(Language::English, text.en),
            krio: ResponseBlock::plain(Language::Krio, text.kri),
        }
    }

    pub fn block(&self, lang: Language) -> &ResponseBlock {
        match lang {
            Language::English => &self.english,
            Language::Krio => &self.krio,
        }
    }

    /// Appends a bilingual notice to both blocks.
    pub fn with_notice(mut self, notice: Bilingual) -> Self {
        self.english.notice = Some(notice.en);
        self.krio.notice = Some(notice.kri);
        self
    }

    pub fn urgency(&self) -> Option<UrgencyTier> {
        match &self.kind {
            ResponseKind::Symptom { urgency, .. } => Some(*urgency),
            _ => None,
        }
    }

    pub fn has_home_care(&self) -> bool {
        !(self.english.home_care.is_empty() && self.krio.home_care.is_empty())
    }

    pub fn has_follow_up(&self) -> bool {
        !(self.english.follow_up.is_empty() && self.krio.follow_up.is_empty())
    }

    /// Chat text: English block, separator, Krio block.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for lang in Language::RENDER_ORDER {
            if lang == Language::Krio {
                out.push_str(KRIO_SEPARATOR);
            }
            out.push_str(&self.block(lang).render());
        }
        out
    }
}

/// Builds responses from lexicon entries.
#[derive(Clone)]
pub struct TriageResponder {
    lexicon: Arc<Lexicon>,
}

impl TriageResponder {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Response for a resolved (or unmatched) symptom.
    pub fn render(&self, symptom: &SymptomMatch, preferred: Language) -> StructuredResponse {
        let Some(key) = symptom.key() else {
            return self.generic_fallback(preferred);
        };
        match self.lexicon.get(key) {
            Some(entry) => self.render_entry(entry, preferred),
            None => {
                tracing::warn!(key, "Matched key missing from lexicon, using generic advice");
                self.generic_fallback(preferred)
            }
        }
    }

    pub fn render_entry(&self, entry: &SymptomEntry, preferred: Language) -> StructuredResponse {
        let block = |lang: Language| {
            let mut b = ResponseBlock::plain(lang, entry.advice.get(lang));
            b.banner = Some(entry.urgency.banner(lang));
            if !entry.urgency.is_emergency() {
                b.home_care = entry.home_care.get(lang).to_vec();
                b.follow_up = entry.follow_up.get(lang).to_vec();
            }
            b
        };
        StructuredResponse {
            kind: ResponseKind::Symptom {
                key: entry.key.clone(),
                urgency: entry.urgency,
            },
            preferred_language: preferred,
            english: block(Language::English),
            krio: block(Language::Krio),
        }
    }

    /// Advice used when no symptom could be identified.
    pub fn generic_fallback(&self, preferred: Language) -> StructuredResponse {
        let text = Bilingual::new(
            "I understand you're not feeling well.\n\n\
             **General Advice:**\n\
             • Rest and drink plenty of fluids\n\
             • Monitor your symptoms\n\
             • If symptoms worsen or persist for more than 2-3 days, please visit a health facility\n\n\
             Would you like me to help you find the nearest health facility?",
            "A ɔndastand se yu nɔ de fil fayn.\n\n\
             **Jɛnɛral Advays:**\n\
             • Res ɛn drink plenty wata\n\
             • Wach yu bɔdi\n\
             • If i wɔs ɔ pas 2-3 die, go na ɛlt fasɛliti\n\n\
             Yu want mek a ɛp yu fɛn di klozes ɛlt fasɛliti?",
        );
        StructuredResponse::from_pair(ResponseKind::Generic, preferred, text)
    }

    /// First-request answer: offer help before connecting to a person.
    pub fn deflection(&self, preferred: Language) -> StructuredResponse {
        StructuredResponse::from_pair(ResponseKind::Deflection, preferred, report::polite_decline())
    }

    /// Answer sent while an escalation is being handed to a health worker.
    pub fn handoff(&self, preferred: Language) -> StructuredResponse {
        StructuredResponse::from_pair(ResponseKind::Handoff, preferred, report::handoff_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LocalizedList, LocalizedText, MatchSource};

    fn responder() -> TriageResponder {
        TriageResponder::new(Arc::new(Lexicon::builtin().unwrap()))
    }

    fn matched(key: &str) -> SymptomMatch {
        SymptomMatch::new(key, 0.9, MatchSource::Fuzzy, key)
    }

    #[test]
    fn moderate_symptom_carries_care_content_in_both_languages() {
        let r = responder().render(&matched("headache"), Language::English);
        assert_eq!(r.urgency(), Some(UrgencyTier::Moderate));
        assert!(!r.english.home_care.is_empty());
        assert!(!r.krio.home_care.is_empty());
        assert!(r.has_follow_up());
        assert_eq!(r.english.banner.as_deref(), Some("🔶 **Moderate - Monitor closely**"));

        let text = r.to_text();
        assert!(text.contains("**Home Care Tips:**"));
        assert!(text.contains("**Om Kia Tips:**"));
        assert!(text.find("Home Care Tips").unwrap() < text.find("Na Krio").unwrap());
    }

    #[test]
    fn emergency_has_banner_and_advice_only() {
        let r = responder().render(&matched("difficulty_breathing"), Language::English);
        assert_eq!(r.urgency(), Some(UrgencyTier::Emergency));
        assert!(!r.has_home_care());
        assert!(!r.has_follow_up());
        assert!(r.english.banner.as_deref().unwrap().contains("EMERGENCY"));
        assert!(r.krio.banner.as_deref().unwrap().contains("EMƐJƐNSI"));
        assert!(!r.to_text().contains("Home Care Tips"));
    }

    #[test]
    fn emergency_rule_holds_even_for_inconsistent_entries() {
        let entry = SymptomEntry {
            key: "chest_pain".into(),
            urgency: UrgencyTier::Emergency,
            advice: LocalizedText { en: "Go to hospital".into(), kri: None },
            home_care: LocalizedList { en: vec!["Lie down".into()], kri: vec![] },
            follow_up: LocalizedList { en: vec!["Since when?".into()], kri: vec![] },
        };
        let r = responder().render_entry(&entry, Language::English);
        assert!(!r.has_home_care());
        assert!(!r.has_follow_up());
        // Krio advice falls back to English
        assert_eq!(r.krio.advice, "Go to hospital");
    }

    #[test]
    fn unmatched_gets_generic_advice() {
        let r = responder().render(&SymptomMatch::unmatched(), Language::English);
        assert_eq!(r.kind, ResponseKind::Generic);
        assert!(r.english.advice.contains("fluids"));
        assert!(r.english.advice.contains("nearest health facility"));
        assert!(r.krio.advice.contains("ɛlt fasɛliti"));
        assert!(r.english.banner.is_none());
    }

    #[test]
    fn unknown_key_falls_back_to_generic() {
        let r = responder().render(&matched("not_a_symptom"), Language::Krio);
        assert_eq!(r.kind, ResponseKind::Generic);
        assert_eq!(r.preferred_language, Language::Krio);
    }

    #[test]
    fn notice_is_rendered_after_care_content() {
        let r = responder()
            .render(&matched("cough"), Language::English)
            .with_notice(Bilingual::new("NOTICE-EN", "NOTICE-KRI"));
        let text = r.to_text();
        assert!(text.find("Home Care Tips").unwrap() < text.find("NOTICE-EN").unwrap());
        assert!(text.find("NOTICE-EN").unwrap() < text.find("NOTICE-KRI").unwrap());
    }

    #[test]
    fn kind_serializes_with_type_tag() {
        let r = responder().render(&matched("headache"), Language::English);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["kind"]["type"], "Symptom");
        assert_eq!(json["kind"]["urgency"], "moderate");
        assert_eq!(json["preferred_language"], "en");
    }
}
