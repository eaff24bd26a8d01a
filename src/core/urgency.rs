//! # Urgency Tiers
//!
//! | Tier | Meaning | Banner (EN) |
//! |------|---------|-------------|
//! | [`Emergency`](UrgencyTier::Emergency) | life-threatening, escalate now | 🚨 EMERGENCY |
//! | [`Urgent`](UrgencyTier::Urgent) | seek care today | ⚠️ URGENT - Seek care today |
//! | [`Moderate`](UrgencyTier::Moderate) | monitor closely | 🔶 Moderate - Monitor closely |
//! | [`Routine`](UrgencyTier::Routine) | home care is enough | 🟢 Mild - Home care appropriate |
//!
//! Variants are declared from least to most urgent so the derived `Ord`
//! gives EMERGENCY > URGENT > MODERATE > ROUTINE.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::language::Language;

/// Urgency of a symptom, totally ordered by required response speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Routine,
    Moderate,
    Urgent,
    Emergency,
}

impl UrgencyTier {
    pub fn is_emergency(&self) -> bool {
        matches!(self, UrgencyTier::Emergency)
    }

    /// Emoji shown in front of the banner.
    pub fn emoji(&self) -> &'static str {
        match self {
            UrgencyTier::Emergency => "🚨",
            UrgencyTier::Urgent => "⚠️",
            UrgencyTier::Moderate => "🔶",
            UrgencyTier::Routine => "🟢",
        }
    }

    /// Banner label in the given language.
    pub fn label(&self, lang: Language) -> &'static str {
        match (self, lang) {
            (UrgencyTier::Emergency, Language::English) => "EMERGENCY",
            (UrgencyTier::Urgent, Language::English) => "URGENT - Seek care today",
            (UrgencyTier::Moderate, Language::English) => "Moderate - Monitor closely",
            (UrgencyTier::Routine, Language::English) => "Mild - Home care appropriate",
            (UrgencyTier::Emergency, Language::Krio) => "EMƐJƐNSI",
            (UrgencyTier::Urgent, Language::Krio) => "ƆJƐNT - Go si dɔkta tide",
            (UrgencyTier::Moderate, Language::Krio) => "Mɔdɛret - Wach am gud",
            (UrgencyTier::Routine, Language::Krio) => "Smɔl - Om kia go du",
        }
    }

    /// Full banner line, e.g. `🚨 **EMERGENCY**`.
    pub fn banner(&self, lang: Language) -> String {
        format!("{} **{}**", self.emoji(), self.label(lang))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyTier::Emergency => "emergency",
            UrgencyTier::Urgent => "urgent",
            UrgencyTier::Moderate => "moderate",
            UrgencyTier::Routine => "routine",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level attached to an escalation handed to health workers.
///
/// Coarser than [`UrgencyTier`]: MODERATE and ROUTINE both become `Normal`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscalationLevel {
    Emergency,
    Urgent,
    Normal,
}

impl EscalationLevel {
    /// Record priority stored with the escalation.
    pub fn priority(&self) -> &'static str {
        match self {
            EscalationLevel::Emergency => "urgent",
            EscalationLevel::Urgent => "high",
            EscalationLevel::Normal => "normal",
        }
    }

    /// Header of the report sent to health workers.
    pub fn report_header(&self) -> &'static str {
        match self {
            EscalationLevel::Emergency => "🚨 EMERGENCY",
            EscalationLevel::Urgent => "⚠️ URGENT",
            EscalationLevel::Normal => "📋 ESCALATION",
        }
    }
}

impl From<UrgencyTier> for EscalationLevel {
    fn from(tier: UrgencyTier) -> Self {
        match tier {
            UrgencyTier::Emergency => EscalationLevel::Emergency,
            UrgencyTier::Urgent => EscalationLevel::Urgent,
            UrgencyTier::Moderate | UrgencyTier::Routine => EscalationLevel::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_totally_ordered() {
        assert!(UrgencyTier::Emergency > UrgencyTier::Urgent);
        assert!(UrgencyTier::Urgent > UrgencyTier::Moderate);
        assert!(UrgencyTier::Moderate > UrgencyTier::Routine);
        let max = [UrgencyTier::Moderate, UrgencyTier::Emergency, UrgencyTier::Routine]
            .into_iter()
            .max();
        assert_eq!(max, Some(UrgencyTier::Emergency));
    }

    #[test]
    fn escalation_level_collapses_lower_tiers() {
        assert_eq!(EscalationLevel::from(UrgencyTier::Emergency), EscalationLevel::Emergency);
        assert_eq!(EscalationLevel::from(UrgencyTier::Urgent), EscalationLevel::Urgent);
        assert_eq!(EscalationLevel::from(UrgencyTier::Moderate), EscalationLevel::Normal);
        assert_eq!(EscalationLevel::from(UrgencyTier::Routine).priority(), "normal");
        assert_eq!(EscalationLevel::Emergency.priority(), "urgent");
    }

    #[test]
    fn tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UrgencyTier::Urgent).unwrap(), "\"urgent\"");
    }
}
