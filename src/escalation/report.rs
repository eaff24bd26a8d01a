//! Escalation texts: the report health workers receive and the bilingual
//! messages the user sees around a hand-off.

use crate::core::{Bilingual, EscalationLevel};

use super::sink::EscalationRecord;

/// Report forwarded to every health-worker contact.
pub fn format_escalation_report(record: &EscalationRecord) -> String {
    format!(
        "{header} REPORT\n\
         \n\
         👤 User: {user}\n\
         🕐 Time: {time}\n\
         🔖 Priority: {priority}\n\
         \n\
         📝 REASON:\n\
         {reason}\n\
         \n\
         ⚠️ LATEST MESSAGE:\n\
         \"{latest}\"\n\
         \n\
         ---\n\
         Please respond to this user at: {user}",
        header = record.level.report_header(),
        user = record.user_id,
        time = record.created_at.to_rfc3339(),
        priority = record.level.priority(),
        reason = record.reason,
        latest = record.latest_message,
    )
}

/// What the user is told once the escalation has reached a health worker.
pub fn confirmation_message(level: EscalationLevel) -> Bilingual {
    match level {
        EscalationLevel::Emergency => Bilingual::new(
            "🚨 EMERGENCY ESCALATED\n\n\
             Your case has been flagged as an emergency and sent to our health workers immediately. \
             Someone will contact you very soon.\n\n\
             In the meantime, if this is a life-threatening emergency, please also go to the nearest \
             health facility or call emergency services.",
            "Yu kes dɔn go na ɛlt wɔka dɛm. Dɛn go kɔl yu kwik kwik. \
             If i siryɔs bad, go na ɔspitul naw naw!",
        ),
        EscalationLevel::Urgent => Bilingual::new(
            "⚠️ CASE ESCALATED\n\n\
             Your case has been escalated to a health worker. Someone will contact you shortly on this number.\n\n\
             Please keep your phone nearby.",
            "Yu kes dɔn go na ɛlt wɔka. Dɛn go kɔl yu sun sun. Kip yu fon klos tu yu.",
        ),
        EscalationLevel::Normal => Bilingual::new(
            "✅ REQUEST RECEIVED\n\n\
             Your request has been forwarded to a health worker. Someone will contact you soon.\n\n\
             Thank you for your patience.",
            "Yu rikwest dɔn go na ɛlt wɔka. Dɛn go kɔl yu. Tenki fɔ pesɛns.",
        ),
    }
}

/// First-request answer: try to help before connecting to a person.
pub fn polite_decline() -> Bilingual {
    Bilingual::new(
        "I understand you'd like to speak to someone. Before I connect you, let me try to help you directly.\n\n\
         Could you tell me more about what you need? I can assist with:\n\
         • Health questions and symptom guidance\n\
         • Finding health facilities near you\n\
         • Information about diseases and prevention\n\
         • Current health alerts\n\n\
         If you still prefer to speak to a human health worker, just let me know and I'll connect you right away.",
        "A ɔndastand se yu want tok to pɔsin. Mek a tray ɛp yu fɔs.\n\n\
         Tɛl mi wetin yu nid? A go fit ɛp yu wit:\n\
         • Ɛlt kwɛshɔn dɛm\n\
         • Fɛn klinik klos tu yu\n\
         • Infɔmeshɔn abawt sik\n\n\
         If yu stil want tok to ɛlt wɔka, jɔs tɛl mi ɛn a go kɔnɛkt yu.",
    )
}

/// Short version of [`polite_decline`], appended under symptom advice.
pub fn guidance_offer() -> Bilingual {
    Bilingual::new(
        "If you still prefer to speak to a human health worker, just let me know and I'll connect you right away.",
        "If yu stil want tok to ɛlt wɔka, jɔs tɛl mi ɛn a go kɔnɛkt yu.",
    )
}

/// Sent while the conversation is being handed to a health worker.
pub fn handoff_message() -> Bilingual {
    Bilingual::new(
        "I'm connecting you with a health worker now. Please stay on this chat.",
        "A de kɔnɛkt yu wit ɛlt wɔka naw. Duya, wet na dis chat.",
    )
}

/// Sent when recording or forwarding the escalation failed.
pub fn connection_failed() -> Bilingual {
    Bilingual::new(
        "I apologize, but I could not connect you with a health worker right now. \
         Please try again in a moment, or go to your nearest health facility directly.",
        "Sɔri, a nɔ ebul kɔnɛkt yu wit ɛlt wɔka naw. \
         Tray bak smɔl tɛm, ɔ go na di ɛlt fasɛliti we de nia yu.",
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::core::UrgencyTier;
    use crate::escalation::EscalationStatus;

    fn record(tier: UrgencyTier) -> EscalationRecord {
        EscalationRecord {
            id: Uuid::new_v4(),
            user_id: "23276123456".into(),
            reason: "Emergency symptom detected: difficulty_breathing".into(),
            urgency_tier: tier,
            level: tier.into(),
            latest_message: "I can't breathe".into(),
            status: EscalationStatus::Pending,
            created_at: Utc::now(),
            notified_contacts: vec![],
        }
    }

    #[test]
    fn report_carries_header_reason_and_reply_line() {
        let text = format_escalation_report(&record(UrgencyTier::Emergency));
        assert!(text.starts_with("🚨 EMERGENCY REPORT"));
        assert!(text.contains("difficulty_breathing"));
        assert!(text.contains("\"I can't breathe\""));
        assert!(text.contains("🔖 Priority: urgent"));
        assert!(text.ends_with("Please respond to this user at: 23276123456"));
    }

    #[test]
    fn lower_tiers_use_generic_header() {
        let text = format_escalation_report(&record(UrgencyTier::Moderate));
        assert!(text.starts_with("📋 ESCALATION REPORT"));
        assert!(text.contains("Priority: normal"));
    }

    #[test]
    fn confirmation_depends_on_level() {
        assert!(confirmation_message(EscalationLevel::Emergency).en.contains("EMERGENCY ESCALATED"));
        assert!(confirmation_message(EscalationLevel::Urgent).en.contains("CASE ESCALATED"));
        assert!(confirmation_message(EscalationLevel::Normal).en.contains("REQUEST RECEIVED"));
    }

    #[test]
    fn every_message_is_bilingual() {
        for b in [polite_decline(), guidance_offer(), handoff_message(), connection_failed()] {
            assert!(!b.en.is_empty());
            assert!(!b.kri.is_empty());
            assert_ne!(b.en, b.kri);
        }
    }
}
