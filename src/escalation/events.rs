//! # Escalation Events — SSE Feed for Health Workers
//!
//! Every step of a hand-off is published on a `tokio::sync::broadcast`
//! channel as an [`EscalationEvent`]. `GET /events` streams the channel to
//! the health-worker console; a messaging bridge can subscribe the same
//! way and deliver `Forwarded` reports to the `chat_id` they carry.
//!
//! ## Lifecycle
//!
//! ```text
//! Recorded → Forwarded × contacts → Assigned
//! ```
//!
//! ## Serialisation
//!
//! `#[serde(tag = "type")]` gives the console a discriminator:
//!
//! ```json
//! { "type": "Forwarded", "id": "uuid", "contact": "Aminata", "chat_id": "23276…@c.us", ... }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::core::EscalationLevel;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum EscalationEvent {
    /// A new escalation record exists (status pending).
    Recorded {
        id: Uuid,
        user_id: String,
        level: EscalationLevel,
        /// `urgent`, `high` or `normal`.
        priority: String,
        reason: String,
        created_at: DateTime<Utc>,
    },

    /// The formatted report addressed to one health worker.
    Forwarded {
        id: Uuid,
        contact: String,
        role: String,
        /// WhatsApp chat id (`<digits>@c.us`).
        chat_id: String,
        report: String,
    },

    /// Forwarding finished; the record is now assigned.
    Assigned {
        id: Uuid,
        notified_contacts: Vec<String>,
    },
}

impl EscalationEvent {
    pub fn escalation_id(&self) -> Uuid {
        match self {
            EscalationEvent::Recorded { id, .. }
            | EscalationEvent::Forwarded { id, .. }
            | EscalationEvent::Assigned { id, .. } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let id = Uuid::new_v4();
        let event = EscalationEvent::Assigned {
            id,
            notified_contacts: vec!["Aminata".into()],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Assigned");
        assert_eq!(json["notified_contacts"][0], "Aminata");
        assert_eq!(event.escalation_id(), id);
    }
}
