//! # Escalation Sink — Recording and Forwarding Hand-offs
//!
//! The engine decides *that* a conversation must reach a human; an
//! [`EscalationSink`] decides *how*. It is consumed through two calls:
//!
//! ```text
//! record(user, reason, tier, latest) ──► EscalationId   (status: pending)
//! notify(id) ──► forwarded report per contact ──► contact names (status: assigned)
//! ```
//!
//! [`InMemoryEscalationSink`] keeps records for the lifetime of the process
//! and forwards each formatted report on the [`EscalationEvent`] broadcast
//! feed, addressed to the contact's WhatsApp chat id. The messaging bridge
//! and the health-worker console both subscribe to that feed. With no
//! contacts configured, or nobody listening, `notify` fails and the record
//! stays pending.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::EscalationEvent;
use super::report::format_escalation_report;
use super::EscalationError;
use crate::core::{Clock, EscalationLevel, UrgencyTier};

pub type EscalationId = Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EscalationStatus {
    Pending,
    Assigned,
}

#[derive(Clone, Debug, Serialize)]
pub struct EscalationRecord {
    pub id: EscalationId,
    pub user_id: String,
    pub reason: String,
    pub urgency_tier: UrgencyTier,
    pub level: EscalationLevel,
    pub latest_message: String,
    pub status: EscalationStatus,
    pub created_at: DateTime<Utc>,
    /// Names of the contacts the report reached.
    pub notified_contacts: Vec<String>,
}

/// A health worker who receives escalation reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthWorkerContact {
    pub name: String,
    pub phone: String,
    pub role: String,
}

impl HealthWorkerContact {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.phone
        } else {
            &self.name
        }
    }
}

/// Where escalations go once the engine has decided to escalate.
#[async_trait]
pub trait EscalationSink: Send + Sync {
    async fn record(
        &self,
        user_id: &str,
        reason: &str,
        urgency_tier: UrgencyTier,
        latest_message: &str,
    ) -> Result<EscalationId, EscalationError>;

    /// Forwards a recorded escalation. Returns the contacts reached.
    async fn notify(&self, id: EscalationId) -> Result<Vec<String>, EscalationError>;
}

pub struct InMemoryEscalationSink {
    records: RwLock<Vec<EscalationRecord>>,
    contacts: Vec<HealthWorkerContact>,
    events: broadcast::Sender<EscalationEvent>,
    clock: Arc<dyn Clock>,
    non_digit: Regex,
}

impl InMemoryEscalationSink {
    pub fn new(
        contacts: Vec<HealthWorkerContact>,
        events: broadcast::Sender<EscalationEvent>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            contacts,
            events,
            clock,
            non_digit: Regex::new(r"[^\d]").expect("invalid regex"),
        }
    }

    pub fn contacts(&self) -> &[HealthWorkerContact] {
        &self.contacts
    }

    /// Snapshot of every record, oldest first.
    pub fn records(&self) -> Vec<EscalationRecord> {
        self.records.read().clone()
    }

    pub fn get(&self, id: EscalationId) -> Option<EscalationRecord> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    /// WhatsApp chat id for a phone number: digits only, `@c.us` suffix.
    pub fn chat_id(&self, phone: &str) -> String {
        format!("{}@c.us", self.non_digit.replace_all(phone, ""))
    }
}

#[async_trait]
impl EscalationSink for InMemoryEscalationSink {
    async fn record(
        &self,
        user_id: &str,
        reason: &str,
        urgency_tier: UrgencyTier,
        latest_message: &str,
    ) -> Result<EscalationId, EscalationError> {
        if user_id.trim().is_empty() {
            return Err(EscalationError::Record {
                user_id: user_id.to_string(),
                reason: "missing user id".to_string(),
            });
        }

        let level = EscalationLevel::from(urgency_tier);
        let record = EscalationRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            reason: reason.to_string(),
            urgency_tier,
            level,
            latest_message: latest_message.to_string(),
            status: EscalationStatus::Pending,
            created_at: self.clock.now(),
            notified_contacts: Vec::new(),
        };
        let id = record.id;

        let _ = self.events.send(EscalationEvent::Recorded {
            id,
            user_id: record.user_id.clone(),
            level,
            priority: level.priority().to_string(),
            reason: record.reason.clone(),
            created_at: record.created_at,
        });
        self.records.write().push(record);

        tracing::info!(escalation_id = %id, user_id, priority = level.priority(), "Escalation recorded");
        Ok(id)
    }

    async fn notify(&self, id: EscalationId) -> Result<Vec<String>, EscalationError> {
        if self.contacts.is_empty() {
            tracing::warn!(escalation_id = %id, "No health-worker contacts configured");
            return Err(EscalationError::NoHealthWorkers);
        }
        let record = self.get(id).ok_or(EscalationError::UnknownEscalation(id))?;
        let report = format_escalation_report(&record);

        let mut notified = Vec::new();
        for contact in &self.contacts {
            let event = EscalationEvent::Forwarded {
                id,
                contact: contact.display_name().to_string(),
                role: contact.role.clone(),
                chat_id: self.chat_id(&contact.phone),
                report: report.clone(),
            };
            match self.events.send(event) {
                Ok(_) => {
                    tracing::info!(escalation_id = %id, worker = contact.display_name(), "Escalation forwarded to health worker");
                    notified.push(contact.display_name().to_string());
                }
                Err(_) => {
                    tracing::error!(escalation_id = %id, worker = contact.display_name(), "Nobody is listening for escalation reports");
                }
            }
        }

        if notified.is_empty() {
            return Err(EscalationError::Notify {
                id,
                reason: "no health-worker channel is listening".to_string(),
            });
        }

        if let Some(r) = self.records.write().iter_mut().find(|r| r.id == id) {
            r.status = EscalationStatus::Assigned;
            r.notified_contacts = notified.clone();
        }
        let _ = self.events.send(EscalationEvent::Assigned {
            id,
            notified_contacts: notified.clone(),
        });
        Ok(notified)
    }
}
