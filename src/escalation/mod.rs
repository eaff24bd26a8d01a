//! # Escalation — Handing a Conversation to a Health Worker
//!
//! ```text
//! message ──► phrases::is_explicit_request?
//!                │ yes
//!                ▼
//!        EscalationTracker (per user, 30 min window)
//!          NONE ──► REQUESTED_ONCE ──► INSISTING
//!          "offer guidance"         "escalate now"
//!                                        │
//!                                        ▼
//!                      EscalationSink::record ──► notify
//!                                        │ ok
//!                                        ▼
//!                                tracker.reset(user)
//! ```
//!
//! EMERGENCY symptoms never enter the tracker; the engine escalates them
//! on a separate path. The tracker never resets itself on "escalate now":
//! only a successful record + notify does, so a failed hand-off can be
//! retried without the user insisting again.

/// Sub-module with the events published at each hand-off step.
pub mod events;

/// Sub-module with the explicit-request phrase list.
pub mod phrases;

/// Sub-module with user-facing and health-worker-facing texts.
pub mod report;

/// Sub-module with the [`EscalationSink`] collaborator and its in-memory implementation.
pub mod sink;

/// Sub-module with the per-user insistence state machine.
pub mod tracker;

use thiserror::Error;
use uuid::Uuid;

pub use events::EscalationEvent;
pub use sink::{
    EscalationId, EscalationRecord, EscalationSink, EscalationStatus, HealthWorkerContact,
    InMemoryEscalationSink,
};
pub use tracker::{EscalationDecision, EscalationTracker, TrackerState};

/// Failure to hand an escalation over. Tracker state is left untouched.
#[derive(Debug, Error)]
pub enum EscalationError {
    #[error("could not record escalation for `{user_id}`: {reason}")]
    Record { user_id: String, reason: String },
    #[error("escalation {0} does not exist")]
    UnknownEscalation(Uuid),
    #[error("no health-worker contacts are configured")]
    NoHealthWorkers,
    #[error("could not notify health workers about escalation {id}: {reason}")]
    Notify { id: Uuid, reason: String },
}
