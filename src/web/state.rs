//! # Application State
//!
//! ```text
//! AppState (Clone, one per handler call)
//!  ├── engine     Arc<TriageEngine>             triage + escalation decisions
//!  ├── sink       Arc<InMemoryEscalationSink>   records for GET /escalations
//!  └── events_tx  Arc<broadcast::Sender<_>>     SSE feed for health workers
//! ```
//!
//! The engine holds the same sink behind `Arc<dyn EscalationSink>`; the
//! concrete handle here is only for listing records.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::escalation::{EscalationEvent, InMemoryEscalationSink};
use crate::orchestrator::TriageEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TriageEngine>,
    pub sink: Arc<InMemoryEscalationSink>,
    pub events_tx: Arc<broadcast::Sender<EscalationEvent>>,
}
