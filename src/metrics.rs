//! # Triage Metrics — In-process Counters
//!
//! Counts what the engine decided, for the console and `GET /metrics`.
//! Nothing here is persisted; counters restart with the process.
//!
//! | Counter | Incremented when |
//! |---------|------------------|
//! | `messages` | a message is triaged |
//! | `intents[name]` | the intent classifier tags a message (per-intent hit count) |
//! | `match_sources[source]` | the resolver finishes, keyed by its match source |
//! | `emergencies` | an EMERGENCY symptom bypasses the tracker |
//! | `deflections` | a first escalation request is answered with guidance |
//! | `escalations_requested` | a triage outcome says `escalate = true` |
//! | `escalations_recorded` | record + notify both succeeded |
//! | `escalations_failed` | record or notify failed |
//!
//! A single `parking_lot::Mutex` guards all counters; each update is a few
//! increments and is never held across an `.await`.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde::Serialize;

use crate::core::MatchSource;

/// Serializable copy of every counter.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub messages: u64,
    pub intents: BTreeMap<String, u64>,
    pub match_sources: BTreeMap<String, u64>,
    pub emergencies: u64,
    pub deflections: u64,
    pub escalations_requested: u64,
    pub escalations_recorded: u64,
    pub escalations_failed: u64,
}

impl MetricsSnapshot {
    /// One-line summary shown under each console answer.
    ///
    /// Format: `"12ms | 42 msgs | 3 emergencies | 5 deflections | escalations 4/1 failed"`
    pub fn summary_line(&self, elapsed_ms: u64) -> String {
        format!(
            "{}ms | {} msgs | {} emergencies | {} deflections | escalations {}/{} failed",
            elapsed_ms,
            self.messages,
            self.emergencies,
            self.deflections,
            self.escalations_recorded,
            self.escalations_failed,
        )
    }

    /// Hit count of one intent.
    pub fn intent_hits(&self, intent: &str) -> u64 {
        self.intents.get(intent).copied().unwrap_or(0)
    }
}

#[derive(Default)]
pub struct TriageMetrics {
    inner: Mutex<MetricsSnapshot>,
}

impl TriageMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_triage(&self, intent: &str, source: MatchSource) {
        let mut m = self.inner.lock();
        m.messages += 1;
        *m.intents.entry(intent.to_string()).or_default() += 1;
        *m.match_sources.entry(source.as_str().to_string()).or_default() += 1;
    }

    pub fn record_emergency(&self) {
        self.inner.lock().emergencies += 1;
    }

    pub fn record_deflection(&self) {
        self.inner.lock().deflections += 1;
    }

    pub fn record_escalation_requested(&self) {
        self.inner.lock().escalations_requested += 1;
    }

    pub fn record_escalation_result(&self, ok: bool) {
        let mut m = self.inner.lock();
        if ok {
            m.escalations_recorded += 1;
        } else {
            m.escalations_failed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().clone()
    }
}
