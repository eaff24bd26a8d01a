//! # Orchestrator — The Triage Engine
//!
//! [`TriageEngine`] drives one message through every subsystem and decides
//! whether the conversation must reach a human.
//!
//! ## One Message
//!
//! ```text
//! user message
//!   │
//!   ├── 1. IntentClassifier::classify        (informational, counted)
//!   ├── 2. SymptomResolver::resolve          (fuzzy → translate → keyword)
//!   ├── 3. preferred language                (Krio markers ≥ 2 → Krio)
//!   │
//!   ├── 4. EMERGENCY symptom?  ── yes ──► emergency response, escalate = true
//!   │        │ no                          (tracker untouched)
//!   ├── 5. explicit request?   ── yes ──► EscalationTracker::register_request
//!   │        │ no                            ├── OfferGuidance → answer + offer, escalate = false
//!   │        │                               └── EscalateNow   → hand-off text, escalate = true
//!   └── 6. symptom advice or generic fallback, escalate = false
//! ```
//!
//! `triage` only *decides*. The caller acts on `escalate = true` with
//! [`TriageEngine::escalate`], which records, notifies and, only when both
//! succeed, resets the user's tracker state.
//!
//! ## Concurrency
//!
//! The engine is `Send + Sync` and shared as `Arc<TriageEngine>`. The only
//! per-user mutable state is the tracker, whose updates are atomic per user.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Bilingual, Clock, EscalationLevel, Language, Lexicon, SymptomMatch, UrgencyTier};
use crate::escalation::phrases;
use crate::escalation::report;
use crate::escalation::tracker::DEFAULT_WINDOW_MINUTES;
use crate::escalation::{
    EscalationDecision, EscalationError, EscalationId, EscalationSink, EscalationTracker, TrackerState,
};
use crate::metrics::TriageMetrics;
use crate::nlu::intent::{IntentClassifier, IntentResult};
use crate::nlu::krio::is_likely_krio;
use crate::translate::Translator;
use crate::triage::{StructuredResponse, SymptomResolver, TriageResponder, DEFAULT_TRANSLATION_TIMEOUT};

/// Tunables read from configuration.
#[derive(Clone, Copy, Debug)]
pub struct EngineSettings {
    pub translation_timeout: Duration,
    pub escalation_window: chrono::Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            translation_timeout: DEFAULT_TRANSLATION_TIMEOUT,
            escalation_window: chrono::Duration::minutes(DEFAULT_WINDOW_MINUTES),
        }
    }
}

/// Everything the engine decided about one message.
#[derive(Clone, Debug, Serialize)]
pub struct TriageOutcome {
    pub response: StructuredResponse,
    pub escalate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_tier: Option<UrgencyTier>,
    pub symptom: SymptomMatch,
    pub intent: IntentResult,
    /// Tracker state for this user after the message.
    pub tracker_state: TrackerState,
    /// Language the user appears to write in.
    pub language: Language,
}

impl TriageOutcome {
    /// The request to hand to [`TriageEngine::escalate`], when one is due.
    pub fn escalation_request(&self, latest_message: &str) -> Option<EscalationRequest> {
        if !self.escalate {
            return None;
        }
        Some(EscalationRequest {
            reason: self
                .escalation_reason
                .clone()
                .unwrap_or_else(|| "Escalation requested".to_string()),
            urgency_tier: self.urgency_tier.unwrap_or(UrgencyTier::Routine),
            latest_message: latest_message.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EscalationRequest {
    pub reason: String,
    pub urgency_tier: UrgencyTier,
    pub latest_message: String,
}

/// Proof that a health worker was reached.
#[derive(Clone, Debug, Serialize)]
pub struct EscalationReceipt {
    pub id: EscalationId,
    pub level: EscalationLevel,
    pub notified_contacts: Vec<String>,
    /// What the user is told.
    pub confirmation: Bilingual,
}

pub struct TriageEngine {
    lexicon: Arc<Lexicon>,
    classifier: IntentClassifier,
    resolver: SymptomResolver,
    responder: TriageResponder,
    tracker: EscalationTracker,
    sink: Arc<dyn EscalationSink>,
    metrics: TriageMetrics,
}

impl TriageEngine {
    pub fn new(
        lexicon: Arc<Lexicon>,
        translator: Arc<dyn Translator>,
        sink: Arc<dyn EscalationSink>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            resolver: SymptomResolver::new(lexicon.clone(), translator, settings.translation_timeout),
            responder: TriageResponder::new(lexicon.clone()),
            tracker: EscalationTracker::new(settings.escalation_window, clock),
            lexicon,
            sink,
            metrics: TriageMetrics::new(),
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn tracker(&self) -> &EscalationTracker {
        &self.tracker
    }

    pub fn metrics(&self) -> &TriageMetrics {
        &self.metrics
    }

    pub fn classify_intent(&self, text: &str) -> IntentResult {
        self.classifier.classify(text)
    }

    /// Triages one message. Never fails.
    pub async fn triage(&self, user_id: &str, text: &str) -> TriageOutcome {
        let intent = self.classifier.classify(text);
        let symptom = self.resolver.resolve(text, None).await;
        let language = if is_likely_krio(text) { Language::Krio } else { Language::English };
        self.metrics.record_triage(&intent.intent, symptom.source);

        let urgency = symptom.key().and_then(|k| self.lexicon.urgency_of(k));

        let outcome = if urgency == Some(UrgencyTier::Emergency) {
            self.emergency_bypass(user_id, symptom, intent, language)
        } else if phrases::is_explicit_request(text) {
            self.explicit_request(user_id, symptom, urgency, intent, language)
        } else {
            TriageOutcome {
                response: self.responder.render(&symptom, language),
                escalate: false,
                escalation_reason: None,
                urgency_tier: urgency,
                tracker_state: self.tracker.state(user_id),
                symptom,
                intent,
                language,
            }
        };

        if outcome.escalate {
            self.metrics.record_escalation_requested();
        }
        tracing::info!(
            user_id,
            intent = %outcome.intent.intent,
            symptom = outcome.symptom.key().unwrap_or("-"),
            source = %outcome.symptom.source,
            escalate = outcome.escalate,
            "Message triaged"
        );
        outcome
    }

    /// EMERGENCY: escalate immediately, without deflection or tracker state.
    fn emergency_bypass(
        &self,
        user_id: &str,
        symptom: SymptomMatch,
        intent: IntentResult,
        language: Language,
    ) -> TriageOutcome {
        let key = symptom.key().unwrap_or_default().to_string();
        self.metrics.record_emergency();
        tracing::warn!(user_id, symptom = %key, "Emergency symptom, bypassing escalation tracker");
        TriageOutcome {
            response: self.responder.render(&symptom, language),
            escalate: true,
            escalation_reason: Some(format!("Emergency symptom detected: {key}")),
            urgency_tier: Some(UrgencyTier::Emergency),
            tracker_state: self.tracker.state(user_id),
            symptom,
            intent,
            language,
        }
    }

    fn explicit_request(
        &self,
        user_id: &str,
        symptom: SymptomMatch,
        urgency: Option<UrgencyTier>,
        intent: IntentResult,
        language: Language,
    ) -> TriageOutcome {
        let decision = self.tracker.register_request(user_id);
        let (response, escalate, reason) = match decision {
            EscalationDecision::OfferGuidance { .. } => {
                self.metrics.record_deflection();
                let response = if symptom.is_unmatched() {
                    self.responder.deflection(language)
                } else {
                    self.responder.render(&symptom, language).with_notice(report::guidance_offer())
                };
                (response, false, None)
            }
            EscalationDecision::EscalateNow { attempt } => (
                self.responder.handoff(language),
                true,
                Some(format!("User insisted on speaking to a health worker (attempt {attempt})")),
            ),
        };
        TriageOutcome {
            response,
            escalate,
            escalation_reason: reason,
            urgency_tier: urgency,
            tracker_state: decision.state(),
            symptom,
            intent,
            language,
        }
    }

    /// Records and forwards an escalation. The tracker is reset only when
    /// both steps succeed.
    pub async fn escalate(
        &self,
        user_id: &str,
        request: &EscalationRequest,
    ) -> Result<EscalationReceipt, EscalationError> {
        let result = self.hand_off(user_id, request).await;
        self.metrics.record_escalation_result(result.is_ok());
        match &result {
            Ok(receipt) => {
                self.tracker.reset(user_id);
                tracing::info!(
                    user_id,
                    escalation_id = %receipt.id,
                    contacts = receipt.notified_contacts.len(),
                    "Escalation handed to health workers"
                );
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Escalation failed, tracker state kept");
            }
        }
        result
    }

    async fn hand_off(
        &self,
        user_id: &str,
        request: &EscalationRequest,
    ) -> Result<EscalationReceipt, EscalationError> {
        let id = self
            .sink
            .record(user_id, &request.reason, request.urgency_tier, &request.latest_message)
            .await?;
        let notified_contacts = self.sink.notify(id).await?;
        let level = EscalationLevel::from(request.urgency_tier);
        Ok(EscalationReceipt {
            id,
            level,
            notified_contacts,
            confirmation: report::confirmation_message(level),
        })
    }

    /// Drops expired tracker entries. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        self.tracker.purge_expired()
    }
}
