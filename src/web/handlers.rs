//! # HTTP Handlers
//!
//! Each public function is an axum handler mapped in
//! [`super::create_router()`].
//!
//! | Handler | Method | Returns | Use |
//! |---------|--------|---------|-----|
//! | `index` | GET | full HTML | triage console |
//! | `status` | GET | JSON | readiness and table sizes |
//! | `triage` | POST | JSON | [`TriageOutcome`] for one message |
//! | `intent` | POST | JSON | [`IntentResult`] for one message |
//! | `chat` | POST | HTMX fragment | console chat, escalates automatically |
//! | `create_escalation` | POST | JSON | receipt, or 502 when nobody was reached |
//! | `list_escalations` | GET | JSON | every recorded escalation |
//! | `sse_events` | GET | SSE stream | escalation feed |
//! | `metrics` | GET | JSON | counters |
//!
//! The JSON `triage` endpoint only decides; the caller follows up with
//! `POST /escalations`. The console `chat` endpoint does both in one call.

use std::convert::Infallible;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::response::Html;
use axum::Json;
use futures_util::stream::StreamExt;
use maud::html;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use super::error::ApiError;
use super::events::EscalationEvent;
use super::state::AppState;
use super::templates;
use crate::escalation::report::connection_failed;
use crate::escalation::EscalationRecord;
use crate::metrics::MetricsSnapshot;
use crate::nlu::intent::IntentResult;
use crate::orchestrator::{EscalationReceipt, EscalationRequest, TriageOutcome};

/// User id used by the console when the form carries none.
const CONSOLE_USER: &str = "console";

fn markup_to_html(m: maud::Markup) -> Html<String> {
    Html(m.into_string())
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub ready: bool,
    pub lexicon_version: u32,
    pub symptoms: usize,
    pub variants: usize,
    pub health_workers: usize,
    pub tracked_users: usize,
}

#[derive(Deserialize)]
pub struct TriageRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct IntentRequest {
    pub message: String,
}

#[derive(Deserialize)]
pub struct EscalationPayload {
    pub user_id: String,
    #[serde(flatten)]
    pub request: EscalationRequest,
}

#[derive(Deserialize)]
pub struct ChatForm {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

fn require_user_id(user_id: &str) -> Result<&str, ApiError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest("user_id is required".into()));
    }
    Ok(trimmed)
}

/// GET `/`: console page with a fresh session id.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = Uuid::new_v4().to_string();
    markup_to_html(templates::full_page(
        &session,
        state.engine.lexicon().len(),
        state.sink.contacts().len(),
    ))
}

/// GET `/status`
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let lexicon = state.engine.lexicon();
    Json(StatusResponse {
        ready: true,
        lexicon_version: lexicon.version(),
        symptoms: lexicon.len(),
        variants: lexicon.variants().len(),
        health_workers: state.sink.contacts().len(),
        tracked_users: state.engine.tracker().tracked_users(),
    })
}

/// POST `/triage`
pub async fn triage(
    State(state): State<AppState>,
    Json(req): Json<TriageRequest>,
) -> Result<Json<TriageOutcome>, ApiError> {
    let user_id = require_user_id(&req.user_id)?;
    Ok(Json(state.engine.triage(user_id, &req.message).await))
}

/// POST `/intent`
pub async fn intent(State(state): State<AppState>, Json(req): Json<IntentRequest>) -> Json<IntentResult> {
    Json(state.engine.classify_intent(&req.message))
}

/// POST `/escalations`: record and forward; `502` when it fails.
pub async fn create_escalation(
    State(state): State<AppState>,
    Json(payload): Json<EscalationPayload>,
) -> Result<(StatusCode, Json<EscalationReceipt>), ApiError> {
    let user_id = require_user_id(&payload.user_id)?;
    let receipt = state.engine.escalate(user_id, &payload.request).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET `/escalations`
pub async fn list_escalations(State(state): State<AppState>) -> Json<Vec<EscalationRecord>> {
    Json(state.sink.records())
}

/// GET `/metrics`
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.engine.metrics().snapshot())
}

/// POST `/chat`: triage one console message and render the answer.
///
/// ```text
/// 1. triage(user, message)
/// 2. outcome.escalate? → engine.escalate → confirmation or failure text
/// 3. user message + Kai answer + escalation result + metrics line
/// ```
pub async fn chat(State(state): State<AppState>, axum::Form(form): axum::Form<ChatForm>) -> Html<String> {
    let user_text = form.message.trim().to_string();
    if user_text.is_empty() {
        return markup_to_html(html! {});
    }
    let user_id = form
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(CONSOLE_USER)
        .to_string();

    let t0 = Instant::now();
    let outcome = state.engine.triage(&user_id, &user_text).await;

    let escalation = match outcome.escalation_request(&user_text) {
        Some(request) => Some(match state.engine.escalate(&user_id, &request).await {
            Ok(receipt) => (receipt.confirmation, true),
            Err(_) => (connection_failed(), false),
        }),
        None => None,
    };
    let elapsed_ms = t0.elapsed().as_millis() as u64;
    let summary = state.engine.metrics().snapshot().summary_line(elapsed_ms);

    markup_to_html(html! {
        (templates::user_message(&user_text))
        (templates::triage_message(&outcome))
        @if let Some((text, ok)) = &escalation {
            (templates::escalation_message(text, *ok))
        }
        (templates::metrics_line(&summary))
    })
}

/// GET `/events`: SSE stream of [`EscalationEvent`]s.
///
/// Lagged subscribers silently skip the events they missed.
pub async fn sse_events(
    State(state): State<AppState>,
) -> Sse<impl futures_util::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx: broadcast::Receiver<EscalationEvent> = state.events_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => {
                let data = serde_json::to_string(&event).ok()?;
                Some(Ok(SseEvent::default().data(data)))
            }
            Err(_) => None,
        }
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
