//! # Web Module — HTTP Surface of the Triage Engine
//!
//! Built with **axum** + **HTMX** + **maud** + **SSE**.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Browser console (HTMX + EventSource)  /  API clients    │
//! ├─────────────────────────────────────────────────────────┤
//! │ axum Router (this module)                               │
//! │  ├── GET  /             → console page                  │
//! │  ├── GET  /status       → JSON readiness                │
//! │  ├── POST /triage       → JSON TriageOutcome            │
//! │  ├── POST /intent       → JSON IntentResult             │
//! │  ├── POST /chat         → HTMX fragment                 │
//! │  ├── POST /escalations  → JSON receipt or 502           │
//! │  ├── GET  /escalations  → JSON records                  │
//! │  ├── GET  /events       → SSE escalation feed           │
//! │  └── GET  /metrics      → JSON counters                 │
//! ├─────────────────────────────────────────────────────────┤
//! │ TraceLayer (request spans) · CorsLayer (permissive)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | shared `AppState` |
//! | [`events`] | escalation events published on the SSE feed |
//! | [`error`] | JSON error bodies and status mapping |
//! | [`handlers`] | one handler per route |
//! | [`templates`] | maud pages and fragments |

pub mod error;
pub mod events;
pub mod handlers;
pub mod state;
pub mod templates;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // ── Console ───────────────────────────────────────────
        .route("/", get(handlers::index))
        .route("/chat", post(handlers::chat))
        // ── JSON API ──────────────────────────────────────────
        .route("/status", get(handlers::status))
        .route("/triage", post(handlers::triage))
        .route("/intent", post(handlers::intent))
        .route(
            "/escalations",
            get(handlers::list_escalations).post(handlers::create_escalation),
        )
        .route("/metrics", get(handlers::metrics))
        // ── SSE ───────────────────────────────────────────────
        .route("/events", get(handlers::sse_events))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tokio::sync::broadcast;
    use tower::ServiceExt;

    use super::*;
    use crate::core::{Lexicon, ManualClock};
    use crate::escalation::{EscalationEvent, HealthWorkerContact, InMemoryEscalationSink};
    use crate::orchestrator::{EngineSettings, TriageEngine};
    use crate::translate::DisabledTranslator;

    /// Router plus a receiver that keeps the event feed listened to.
    fn test_app(contacts: Vec<HealthWorkerContact>) -> (Router, broadcast::Receiver<EscalationEvent>) {
        let clock = Arc::new(ManualClock::default());
        let (tx, rx) = broadcast::channel(64);
        let sink = Arc::new(InMemoryEscalationSink::new(contacts, tx.clone(), clock.clone()));
        let engine = Arc::new(TriageEngine::new(
            Arc::new(Lexicon::builtin().unwrap()),
            Arc::new(DisabledTranslator),
            sink.clone(),
            clock,
            EngineSettings::default(),
        ));
        let state = AppState {
            engine,
            sink,
            events_tx: Arc::new(tx),
        };
        (create_router(state), rx)
    }

    fn nurse() -> Vec<HealthWorkerContact> {
        vec![HealthWorkerContact {
            name: "Aminata".into(),
            phone: "+23276000001".into(),
            role: "Nurse".into(),
        }]
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn status_reports_lexicon_size() {
        let (app, _rx) = test_app(nurse());
        let req = Request::builder().uri("/status").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ready"], true);
        assert!(json["symptoms"].as_u64().unwrap() > 0);
        assert_eq!(json["health_workers"], 1);
    }

    #[tokio::test]
    async fn triage_returns_outcome_json() {
        let (app, _rx) = test_app(nurse());
        let req = json_request("POST", "/triage", json!({"user_id": "u1", "message": "I can't breathe"}));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["escalate"], true);
        assert_eq!(json["urgency_tier"], "emergency");
        assert_eq!(json["symptom"]["symptom_key"], "difficulty_breathing");
        assert_eq!(json["tracker_state"], "NONE");
    }

    #[tokio::test]
    async fn triage_without_user_is_rejected() {
        let (app, _rx) = test_app(nurse());
        let req = json_request("POST", "/triage", json!({"user_id": " ", "message": "hello"}));
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn intent_endpoint_classifies() {
        let (app, _rx) = test_app(nurse());
        let req = json_request("POST", "/intent", json!({"message": "xyz nonsense text"}));
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["intent"], "Unknown");
        assert_eq!(json["confidence"], 0.1);
    }

    #[tokio::test]
    async fn escalation_is_created_and_listed() {
        let (app, _rx) = test_app(nurse());
        let req = json_request(
            "POST",
            "/escalations",
            json!({
                "user_id": "u1",
                "reason": "Emergency symptom detected: convulsions",
                "urgency_tier": "emergency",
                "latest_message": "mi pikin de shek"
            }),
        );
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["level"], "emergency");
        assert_eq!(json["notified_contacts"][0], "Aminata");

        let req = Request::builder().uri("/escalations").body(Body::empty()).unwrap();
        let list = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["status"], "assigned");
    }

    #[tokio::test]
    async fn escalation_without_contacts_is_bad_gateway() {
        let (app, _rx) = test_app(vec![]);
        let req = json_request(
            "POST",
            "/escalations",
            json!({
                "user_id": "u1",
                "reason": "User insisted on speaking to a health worker (attempt 2)",
                "urgency_tier": "routine",
                "latest_message": "I want to talk to a nurse"
            }),
        );
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert!(json["user_message"]["en"].as_str().unwrap().contains("nearest health facility"));
    }

    #[tokio::test]
    async fn chat_fragment_escalates_emergencies() {
        let (app, _rx) = test_app(nurse());
        let req = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("message=I+can%27t+breathe&user_id=s1"))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("user-message"));
        assert!(html.contains("urgency-emergency"));
        assert!(html.contains("EMERGENCY ESCALATED"));
    }

    #[tokio::test]
    async fn metrics_count_triaged_messages() {
        let (app, _rx) = test_app(nurse());
        let req = json_request("POST", "/triage", json!({"user_id": "u1", "message": "I have a headache"}));
        app.clone().oneshot(req).await.unwrap();
        let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["messages"], 1);
        assert_eq!(json["match_sources"]["FUZZY"], 1);
    }
}
