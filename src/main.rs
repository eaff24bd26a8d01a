#![allow(dead_code)]
//! # Kai Triage — Bilingual Health Triage Service
//!
//! **Entry point.** Loads configuration and the symptom lexicon, wires the
//! triage engine to its collaborators and serves the HTTP surface.
//!
//! ## Startup
//!
//! ```text
//! main()
//!   ├── tracing subscriber (RUST_LOG, default info)
//!   ├── Config::from_env (.env + KAI_* variables)
//!   ├── load_lexicon (fatal on any error)
//!   ├── Translator: HttpTranslator if configured, else DisabledTranslator
//!   ├── broadcast channel ── InMemoryEscalationSink
//!   ├── TriageEngine
//!   ├── spawn: delivery log (subscribes to escalation events)
//!   ├── spawn: tracker purge (every 5 min)
//!   └── axum::serve
//! ```
//!
//! ## Usage
//!
//! ```bash
//! KAI_HEALTH_WORKERS="Aminata:+23276000001:Nurse" cargo run
//! RUST_LOG=kai_triage=debug cargo run
//! ```

/// `core`: domain types: languages, urgency, lexicon, symptom matches, clock.
mod core;

/// `nlu`: normalisation, fuzzy matching, Krio detection, intent classification.
mod nlu;

/// `translate`: Krio → English translation collaborator.
mod translate;

/// `triage`: symptom resolution and bilingual responses.
mod triage;

/// `escalation`: request phrases, insistence tracker, sink and report texts.
mod escalation;

/// `orchestrator`: the triage engine.
mod orchestrator;

/// `metrics`: in-process counters.
mod metrics;

/// `persistence`: lexicon loading.
mod persistence;

/// `config`: environment configuration.
mod config;

/// `web`: axum router, handlers, templates and SSE.
mod web;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::core::SystemClock;
use crate::escalation::{EscalationEvent, InMemoryEscalationSink};
use crate::orchestrator::TriageEngine;
use crate::translate::{DisabledTranslator, HttpTranslator, Translator};
use crate::web::state::AppState;

/// Interval between tracker purges.
const PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🩺 Kai Triage starting...");

    let config = Config::from_env()?;
    let lexicon = Arc::new(persistence::load_lexicon(config.lexicon_path.as_deref())?);

    let translator: Arc<dyn Translator> = match &config.translation {
        Some(t) => {
            let http = HttpTranslator::new(&t.host, t.api_key.clone(), config.translation_timeout)
                .context("Failed to build translation client")?;
            tracing::info!(endpoint = http.endpoint(), "Krio translation enabled");
            Arc::new(http)
        }
        None => {
            tracing::warn!("KAI_TRANSLATION_API_HOST not set, Krio translation disabled");
            Arc::new(DisabledTranslator)
        }
    };

    if config.health_workers.is_empty() {
        tracing::warn!("KAI_HEALTH_WORKERS not set, escalations will fail to notify anyone");
    }

    // Capacity 256: slow SSE consumers skip what they missed.
    let (events_tx, _) = broadcast::channel::<EscalationEvent>(256);
    let clock = Arc::new(SystemClock);
    let sink = Arc::new(InMemoryEscalationSink::new(
        config.health_workers.clone(),
        events_tx.clone(),
        clock.clone(),
    ));
    let engine = Arc::new(TriageEngine::new(
        lexicon,
        translator,
        sink.clone(),
        clock,
        config.engine_settings(),
    ));

    tokio::spawn(log_deliveries(events_tx.subscribe()));
    tokio::spawn(purge_tracker(engine.clone()));

    let state = AppState {
        engine,
        sink,
        events_tx: Arc::new(events_tx),
    };
    let app = web::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Logs every report forwarded to a health worker. Keeps one listener on
/// the escalation feed for as long as the process runs.
async fn log_deliveries(mut rx: broadcast::Receiver<EscalationEvent>) {
    loop {
        match rx.recv().await {
            Ok(EscalationEvent::Forwarded { id, contact, chat_id, .. }) => {
                tracing::info!(escalation_id = %id, contact = %contact, chat_id = %chat_id, "Escalation report delivered");
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Delivery log fell behind the escalation feed");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn purge_tracker(engine: Arc<TriageEngine>) {
    let mut ticker = tokio::time::interval(PURGE_INTERVAL);
    loop {
        ticker.tick().await;
        let purged = engine.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "Expired escalation requests purged");
        }
    }
}
