//! # Maud Templates — Triage Console
//!
//! Server-rendered HTML for the operator console. HTMX posts the chat form
//! and appends the returned fragment; the escalation panel listens on the
//! `/events` SSE feed.
//!
//! | Function | Kind | Description |
//! |----------|------|-------------|
//! | [`full_page()`] | full page | chat + escalation feed |
//! | [`user_message()`] | HTMX fragment | the user's own message |
//! | [`triage_message()`] | HTMX fragment | bilingual answer with urgency badge |
//! | [`escalation_message()`] | HTMX fragment | confirmation or failure of a hand-off |
//! | [`metrics_line()`] | HTMX fragment | timing and counters |
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────── nav-bar ─────────────────────┐
//! │ Kai │ 42 symptoms │ 2 health workers          │
//! ├──────────────────────────┬───────────────────┤
//! │ Chat messages            │ Escalation feed    │
//! │  user / kai / escalation │  (SSE /events)     │
//! ├──────────────────────────┴───────────────────┤
//! │ [______________________________] [Send]      │
//! └──────────────────────────────────────────────┘
//! ```

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::core::{Bilingual, UrgencyTier};
use crate::orchestrator::TriageOutcome;

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.4";

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #f4f6f5; color: #1d2b24; }
.nav-bar { display: flex; gap: 1.5rem; align-items: center; padding: .75rem 1.25rem; background: #1f6f4a; color: #fff; }
.nav-brand { font-weight: 700; font-size: 1.2rem; }
.app-container { display: grid; grid-template-columns: 2fr 1fr; height: calc(100vh - 3rem); }
.chat-panel { display: flex; flex-direction: column; border-right: 1px solid #d5ddd8; }
.chat-messages { flex: 1; overflow-y: auto; padding: 1rem; }
.message { margin: .5rem 0; padding: .6rem .8rem; border-radius: 8px; background: #fff; }
.user-message { background: #dff1e7; margin-left: 20%; }
.message-role { font-size: .75rem; font-weight: 600; opacity: .7; margin-bottom: .25rem; }
.message-content { white-space: pre-wrap; }
.urgency-emergency { border-left: 4px solid #c0392b; }
.urgency-urgent { border-left: 4px solid #e67e22; }
.urgency-moderate { border-left: 4px solid #f1c40f; }
.urgency-routine { border-left: 4px solid #27ae60; }
.escalation-message { background: #fff4e5; }
.error-message { background: #fde8e8; }
.metrics-line { font-size: .75rem; opacity: .6; }
.chat-input-area form { display: flex; gap: .5rem; padding: .75rem; }
.chat-input-area input[type=text] { flex: 1; padding: .5rem; }
.feed { padding: 1rem; overflow-y: auto; }
.feed-item { font-size: .85rem; background: #fff; margin: .4rem 0; padding: .5rem; border-radius: 6px; white-space: pre-wrap; }
"#;

/// Console page. `user_id` identifies this browser session to the tracker.
pub fn full_page(user_id: &str, symptoms: usize, health_workers: usize) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Kai · Health Triage" }
                style { (PreEscaped(STYLE)) }
                script src=(HTMX_SRC) {}
            }
            body {
                nav class="nav-bar" {
                    span class="nav-brand" { "Kai" }
                    span { (symptoms) " symptoms" }
                    span { (health_workers) " health workers" }
                }
                div class="app-container" {
                    div class="chat-panel" {
                        div id="chat-messages" class="chat-messages" {
                            div class="message welcome" {
                                div class="message-content" {
                                    "Kushɛ! Tell me how you feel, in English or Krio."
                                }
                            }
                        }
                        div class="chat-input-area" {
                            form id="chat-form"
                                hx-post="/chat"
                                hx-target="#chat-messages"
                                hx-swap="beforeend"
                                hx-on--after-request="this.reset()" {
                                input type="hidden" name="user_id" value=(user_id);
                                input type="text" name="message"
                                    placeholder="Describe your symptoms..."
                                    autocomplete="off"
                                    autofocus;
                                button type="submit" { "Send" }
                            }
                        }
                    }
                    div class="feed" {
                        h3 { "Escalations" }
                        div id="escalation-feed" {}
                    }
                }
                (PreEscaped(r#"<script>
var msgs = document.getElementById('chat-messages');
new MutationObserver(function() { msgs.scrollTop = msgs.scrollHeight; })
  .observe(msgs, { childList: true, subtree: true });

var feed = document.getElementById('escalation-feed');
var source = new EventSource('/events');
source.onmessage = function(e) {
  var ev = JSON.parse(e.data);
  var item = document.createElement('div');
  item.className = 'feed-item';
  if (ev.type === 'Recorded') {
    item.textContent = '[' + ev.priority + '] ' + ev.user_id + ': ' + ev.reason;
  } else if (ev.type === 'Forwarded') {
    item.textContent = '→ ' + ev.contact + ' (' + ev.chat_id + ')';
  } else {
    item.textContent = '✓ assigned to ' + ev.notified_contacts.join(', ');
  }
  feed.prepend(item);
};
</script>"#))
            }
        }
    }
}

pub fn user_message(text: &str) -> Markup {
    html! {
        div class="message user-message" {
            div class="message-role" { "You" }
            div class="message-content" { (text) }
        }
    }
}

fn urgency_class(tier: Option<UrgencyTier>) -> String {
    match tier {
        Some(t) => format!("message kai-message urgency-{}", t.as_str()),
        None => "message kai-message".to_string(),
    }
}

pub fn triage_message(outcome: &TriageOutcome) -> Markup {
    html! {
        div class=(urgency_class(outcome.response.urgency())) {
            div class="message-role" {
                "Kai"
                @if let Some(key) = outcome.symptom.key() {
                    " · " (key) " (" (outcome.symptom.source) ")"
                }
            }
            div class="message-content" { (outcome.response.to_text()) }
        }
    }
}

/// Hand-off result. `ok = false` renders the failure styling.
pub fn escalation_message(text: &Bilingual, ok: bool) -> Markup {
    let class = if ok { "message escalation-message" } else { "message error-message" };
    html! {
        div class=(class) {
            div class="message-role" { "Escalation" }
            div class="message-content" { (text.to_text()) }
        }
    }
}

pub fn metrics_line(summary: &str) -> Markup {
    html! {
        div class="message metrics" {
            div class="message-content metrics-line" { (format!("\u{26a1} {}", summary)) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_carries_session_and_htmx_form() {
        let page = full_page("session-1", 42, 2).into_string();
        assert!(page.contains(r#"name="user_id" value="session-1""#));
        assert!(page.contains(r#"hx-post="/chat""#));
        assert!(page.contains("42 symptoms"));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = user_message("<b>help</b>").into_string();
        assert!(html.contains("&lt;b&gt;help&lt;/b&gt;"));
    }

    #[test]
    fn failed_escalation_uses_error_styling() {
        let html = escalation_message(&Bilingual::new("no", "nɔ"), false).into_string();
        assert!(html.contains("error-message"));
    }
}
