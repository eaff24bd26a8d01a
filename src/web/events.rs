//! Escalation events as streamed by `GET /events`. The type belongs to the
//! escalation core; the web layer only serialises it onto the SSE feed.

pub use crate::escalation::events::EscalationEvent;
