//! # Escalation Tracker — "Ask Once, Escalate on Insistence"
//!
//! | From | Event | To | Decision |
//! |------|-------|----|----------|
//! | `NONE` | explicit request | `REQUESTED_ONCE` | offer guidance |
//! | `REQUESTED_ONCE` | request within window | `INSISTING` | escalate now |
//! | `INSISTING` | request within window | `INSISTING` | escalate now |
//! | any | gap > window | `NONE` | (state discarded on next read) |
//! | any | [`reset`](EscalationTracker::reset) | `NONE` | |
//!
//! Expiry is checked on read against an injected [`Clock`]. A gap of
//! exactly the window length still counts as "within".
//!
//! Per-user state lives in a [`DashMap`]: different users hash to
//! different shards and do not contend, and each request is one atomic
//! entry update.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::core::Clock;

/// Default inactivity window, in minutes.
pub const DEFAULT_WINDOW_MINUTES: i64 = 30;

/// Requests needed before the tracker says "escalate now".
const INSISTENCE_THRESHOLD: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerState {
    None,
    RequestedOnce,
    Insisting,
}

impl TrackerState {
    fn from_count(count: u32) -> Self {
        match count {
            0 => TrackerState::None,
            n if n < INSISTENCE_THRESHOLD => TrackerState::RequestedOnce,
            _ => TrackerState::Insisting,
        }
    }
}

/// Outcome of registering one explicit request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscalationDecision {
    /// First request in the window: answer it and offer to connect later.
    OfferGuidance { attempt: u32 },
    /// The user insisted: hand the conversation to a health worker.
    EscalateNow { attempt: u32 },
}

impl EscalationDecision {
    pub fn should_escalate(&self) -> bool {
        matches!(self, EscalationDecision::EscalateNow { .. })
    }

    pub fn attempt(&self) -> u32 {
        match self {
            EscalationDecision::OfferGuidance { attempt } | EscalationDecision::EscalateNow { attempt } => *attempt,
        }
    }

    pub fn state(&self) -> TrackerState {
        TrackerState::from_count(self.attempt())
    }
}

#[derive(Clone, Copy, Debug)]
struct AttemptState {
    count: u32,
    last_attempt_at: DateTime<Utc>,
}

pub struct EscalationTracker {
    attempts: DashMap<String, AttemptState>,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl EscalationTracker {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            attempts: DashMap::new(),
            window,
            clock,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn expired(&self, state: &AttemptState, now: DateTime<Utc>) -> bool {
        now - state.last_attempt_at > self.window
    }

    /// Records one explicit request and decides what to do with it.
    pub fn register_request(&self, user_id: &str) -> EscalationDecision {
        let now = self.clock.now();
        let count = {
            let mut entry = self
                .attempts
                .entry(user_id.to_string())
                .or_insert(AttemptState { count: 0, last_attempt_at: now });
            if self.expired(&entry, now) {
                entry.count = 0;
            }
            entry.count += 1;
            entry.last_attempt_at = now;
            entry.count
        };

        tracing::debug!(user_id, attempt = count, "Escalation request registered");
        if count >= INSISTENCE_THRESHOLD {
            EscalationDecision::EscalateNow { attempt: count }
        } else {
            EscalationDecision::OfferGuidance { attempt: count }
        }
    }

    /// Current state, discarding it first if the window has passed.
    pub fn state(&self, user_id: &str) -> TrackerState {
        TrackerState::from_count(self.attempt_count(user_id))
    }

    pub fn attempt_count(&self, user_id: &str) -> u32 {
        let now = self.clock.now();
        self.attempts.remove_if(user_id, |_, s| self.expired(s, now));
        self.attempts.get(user_id).map_or(0, |s| s.count)
    }

    /// Forgets a user. Returns whether there was anything to forget.
    pub fn reset(&self, user_id: &str) -> bool {
        self.attempts.remove(user_id).is_some()
    }

    /// Drops every expired entry. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.attempts.len();
        self.attempts.retain(|_, s| !self.expired(s, now));
        before.saturating_sub(self.attempts.len())
    }

    pub fn tracked_users(&self) -> usize {
        self.attempts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;

    fn tracker() -> (EscalationTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let t = EscalationTracker::new(Duration::minutes(DEFAULT_WINDOW_MINUTES), clock.clone());
        (t, clock)
    }

    #[test]
    fn first_request_offers_guidance_second_escalates() {
        let (t, clock) = tracker();
        assert_eq!(t.state("u1"), TrackerState::None);

        let first = t.register_request("u1");
        assert_eq!(first, EscalationDecision::OfferGuidance { attempt: 1 });
        assert_eq!(t.state("u1"), TrackerState::RequestedOnce);

        clock.advance(Duration::minutes(5));
        let second = t.register_request("u1");
        assert!(second.should_escalate());
        assert_eq!(second.state(), TrackerState::Insisting);
        assert_eq!(t.state("u1"), TrackerState::Insisting);
    }

    #[test]
    fn insisting_stays_insisting_without_reset() {
        let (t, _) = tracker();
        t.register_request("u1");
        t.register_request("u1");
        let third = t.register_request("u1");
        assert_eq!(third, EscalationDecision::EscalateNow { attempt: 3 });
    }

    #[test]
    fn gap_longer_than_window_starts_over() {
        let (t, clock) = tracker();
        t.register_request("u1");
        t.register_request("u1");
        clock.advance(Duration::minutes(31));
        assert_eq!(t.state("u1"), TrackerState::None);
        assert_eq!(t.register_request("u1"), EscalationDecision::OfferGuidance { attempt: 1 });
    }

    #[test]
    fn gap_of_exactly_the_window_still_counts() {
        let (t, clock) = tracker();
        t.register_request("u1");
        clock.advance(Duration::minutes(30));
        assert!(t.register_request("u1").should_escalate());
    }

    #[test]
    fn window_is_measured_from_the_latest_request() {
        let (t, clock) = tracker();
        t.register_request("u1");
        clock.advance(Duration::minutes(20));
        t.register_request("u1");
        clock.advance(Duration::minutes(20));
        assert_eq!(t.state("u1"), TrackerState::Insisting);
    }

    #[test]
    fn reset_is_idempotent() {
        let (t, _) = tracker();
        t.register_request("u1");
        assert!(t.reset("u1"));
        assert!(!t.reset("u1"));
        assert!(!t.reset("never-seen"));
        assert_eq!(t.state("u1"), TrackerState::None);
    }

    #[test]
    fn users_are_independent() {
        let (t, _) = tracker();
        t.register_request("u1");
        t.register_request("u1");
        assert_eq!(t.register_request("u2"), EscalationDecision::OfferGuidance { attempt: 1 });
        assert_eq!(t.state("u1"), TrackerState::Insisting);
    }

    #[test]
    fn purge_drops_only_expired_entries() {
        let (t, clock) = tracker();
        t.register_request("old");
        clock.advance(Duration::minutes(40));
        t.register_request("fresh");
        assert_eq!(t.tracked_users(), 2);
        assert_eq!(t.purge_expired(), 1);
        assert_eq!(t.tracked_users(), 1);
        assert_eq!(t.state("fresh"), TrackerState::RequestedOnce);
    }

    #[test]
    fn concurrent_requests_from_one_user_are_all_counted() {
        let (t, _) = tracker();
        let t = Arc::new(t);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let t = t.clone();
                std::thread::spawn(move || {
                    t.register_request("u1");
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(t.attempt_count("u1"), 8);
    }
}
