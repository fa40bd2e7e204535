//! Structured per-step events for observability.
//!
//! The router emits one event when a step starts, one when it completes, and
//! one when the session reaches its terminal stage. Consumers (the demo
//! binary, a test harness) receive them over a `flume` channel; emission is
//! best-effort and a closed channel is never an error.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::session::Session;

/// Longest reply excerpt carried in a completion event.
const PREVIEW_CHARS: usize = 200;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouterEvent {
    StepStarted {
        agent: String,
        iteration: u32,
        at: DateTime<Utc>,
    },
    StepCompleted {
        agent: String,
        iteration: u32,
        preview: String,
        at: DateTime<Utc>,
    },
    SessionFinished {
        session_id: String,
        escalated: bool,
        steps: u32,
        at: DateTime<Utc>,
    },
}

impl RouterEvent {
    #[must_use]
    pub fn step_started(agent: &str, iteration: u32) -> Self {
        RouterEvent::StepStarted {
            agent: agent.to_string(),
            iteration,
            at: Utc::now(),
        }
    }

    #[must_use]
    pub fn step_completed(agent: &str, iteration: u32, reply: &str) -> Self {
        RouterEvent::StepCompleted {
            agent: agent.to_string(),
            iteration,
            preview: preview_of(reply),
            at: Utc::now(),
        }
    }

    #[must_use]
    pub fn session_finished(session: &Session) -> Self {
        RouterEvent::SessionFinished {
            session_id: session.id.clone(),
            escalated: session.needs_human(),
            steps: session.iterations(),
            at: Utc::now(),
        }
    }
}

/// Char-boundary-safe excerpt of a reply for event payloads.
fn preview_of(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push('…');
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_replies_pass_through_unmarked() {
        assert_eq!(preview_of("hello"), "hello");
    }

    #[test]
    fn long_replies_truncate_on_char_boundaries() {
        let long = "é".repeat(300);
        let preview = preview_of(&long);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 1);
        assert!(preview.ends_with('…'));
    }

    #[test]
    fn events_serialize_with_kind_tags() {
        let event = RouterEvent::step_started("greeter", 1);
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"kind\":\"step_started\""));
        assert!(json.contains("\"greeter\""));
    }
}
