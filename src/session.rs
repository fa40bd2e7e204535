//! The per-query session record and step-update merging.
//!
//! A [`Session`] is created once per incoming query, threaded through every
//! agent step, and returned to the caller when the pipeline reaches its
//! terminal stage. Agents never mutate the session directly: each step
//! returns an [`AgentUpdate`] delta and the router merges it with
//! [`Session::apply_step`], which also counts the completed step. That keeps
//! the step functions pure with respect to session state and independently
//! testable.
//!
//! # Invariants
//!
//! - The transcript only grows; nothing is ever removed from it. Bounded
//!   look-back happens only when assembling outbound prompts
//!   ([`Session::recent_messages`]), never as persisted truncation.
//! - The iteration counter increments exactly once per completed step and is
//!   the sole loop-termination safeguard.
//! - The classified intent, once set, is never overwritten.
//! - An escalation always carries a non-empty reason ([`Escalation::new`]
//!   substitutes a fixed fallback for blank input), so "needs a human" and
//!   "has a reason" cannot drift apart.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::message::Message;
use crate::routing::Intent;

/// Fallback reason recorded when review escalates without naming one.
const UNSPECIFIED_REASON: &str = "unspecified";

/// A request for human follow-up, raised by the quality review step.
///
/// The reason is guaranteed non-empty: construction trims the input and
/// substitutes a fixed fallback for blank text.
///
/// ```
/// use campus_desk::session::Escalation;
///
/// assert_eq!(Escalation::new("case too complex").reason(), "case too complex");
/// assert_eq!(Escalation::new("   ").reason(), "unspecified");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Escalation {
    reason: String,
}

impl Escalation {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let trimmed = reason.trim();
        Self {
            reason: if trimmed.is_empty() {
                UNSPECIFIED_REASON.to_string()
            } else {
                trimmed.to_string()
            },
        }
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// The record tracking one end-to-end query through the pipeline.
#[derive(Clone, Debug, Serialize)]
pub struct Session {
    /// Unique id for this run.
    pub id: String,
    /// The original free-text query, kept verbatim for prompt assembly.
    pub query: String,
    /// Name of the last agent that completed, empty before the first step.
    pub current_agent: String,
    /// Reserved for a future delivery summary; the reference pipeline never
    /// sets it.
    pub final_response: Option<String>,
    pub started_at: DateTime<Utc>,
    messages: Vec<Message>,
    intent: Option<Intent>,
    flags: FxHashMap<String, bool>,
    escalation: Option<Escalation>,
    iterations: u32,
}

impl Session {
    /// Creates a fresh session seeded with the student's query as the first
    /// transcript message.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            id: Uuid::new_v4().to_string(),
            messages: vec![Message::user(&query)],
            query,
            current_agent: String::new(),
            final_response: None,
            started_at: Utc::now(),
            intent: None,
            flags: FxHashMap::default(),
            escalation: None,
            iterations: 0,
        }
    }

    /// The full transcript, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The trailing `window` transcript messages, for bounded prompt context.
    #[must_use]
    pub fn recent_messages(&self, window: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }

    /// The classified intent, `None` until the greeter has run.
    #[must_use]
    pub fn intent(&self) -> Option<Intent> {
        self.intent
    }

    /// All step-completion flags accumulated so far.
    #[must_use]
    pub fn flags(&self) -> &FxHashMap<String, bool> {
        &self.flags
    }

    /// True when the named flag has been set.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// The escalation raised by review, if any.
    #[must_use]
    pub fn escalation(&self) -> Option<&Escalation> {
        self.escalation.as_ref()
    }

    /// True when review flagged this session for human follow-up.
    #[must_use]
    pub fn needs_human(&self) -> bool {
        self.escalation.is_some()
    }

    /// Number of completed steps.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Merges a completed step's delta into the session and counts the step.
    ///
    /// Messages are appended, flags are unioned in, the intent is set only if
    /// still unset, and the iteration counter advances by exactly one.
    pub fn apply_step(&mut self, update: AgentUpdate) {
        self.messages.extend(update.messages);
        if let Some(agent) = update.agent {
            self.current_agent = agent.to_string();
        }
        if self.intent.is_none() {
            self.intent = update.intent;
        }
        if let Some(flags) = update.flags {
            self.flags.extend(flags);
        }
        if let Some(escalation) = update.escalation {
            self.escalation = Some(escalation);
        }
        self.iterations += 1;
    }
}

/// The delta a single agent step wants merged into the session.
///
/// Every field is optional so a step states only what it touched; the router
/// owns the merge.
#[derive(Clone, Debug, Default)]
pub struct AgentUpdate {
    pub messages: Vec<Message>,
    pub agent: Option<&'static str>,
    pub intent: Option<Intent>,
    pub flags: Option<FxHashMap<String, bool>>,
    pub escalation: Option<Escalation>,
}

impl AgentUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message to the transcript.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Record which agent produced this update.
    #[must_use]
    pub fn with_agent(mut self, agent: &'static str) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Record the classified intent.
    #[must_use]
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }

    /// Set a step-completion flag.
    #[must_use]
    pub fn with_flag(mut self, name: &str) -> Self {
        self.flags
            .get_or_insert_with(FxHashMap::default)
            .insert(name.to_string(), true);
        self
    }

    /// Raise an escalation.
    #[must_use]
    pub fn with_escalation(mut self, escalation: Escalation) -> Self {
        self.escalation = Some(escalation);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_seeds_transcript_with_query() {
        let session = Session::new("hello");
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0], Message::user("hello"));
        assert_eq!(session.query, "hello");
        assert_eq!(session.iterations(), 0);
        assert!(session.intent().is_none());
        assert!(!session.needs_human());
        assert!(session.current_agent.is_empty());
    }

    #[test]
    fn apply_step_appends_and_counts() {
        let mut session = Session::new("q");
        session.apply_step(
            AgentUpdate::new()
                .with_message(Message::assistant("a"))
                .with_agent("greeter"),
        );
        session.apply_step(AgentUpdate::new().with_message(Message::assistant("b")));

        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.iterations(), 2);
        assert_eq!(session.current_agent, "greeter");
    }

    #[test]
    fn intent_is_set_once() {
        let mut session = Session::new("q");
        session.apply_step(AgentUpdate::new().with_intent(Intent::Finance));
        session.apply_step(AgentUpdate::new().with_intent(Intent::Academic));
        assert_eq!(session.intent(), Some(Intent::Finance));
    }

    #[test]
    fn flags_accumulate_without_clearing() {
        let mut session = Session::new("q");
        session.apply_step(AgentUpdate::new().with_flag("finance_info_provided"));
        session.apply_step(AgentUpdate::new().with_flag("revision_requested"));

        assert!(session.flag("finance_info_provided"));
        assert!(session.flag("revision_requested"));
        assert!(!session.flag("academic_info_provided"));
    }

    #[test]
    fn escalation_reason_never_empty() {
        let mut session = Session::new("q");
        assert!(!session.needs_human());

        session.apply_step(AgentUpdate::new().with_escalation(Escalation::new("")));
        assert!(session.needs_human());
        assert_eq!(session.escalation().map(Escalation::reason), Some("unspecified"));
    }

    #[test]
    fn recent_messages_windows_the_tail() {
        let mut session = Session::new("q");
        session.apply_step(
            AgentUpdate::new()
                .with_message(Message::assistant("one"))
                .with_message(Message::assistant("two")),
        );

        let tail = session.recent_messages(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].content, "one");
        assert_eq!(tail[1].content, "two");

        // Window larger than the transcript returns everything.
        assert_eq!(session.recent_messages(10).len(), 3);
    }
}
