//! The agent trait and the four pipeline step families.
//!
//! An agent is one unit of pipeline work: it reads the current session,
//! makes exactly one responder call, and returns an
//! [`AgentUpdate`](crate::session::AgentUpdate) for the router to merge.
//! Agents hold their collaborators (responder, knowledge base) and no
//! session state, so a single agent value is safe to reuse across sessions.

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use crate::responder::ResponderError;
use crate::session::{AgentUpdate, Session};

mod escalation;
mod greeter;
mod reviewer;
mod specialist;

pub use escalation::EscalationAgent;
pub use greeter::Greeter;
pub use reviewer::Reviewer;
pub use specialist::SpecialistAgent;

/// One pipeline step.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Stable name used for the session record, flags, and events.
    fn name(&self) -> &'static str;

    /// Executes the step against the current session.
    async fn run(&self, session: &Session, ctx: AgentContext)
    -> Result<AgentUpdate, AgentError>;
}

/// Per-step execution context handed to an agent.
#[derive(Clone, Debug)]
pub struct AgentContext {
    /// Session this step belongs to.
    pub session_id: String,
    /// 1-based number this step will get once it completes.
    pub iteration: u32,
}

/// Fatal step failures. Parse problems are not errors — they degrade to
/// documented fallbacks — so the only way a step fails is its responder call.
#[derive(Debug, Error, Diagnostic)]
pub enum AgentError {
    #[error("responder call failed")]
    #[diagnostic(code(campus_desk::agents::responder))]
    Responder(
        #[from]
        #[diagnostic_source]
        ResponderError,
    ),
}
