//! Quality review: classifies the draft response into a disposition.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::message::Message;
use crate::prompts::{self, ReviewDisposition};
use crate::responder::Responder;
use crate::session::{AgentUpdate, Session};

use super::{Agent, AgentContext, AgentError};

/// Review step. Only the escalation marker changes the session's fate; a
/// revision request is recorded as a flag but never triggers a retry — the
/// pipeline has no loop-back edge.
pub struct Reviewer {
    responder: Arc<dyn Responder>,
}

impl Reviewer {
    #[must_use]
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self { responder }
    }
}

#[async_trait]
impl Agent for Reviewer {
    fn name(&self) -> &'static str {
        "quality_reviewer"
    }

    async fn run(
        &self,
        session: &Session,
        ctx: AgentContext,
    ) -> Result<AgentUpdate, AgentError> {
        let last_reply = session
            .messages()
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let outbound = vec![
            Message::system(prompts::reviewer(&session.query, last_reply)),
            Message::user("Review the response and reply with one disposition line."),
        ];
        let reply = self.responder.complete(&outbound).await?;

        let disposition = prompts::parse_review(&reply);
        debug!(session = %ctx.session_id, ?disposition, "review disposition");

        let mut update = AgentUpdate::new()
            .with_message(Message::assistant(reply))
            .with_agent(self.name());
        match disposition {
            ReviewDisposition::Escalate(escalation) => {
                update = update.with_escalation(escalation);
            }
            ReviewDisposition::NeedsRevision => {
                update = update.with_flag("revision_requested");
            }
            ReviewDisposition::Approved => {}
        }
        Ok(update)
    }
}
