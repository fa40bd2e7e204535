//! Escalation: hands a reviewed-and-flagged case off to a human.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::message::Message;
use crate::prompts;
use crate::responder::Responder;
use crate::session::{AgentUpdate, Session};

use super::{Agent, AgentContext, AgentError};

/// Terminal hand-off step. Generates a case reference, asks the model for an
/// acknowledgment with contact details, and appends the raw reply — nothing
/// in it is parsed.
pub struct EscalationAgent {
    responder: Arc<dyn Responder>,
}

impl EscalationAgent {
    #[must_use]
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self { responder }
    }
}

#[async_trait]
impl Agent for EscalationAgent {
    fn name(&self) -> &'static str {
        "escalation"
    }

    async fn run(
        &self,
        session: &Session,
        ctx: AgentContext,
    ) -> Result<AgentUpdate, AgentError> {
        let reason = session
            .escalation()
            .map(|e| e.reason())
            .unwrap_or("Complex inquiry");
        let case_ref = Uuid::new_v4().to_string();
        info!(
            session = %ctx.session_id,
            %case_ref,
            reason,
            "escalating to human support"
        );

        let outbound = vec![
            Message::system(prompts::escalation(reason, &case_ref)),
            Message::user(&session.query),
        ];
        let reply = self.responder.complete(&outbound).await?;

        Ok(AgentUpdate::new()
            .with_message(Message::assistant(reply))
            .with_agent(self.name()))
    }
}
