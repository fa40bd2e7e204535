//! The four domain specialists, one parameterized step.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::knowledge::KnowledgeBase;
use crate::message::Message;
use crate::prompts;
use crate::responder::Responder;
use crate::routing::SpecialistKind;
use crate::session::{AgentUpdate, Session};

use super::{Agent, AgentContext, AgentError};

/// Domain response step. The prompt embeds the whole knowledge subtree for
/// the specialist's category plus a bounded tail of the transcript; the
/// reply is appended and the kind's completion flag is set.
pub struct SpecialistAgent {
    kind: SpecialistKind,
    responder: Arc<dyn Responder>,
    knowledge: Arc<KnowledgeBase>,
    context_window: usize,
}

impl SpecialistAgent {
    #[must_use]
    pub fn new(
        kind: SpecialistKind,
        responder: Arc<dyn Responder>,
        knowledge: Arc<KnowledgeBase>,
        context_window: usize,
    ) -> Self {
        Self {
            kind,
            responder,
            knowledge,
            context_window,
        }
    }
}

#[async_trait]
impl Agent for SpecialistAgent {
    fn name(&self) -> &'static str {
        self.kind.agent_name()
    }

    async fn run(
        &self,
        session: &Session,
        ctx: AgentContext,
    ) -> Result<AgentUpdate, AgentError> {
        let facts = self.knowledge.dump(self.kind.category());
        let prompt = prompts::specialist(self.kind, &facts, &session.query);

        let mut outbound = vec![Message::system(prompt)];
        outbound.extend_from_slice(session.recent_messages(self.context_window));

        debug!(
            session = %ctx.session_id,
            specialist = %self.kind,
            context = outbound.len() - 1,
            "answering from knowledge base"
        );
        let reply = self.responder.complete(&outbound).await?;

        Ok(AgentUpdate::new()
            .with_message(Message::assistant(reply))
            .with_agent(self.name())
            .with_flag(self.kind.completion_flag()))
    }
}
