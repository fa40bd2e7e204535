//! Greeter: welcomes the student and classifies the query's intent.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::message::Message;
use crate::prompts;
use crate::responder::Responder;
use crate::routing::Intent;
use crate::session::{AgentUpdate, Session};

use super::{Agent, AgentContext, AgentError};

/// Classification step. A reply without a usable `INTENT:` line degrades
/// silently to [`Intent::General`]; there is no retry.
pub struct Greeter {
    responder: Arc<dyn Responder>,
}

impl Greeter {
    #[must_use]
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self { responder }
    }
}

#[async_trait]
impl Agent for Greeter {
    fn name(&self) -> &'static str {
        "greeter"
    }

    async fn run(
        &self,
        session: &Session,
        ctx: AgentContext,
    ) -> Result<AgentUpdate, AgentError> {
        let outbound = vec![
            Message::system(prompts::greeter(&session.query)),
            Message::user(&session.query),
        ];
        let reply = self.responder.complete(&outbound).await?;

        let intent = prompts::parse_intent(&reply).unwrap_or(Intent::General);
        debug!(
            session = %ctx.session_id,
            %intent,
            "classified student query"
        );

        Ok(AgentUpdate::new()
            .with_message(Message::assistant(reply))
            .with_agent(self.name())
            .with_intent(intent))
    }
}
