//! The support desk runner that sequences everything.
//!
//! [`SupportDesk`] owns the collaborators (responder, knowledge base) and
//! the configuration, and walks each incoming query through the stage
//! machine: classify, one specialist, review, optional escalation. Steps run
//! strictly sequentially; each responder call blocks the session until it
//! returns. Sessions never share mutable state, so one desk can serve
//! concurrent queries — every call to [`SupportDesk::run`] gets its own
//! [`Session`].

use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;
use tracing::{info, instrument};

use crate::agents::{Agent, AgentContext, AgentError, EscalationAgent, Greeter, Reviewer, SpecialistAgent};
use crate::config::RouterConfig;
use crate::events::RouterEvent;
use crate::knowledge::KnowledgeBase;
use crate::responder::Responder;
use crate::routing::Stage;
use crate::session::Session;

/// A session aborted mid-pipeline. There is no partial-delivery contract:
/// either the full sequence completes or the caller gets this.
#[derive(Debug, Error, Diagnostic)]
pub enum RouterError {
    #[error("agent {agent} failed at iteration {iteration}")]
    #[diagnostic(code(campus_desk::router::agent))]
    Agent {
        agent: &'static str,
        iteration: u32,
        #[source]
        #[diagnostic_source]
        source: AgentError,
    },
}

/// The conversation router.
pub struct SupportDesk {
    responder: Arc<dyn Responder>,
    knowledge: Arc<KnowledgeBase>,
    config: RouterConfig,
    events: Option<flume::Sender<RouterEvent>>,
}

impl SupportDesk {
    /// A desk with the bundled knowledge base and default configuration.
    #[must_use]
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self {
            responder,
            knowledge: Arc::new(KnowledgeBase::bundled()),
            config: RouterConfig::default(),
            events: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_knowledge(mut self, knowledge: Arc<KnowledgeBase>) -> Self {
        self.knowledge = knowledge;
        self
    }

    /// Opens a per-step event stream. Events flow for every subsequent run;
    /// dropping the receiver silently stops delivery without affecting the
    /// pipeline.
    pub fn event_stream(&mut self) -> flume::Receiver<RouterEvent> {
        let (tx, rx) = flume::unbounded();
        self.events = Some(tx);
        rx
    }

    /// Runs one query through the full pipeline and returns the terminal
    /// session.
    #[instrument(skip_all, fields(query_chars = query.len()))]
    pub async fn run(&self, query: &str) -> Result<Session, RouterError> {
        let mut session = Session::new(query);
        let mut stage = Stage::Classify;
        info!(session = %session.id, "session opened");

        loop {
            let Some(agent) = self.agent_for(&stage) else {
                break;
            };
            let iteration = session.iterations() + 1;
            self.emit(RouterEvent::step_started(agent.name(), iteration));

            let ctx = AgentContext {
                session_id: session.id.clone(),
                iteration,
            };
            let update = agent
                .run(&session, ctx)
                .await
                .map_err(|source| RouterError::Agent {
                    agent: agent.name(),
                    iteration,
                    source,
                })?;

            let preview_source = update
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            session.apply_step(update);
            self.emit(RouterEvent::step_completed(
                agent.name(),
                session.iterations(),
                &preview_source,
            ));

            stage = stage.next(&session, &self.config);
        }

        info!(
            session = %session.id,
            steps = session.iterations(),
            escalated = session.needs_human(),
            "session closed"
        );
        self.emit(RouterEvent::session_finished(&session));
        Ok(session)
    }

    /// Instantiates the agent for a stage; `None` means the pipeline is done.
    fn agent_for(&self, stage: &Stage) -> Option<Box<dyn Agent>> {
        match stage {
            Stage::Classify => Some(Box::new(Greeter::new(self.responder.clone()))),
            Stage::Specialist(kind) => Some(Box::new(SpecialistAgent::new(
                *kind,
                self.responder.clone(),
                self.knowledge.clone(),
                self.config.context_window,
            ))),
            Stage::Review => Some(Box::new(Reviewer::new(self.responder.clone()))),
            Stage::Escalate => Some(Box::new(EscalationAgent::new(self.responder.clone()))),
            Stage::Done => None,
        }
    }

    fn emit(&self, event: RouterEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}
