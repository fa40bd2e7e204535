//! # Campus Desk: Intent-Routed Student Support Pipeline
//!
//! Campus Desk is a small conversational routing pipeline for a university
//! student-support desk. A fixed sequence of agent steps walks one student
//! query through classification, exactly one domain specialist, a quality
//! review, and an optional escalation hand-off, delegating all text
//! generation to a hosted model behind the [`responder::Responder`] trait.
//!
//! ## Pipeline Topology
//!
//! ```text
//! query ──▶ greeter (classify intent)
//!              │
//!              ▼
//!        one specialist (academic_advisor | finance | student_life | it_support)
//!              │            ── iteration ceiling check ──▶ done
//!              ▼
//!        quality_reviewer ──▶ done
//!              │
//!              ▼ (ESCALATE: ...)
//!        escalation ──▶ done
//! ```
//!
//! The topology is acyclic per request; the iteration ceiling in
//! [`routing::Stage::next`] is a safety invariant kept explicit anyway.
//!
//! ## Core Concepts
//!
//! - **Agents**: Async units of work that read the current [`session::Session`]
//!   and return an [`session::AgentUpdate`] the router merges back in.
//! - **Routing**: A pure, total function from classified intent to specialist,
//!   plus a sum-type stage machine — no graph library, no hidden edges.
//! - **Responder**: The external text-completion collaborator. Stateless and
//!   shareable; swap in a scripted fake for tests.
//! - **Knowledge**: A static category → facts mapping, serialized verbatim
//!   into specialist prompts. No retrieval, no indexing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use campus_desk::responder::AnthropicResponder;
//! use campus_desk::router::SupportDesk;
//!
//! # async fn example() -> miette::Result<()> {
//! let responder = Arc::new(AnthropicResponder::from_env()?);
//! let desk = SupportDesk::new(responder);
//!
//! let session = desk.run("When is the registration deadline for Spring 2026?").await?;
//! for message in session.messages() {
//!     println!("[{}] {}", message.role, message.content);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`message`] - Conversation message primitives
//! - [`session`] - The per-query session record and step-update merging
//! - [`routing`] - Intent labels, specialist dispatch, and the stage machine
//! - [`agents`] - The agent trait and the four pipeline step families
//! - [`prompts`] - Prompt assembly and marker-token parsing
//! - [`knowledge`] - The static knowledge base collaborator
//! - [`responder`] - The hosted-model collaborator and its HTTP client
//! - [`router`] - The support desk runner that sequences everything
//! - [`events`] - Structured per-step events for observability
//! - [`config`] - Router tunables
//! - [`telemetry`] - Tracing subscriber setup for binaries

pub mod agents;
pub mod config;
pub mod events;
pub mod knowledge;
pub mod message;
pub mod prompts;
pub mod responder;
pub mod router;
pub mod routing;
pub mod session;
pub mod telemetry;
