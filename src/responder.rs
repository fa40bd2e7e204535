//! The hosted-model collaborator.
//!
//! [`Responder`] is the seam between the router and whatever produces text:
//! the real Anthropic Messages API in the binary, a scripted fake in tests.
//! Responders are stateless and may be shared across concurrent sessions
//! behind an `Arc` without synchronization.
//!
//! A responder failure is the one fault the pipeline does not absorb: it
//! propagates to the caller as-is. Marker parsing degrades silently, network
//! calls do not.

use std::time::Duration;

use async_trait::async_trait;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::message::Message;

const BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Text-completion collaborator: an ordered, role-tagged message sequence in,
/// one text reply out.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, ResponderError>;
}

/// Failures surfaced by a responder. Never masked; the router aborts the
/// session and hands the error to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum ResponderError {
    #[error("ANTHROPIC_API_KEY is not set")]
    #[diagnostic(
        code(campus_desk::responder::missing_api_key),
        help("Export ANTHROPIC_API_KEY or add it to a .env file.")
    )]
    MissingApiKey,

    #[error("failed to construct HTTP client")]
    #[diagnostic(code(campus_desk::responder::client))]
    Client { source: reqwest::Error },

    #[error("request to the model API failed")]
    #[diagnostic(
        code(campus_desk::responder::transport),
        help("Check network connectivity and the configured base URL.")
    )]
    Transport { source: reqwest::Error },

    #[error("model API returned {status}: {body}")]
    #[diagnostic(code(campus_desk::responder::api))]
    Api { status: u16, body: String },

    #[error("failed to decode the model API response")]
    #[diagnostic(code(campus_desk::responder::decode))]
    Decode { source: reqwest::Error },

    #[error("model reply carried no text content")]
    #[diagnostic(code(campus_desk::responder::empty_reply))]
    EmptyReply,
}

/// Direct REST client for the Anthropic Messages API.
///
/// System-role messages are lifted out of the turn list into the request's
/// dedicated `system` field; user/assistant messages become turns. Requests
/// carry a hard timeout — a hung upstream call must not hang the pipeline.
pub struct AnthropicResponder {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicResponder {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ResponderError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ResponderError::Client { source })?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Builds a responder from `ANTHROPIC_API_KEY` and, when set,
    /// `CAMPUS_DESK_MODEL`. Reads a `.env` file if one is present.
    pub fn from_env() -> Result<Self, ResponderError> {
        dotenvy::dotenv().ok();
        let api_key =
            std::env::var("ANTHROPIC_API_KEY").map_err(|_| ResponderError::MissingApiKey)?;
        let mut responder = Self::new(api_key)?;
        if let Ok(model) = std::env::var("CAMPUS_DESK_MODEL") {
            responder.model = model;
        }
        Ok(responder)
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the client at a different endpoint (gateways, mock servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl Responder for AnthropicResponder {
    async fn complete(&self, messages: &[Message]) -> Result<String, ResponderError> {
        let (system, turns) = split_system(messages);
        debug!(
            turns = turns.len(),
            has_system = system.is_some(),
            model = %self.model,
            "dispatching completion request"
        );

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system,
            messages: turns,
        };

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|source| ResponderError::Transport { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResponderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|source| ResponderError::Decode { source })?;

        let text = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            return Err(ResponderError::EmptyReply);
        }
        Ok(text)
    }
}

/// Lifts system messages into one joined system string and keeps the rest as
/// wire turns, preserving order.
fn split_system(messages: &[Message]) -> (Option<String>, Vec<WireMessage<'_>>) {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.is_system())
        .map(|m| m.content.as_str())
        .collect();
    let turns = messages
        .iter()
        .filter(|m| !m.is_system())
        .map(|m| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        })
        .collect();
    let system = if system.is_empty() {
        None
    } else {
        Some(system.join("\n\n"))
    };
    (system, turns)
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_messages_lift_out_of_the_turn_list() {
        let messages = vec![
            Message::system("first instruction"),
            Message::user("hello"),
            Message::system("second instruction"),
            Message::assistant("hi"),
        ];
        let (system, turns) = split_system(&messages);
        assert_eq!(
            system.as_deref(),
            Some("first instruction\n\nsecond instruction")
        );
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, "user");
        assert_eq!(turns[1].role, "assistant");
    }

    #[test]
    fn no_system_messages_means_no_system_field() {
        let messages = vec![Message::user("hello")];
        let (system, turns) = split_system(&messages);
        assert!(system.is_none());
        assert_eq!(turns.len(), 1);
    }

    #[test]
    fn request_serialization_skips_absent_system() {
        let request = MessagesRequest {
            model: "test-model",
            max_tokens: 16,
            temperature: 0.3,
            system: None,
            messages: vec![WireMessage {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_string(&request).expect("serialize");
        assert!(!json.contains("system"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
