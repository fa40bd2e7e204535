//! Shared fixtures for integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use campus_desk::message::Message;
use campus_desk::responder::{Responder, ResponderError};

/// One scripted outcome for a responder call.
#[allow(dead_code)]
pub enum ScriptedReply {
    Text(String),
    Fail(String),
}

/// Responder fake that pops queued replies in order and records every
/// request it receives.
pub struct ScriptedResponder {
    replies: Mutex<VecDeque<ScriptedReply>>,
    seen: Mutex<Vec<Vec<Message>>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedResponder {
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_script(
            replies
                .into_iter()
                .map(|reply| ScriptedReply::Text(reply.into()))
                .collect(),
        )
    }

    pub fn from_script(script: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(script.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of responder calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every outbound message sequence, in call order.
    pub fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl Responder for ScriptedResponder {
    async fn complete(&self, messages: &[Message]) -> Result<String, ResponderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().expect("seen lock").push(messages.to_vec());
        match self.replies.lock().expect("replies lock").pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(body)) => Err(ResponderError::Api { status: 503, body }),
            None => panic!("scripted responder ran out of replies"),
        }
    }
}
