//! Conversation message primitives.
//!
//! Messages are the unit of exchange between the router, the agents, and the
//! [`crate::responder::Responder`]. Each message pairs a [`Role`] with text
//! content; the session's transcript is an append-only sequence of them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The sender of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The student asking the question.
    User,
    /// A model-generated reply.
    Assistant,
    /// An instruction prompt assembled by the router.
    System,
}

impl Role {
    /// Wire-format name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role-tagged message.
///
/// # Examples
///
/// ```
/// use campus_desk::message::{Message, Role};
///
/// let msg = Message::user("Where do I pay my fees?");
/// assert_eq!(msg.role, Role::User);
/// assert_eq!(msg.content, "Where do I pay my fees?");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// A student/user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// A model reply.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// An instruction prompt.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// True when this message is an instruction prompt.
    ///
    /// The HTTP responder lifts system messages out of the turn list into the
    /// request's dedicated system field.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}
