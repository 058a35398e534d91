//! Transcript model for a chat session
//!
//! A transcript is the ordered, append-only list of messages exchanged in one
//! session. Messages are never edited or removed; the transcript lives as long
//! as the session and is dropped with it.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Author of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text typed by the person using the assistant
    User,
    /// Reply produced by the remote model (or the session greeting)
    Assistant,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transcript entry
///
/// Fields are private so that role, id and timestamp stay exactly as they
/// were at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    id: String,
    content: String,
    role: Role,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a new message stamped with a fresh id and the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use iexpert::transcript::{Message, Role};
    ///
    /// let msg = Message::new(Role::User, "Hello");
    /// assert_eq!(msg.role(), Role::User);
    /// assert_eq!(msg.content(), "Hello");
    /// ```
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
        }
    }

    /// Creates a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Unique identifier of this message
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Message text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Author of the message
    pub fn role(&self) -> Role {
        self.role
    }

    /// Creation time
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Creation time formatted as local `HH:MM` for display
    pub fn display_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string()
    }
}

/// Ordered, append-only message sequence
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message to the end of the transcript
    ///
    /// # Examples
    ///
    /// ```
    /// use iexpert::transcript::{Message, Transcript};
    ///
    /// let mut transcript = Transcript::new();
    /// transcript.append(Message::user("first"));
    /// transcript.append(Message::assistant("second"));
    /// assert_eq!(transcript.all()[1].content(), "second");
    /// ```
    pub fn append(&mut self, message: Message) {
        tracing::trace!(id = %message.id(), role = %message.role(), "Appending message");
        self.messages.push(message);
    }

    /// All messages in append order
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// Most recently appended message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterates messages in append order
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
