//! Message types for conversations

use serde::{Deserialize, Serialize};

/// The role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (instructions)
    System,
    /// User message
    User,
    /// Assistant message
    Assistant,
}

impl Role {
    /// Wire name shared by both vendors
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The text content of the message
    pub content: String,
}

impl Message {
    /// Create a text message with the given role
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// One entry of a message-sequence prompt
///
/// Raw strings are accepted alongside structured messages and are treated as
/// user turns when the prompt is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptEntry {
    /// A bare string
    Text(String),
    /// A structured message
    Message(Message),
}

impl PromptEntry {
    /// Turn the entry into a message, mapping bare strings to user turns
    pub fn into_message(self) -> Message {
        match self {
            PromptEntry::Text(text) => Message::user(text),
            PromptEntry::Message(message) => message,
        }
    }
}

impl From<Message> for PromptEntry {
    fn from(message: Message) -> Self {
        PromptEntry::Message(message)
    }
}

impl From<&str> for PromptEntry {
    fn from(s: &str) -> Self {
        PromptEntry::Text(s.to_string())
    }
}

impl From<String> for PromptEntry {
    fn from(s: String) -> Self {
        PromptEntry::Text(s)
    }
}

/// The input to a generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prompt {
    /// A single user turn
    Text(String),
    /// An ordered conversation
    Messages(Vec<PromptEntry>),
}

impl Prompt {
    /// Normalize into an ordered sequence of messages
    ///
    /// A plain string becomes exactly one user message. Order is preserved.
    pub fn to_messages(&self) -> Vec<Message> {
        match self {
            Prompt::Text(text) => vec![Message::user(text.clone())],
            Prompt::Messages(entries) => entries
                .iter()
                .cloned()
                .map(PromptEntry::into_message)
                .collect(),
        }
    }

    /// Whether the prompt carries no content at all
    pub fn is_empty(&self) -> bool {
        match self {
            Prompt::Text(text) => text.trim().is_empty(),
            Prompt::Messages(entries) => entries.is_empty(),
        }
    }
}

impl From<&str> for Prompt {
    fn from(s: &str) -> Self {
        Prompt::Text(s.to_string())
    }
}

impl From<String> for Prompt {
    fn from(s: String) -> Self {
        Prompt::Text(s)
    }
}

impl From<Vec<Message>> for Prompt {
    fn from(messages: Vec<Message>) -> Self {
        Prompt::Messages(messages.into_iter().map(PromptEntry::Message).collect())
    }
}

impl From<Vec<PromptEntry>> for Prompt {
    fn from(entries: Vec<PromptEntry>) -> Self {
        Prompt::Messages(entries)
    }
}
