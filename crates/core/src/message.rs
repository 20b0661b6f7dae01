//! Message and Context domain types.
//!
//! A [`Message`] is one utterance. A [`Context`] is the chronological log of
//! messages for one conversation thread (or one knowledge/tool sub-history).
//! Both render to the plain-text form embedded into prompts.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// Retrieved reference material
    Knowledge,
    /// Tool invocation and its result
    Tool,
}

impl Role {
    /// Every role, in legend order.
    pub const ALL: [Role; 4] = [Role::User, Role::Assistant, Role::Knowledge, Role::Tool];

    /// Upper-case name used in rendered prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
            Role::Knowledge => "KNOWLEDGE",
            Role::Tool => "TOOL",
        }
    }

    /// Explanation of the role, shown to the model in the role legend.
    pub fn description(&self) -> &'static str {
        match self {
            Role::User => "The person making requests. Their messages are the requests to resolve.",
            Role::Assistant => "The AI assistant. Its messages are earlier answers to the user.",
            Role::Knowledge => {
                "Reference information retrieved for the user's requests. Treat it as supporting facts."
            }
            Role::Tool => "A tool invoked on the user's behalf, with its input and the result it returned.",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render the role legend: one `\t- NAME: description` line per role.
pub fn role_legend() -> String {
    Role::ALL
        .iter()
        .map(|role| format!("\t- {}: {}", role, role.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single utterance. Two messages with the same role and text are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Who produced this message
    pub role: Role,

    /// The text content
    pub text: String,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a new assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Create a knowledge message.
    pub fn knowledge(text: impl Into<String>) -> Self {
        Self::new(Role::Knowledge, text)
    }

    /// Create a tool result message.
    pub fn tool(text: impl Into<String>) -> Self {
        Self::new(Role::Tool, text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]\n{}\n", self.role, self.text)
    }
}

/// An append-only, ordered log of messages.
///
/// Order is the chronological dialogue and is never rearranged; entries are
/// never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    messages: Vec<Message>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to the end of the log.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// A copy of this context with value-duplicates collapsed, keeping the
    /// first occurrence of each message in its original position.
    pub fn distinct(&self) -> Context {
        let mut seen = HashSet::with_capacity(self.messages.len());
        let messages = self
            .messages
            .iter()
            .filter(|m| seen.insert(*m))
            .cloned()
            .collect();
        Context { messages }
    }
}

impl FromIterator<Message> for Context {
    fn from_iter<T: IntoIterator<Item = Message>>(iter: T) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{message}")?;
        }
        Ok(())
    }
}
