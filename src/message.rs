// message.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let role_str = match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        write!(f, "{}", role_str)
    }
}

/// Identity of a message inside the chat state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Builds a fresh id of the form `<prefix>-<uuid>`.
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}-{}", prefix, Uuid::new_v4()))
    }

    pub fn user() -> Self {
        Self::generate("user")
    }

    pub fn assistant() -> Self {
        Self::generate("assistant")
    }

    pub fn welcome() -> Self {
        Self::generate("assistant-welcome")
    }

    pub fn error() -> Self {
        Self::generate("error")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    /// Label shown above the message, e.g. "Assistant" or "System Error".
    pub agent_name: Option<String>,
    /// Set while the message is still being typed out.
    #[serde(default)]
    pub is_loading: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::user(),
            role: Role::User,
            content: content.into(),
            agent_name: None,
            is_loading: false,
            created_at: Utc::now(),
        }
    }

    /// An empty assistant message waiting for its content.
    pub fn pending_assistant(id: MessageId, agent_name: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: String::new(),
            agent_name: Some(agent_name.into()),
            is_loading: true,
            created_at: Utc::now(),
        }
    }

    pub fn error(error_content: &str) -> Self {
        Self {
            id: MessageId::error(),
            role: Role::Assistant,
            content: format!("Error: {}", error_content),
            agent_name: Some("System Error".to_string()),
            is_loading: false,
            created_at: Utc::now(),
        }
    }

    /// Label used when rendering the message.
    pub fn label(&self) -> &str {
        match (&self.agent_name, self.role) {
            (Some(name), _) => name.as_str(),
            (None, Role::User) => "You",
            (None, Role::Assistant) => "Assistant",
        }
    }
}
