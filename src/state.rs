// state.rs
use crate::message::{Message, MessageId};
use std::collections::HashMap;

/// Label given to assistant messages started without one.
pub const DEFAULT_AGENT_NAME: &str = "Assistant";

/// Inputs to the chat reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    /// The user sent a message.
    AddUserMessage(Message),

    /// An assistant reply begins; creates an empty loading message.
    StartAssistantMessage {
        id: MessageId,
        agent_name: Option<String>,
    },

    /// One chunk of simulated typing.
    AppendDelta { id: MessageId, delta: String },

    UpdateAgentName { id: MessageId, agent_name: String },

    /// Typing finished for `id`.
    CompleteAssistantMessage { id: MessageId },

    /// The request failed; appends a "System Error" message.
    SetError { error_content: String },

    /// Drop every message and go back to the initial state.
    Reset,
}

impl ChatAction {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatAction::AddUserMessage(_) => "add_user_message",
            ChatAction::StartAssistantMessage { .. } => "start_assistant_message",
            ChatAction::AppendDelta { .. } => "append_delta",
            ChatAction::UpdateAgentName { .. } => "update_agent_name",
            ChatAction::CompleteAssistantMessage { .. } => "complete_assistant_message",
            ChatAction::SetError { .. } => "set_error",
            ChatAction::Reset => "reset",
        }
    }
}

/// Message history plus loading status.
///
/// Every id in `order` has an entry in `messages`, and at most one message
/// is loading at a time: the one named by `loading_message_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    messages: HashMap<MessageId, Message>,
    order: Vec<MessageId>,
    is_loading: bool,
    loading_message_id: Option<MessageId>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn loading_message_id(&self) -> Option<&MessageId> {
        self.loading_message_id.as_ref()
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Messages in display order.
    pub fn ordered_messages(&self) -> Vec<&Message> {
        self.order
            .iter()
            .filter_map(|id| self.messages.get(id))
            .collect()
    }

    /// Applies one action to the state.
    pub fn reduce(&mut self, action: ChatAction) {
        match action {
            ChatAction::AddUserMessage(message) => {
                self.is_loading = true;
                self.insert(message);
            }
            ChatAction::StartAssistantMessage { id, agent_name } => {
                self.clear_loading_flag();
                let agent_name = agent_name.unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string());
                self.insert(Message::pending_assistant(id.clone(), agent_name));
                self.is_loading = true;
                self.loading_message_id = Some(id);
            }
            ChatAction::AppendDelta { id, delta } => {
                if let Some(message) = self.streaming_mut(&id) {
                    message.content.push_str(&delta);
                }
            }
            ChatAction::UpdateAgentName { id, agent_name } => {
                if let Some(message) = self.streaming_mut(&id) {
                    message.agent_name = Some(agent_name);
                }
            }
            ChatAction::CompleteAssistantMessage { id } => {
                if self.loading_message_id.as_ref() != Some(&id) {
                    return;
                }
                self.clear_loading_flag();
                self.is_loading = false;
                self.loading_message_id = None;
            }
            ChatAction::SetError { error_content } => {
                self.clear_loading_flag();
                self.is_loading = false;
                self.loading_message_id = None;
                self.insert(Message::error(&error_content));
            }
            ChatAction::Reset => {
                *self = Self::default();
            }
        }
    }

    fn insert(&mut self, message: Message) {
        let id = message.id.clone();
        if self.messages.insert(id.clone(), message).is_none() {
            self.order.push(id);
        }
    }

    /// The message with `id`, only if it is the one currently being typed.
    fn streaming_mut(&mut self, id: &MessageId) -> Option<&mut Message> {
        if self.loading_message_id.as_ref() != Some(id) {
            return None;
        }
        self.messages.get_mut(id)
    }

    fn clear_loading_flag(&mut self) {
        if let Some(id) = &self.loading_message_id {
            if let Some(message) = self.messages.get_mut(id) {
                message.is_loading = false;
            }
        }
    }
}
