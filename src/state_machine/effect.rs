//! Effects produced by state transitions

use crate::transcript::Message;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Log a user message, stamped at execution time
    AppendUserMessage { content: String },

    /// Log a message the dispatcher produced
    AppendAgentMessage { message: Message },

    /// Replace the draft input
    ReplaceDraft { text: String },

    ClearDraft,

    /// Send the text to the remote agent
    Dispatch { text: String },
}

impl Effect {
    pub fn append_user(content: impl Into<String>) -> Self {
        Effect::AppendUserMessage {
            content: content.into(),
        }
    }

    pub fn dispatch(text: impl Into<String>) -> Self {
        Effect::Dispatch { text: text.into() }
    }
}
