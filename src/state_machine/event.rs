//! Events that can occur in a session

use crate::quick_action::QuickAction;
use crate::transcript::Message;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit { text: String },
    /// Submit whatever is currently in the draft
    SubmitDraft,
    SetDraft { text: String },
    QuickAction(QuickAction),

    // Dispatcher events
    AgentReplied { message: Message },
}

impl Event {
    pub fn submit(text: impl Into<String>) -> Self {
        Event::Submit { text: text.into() }
    }

    pub fn set_draft(text: impl Into<String>) -> Self {
        Event::SetDraft { text: text.into() }
    }
}
