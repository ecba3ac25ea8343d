//! Owned session object: log, draft and state machine together

use super::SessionView;
use crate::quick_action::QuickAction;
use crate::state_machine::{transition, Effect, Event, SessionState, TransitionError};
use crate::transcript::{Clock, Message, MessageLog};
use std::sync::Arc;

/// Outcome of an accepted event
#[derive(Debug)]
pub struct Applied {
    pub view: SessionView,
    /// Text to send to the agent, when the event started a request
    pub dispatch: Option<String>,
}

/// Single-writer owner of the message log and session state.
///
/// Every mutation goes through [`transition`]; refused events leave the
/// session exactly as it was.
pub struct Session {
    state: SessionState,
    log: MessageLog,
    draft: String,
    clock: Arc<dyn Clock>,
}

impl Session {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: SessionState::Idle,
            log: MessageLog::new(clock.as_ref()),
            draft: String::new(),
            clock,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    #[cfg(test)]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            messages: self.log.snapshot(),
            busy: self.state.is_busy(),
            draft: self.draft.clone(),
            quick_actions_visible: self.log.only_welcome(),
        }
    }

    fn apply(&mut self, event: Event) -> Result<Applied, TransitionError> {
        let result = transition(&self.state, &self.draft, event)?;
        self.state = result.new_state;

        let mut dispatch = None;
        for effect in result.effects {
            match effect {
                Effect::AppendUserMessage { content } => {
                    self.log.append(Message::user(content, self.clock.as_ref()));
                }
                Effect::AppendAgentMessage { message } => self.log.append(message),
                Effect::ReplaceDraft { text } => self.draft = text,
                Effect::ClearDraft => self.draft.clear(),
                Effect::Dispatch { text } => dispatch = Some(text),
            }
        }

        Ok(Applied {
            view: self.view(),
            dispatch,
        })
    }

    pub fn submit(&mut self, text: impl Into<String>) -> Result<Applied, TransitionError> {
        self.apply(Event::submit(text))
    }

    pub fn submit_draft(&mut self) -> Result<Applied, TransitionError> {
        self.apply(Event::SubmitDraft)
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> SessionView {
        self.apply_infallible(Event::set_draft(text))
    }

    pub fn quick_action(&mut self, action: QuickAction) -> SessionView {
        self.apply_infallible(Event::QuickAction(action))
    }

    /// Record the dispatcher's message and leave the busy state
    pub fn resolve(&mut self, message: Message) -> Result<Applied, TransitionError> {
        self.apply(Event::AgentReplied { message })
    }

    fn apply_infallible(&mut self, event: Event) -> SessionView {
        match self.apply(event) {
            Ok(applied) => applied.view,
            Err(_) => self.view(),
        }
    }
}
