//! Pure state transition function

use super::{Effect, Event, SessionState};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons an event is refused. The session is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Agent is busy, cannot accept message until the current request resolves")]
    Busy,
    #[error("Message is empty")]
    EmptyInput,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function.
///
/// `draft` is the current uncommitted input, read by `SubmitDraft`.
pub fn transition(
    state: &SessionState,
    draft: &str,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Draft edits never touch the log or the busy flag
        (_, Event::SetDraft { text }) => {
            Ok(TransitionResult::new(*state).with_effect(Effect::ReplaceDraft { text }))
        }
        (_, Event::QuickAction(action)) => Ok(TransitionResult::new(*state).with_effect(
            Effect::ReplaceDraft {
                text: action.phrase().to_string(),
            },
        )),

        (SessionState::Submitting, Event::Submit { .. } | Event::SubmitDraft) => {
            Err(TransitionError::Busy)
        }

        (SessionState::Idle, Event::Submit { text }) => accept_submission(text),
        (SessionState::Idle, Event::SubmitDraft) => accept_submission(draft.to_string()),

        (SessionState::Submitting, Event::AgentReplied { message }) => {
            Ok(TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::AppendAgentMessage { message }))
        }

        (SessionState::Idle, Event::AgentReplied { .. }) => Err(
            TransitionError::InvalidTransition("agent reply with no request in flight".to_string()),
        ),
    }
}

fn accept_submission(text: String) -> Result<TransitionResult, TransitionError> {
    if text.trim().is_empty() {
        return Err(TransitionError::EmptyInput);
    }
    Ok(TransitionResult::new(SessionState::Submitting)
        .with_effect(Effect::append_user(text.clone()))
        .with_effect(Effect::ClearDraft)
        .with_effect(Effect::dispatch(text)))
}
