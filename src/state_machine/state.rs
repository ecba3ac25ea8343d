//! Session state types

use serde::{Deserialize, Serialize};

/// Chat session state. Failures are carried as message content, so there
/// is no error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    /// A user message was accepted and its agent call is outstanding
    Submitting,
}

impl SessionState {
    pub fn is_busy(self) -> bool {
        matches!(self, SessionState::Submitting)
    }
}
