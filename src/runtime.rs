//! Runtime for driving a chat session
//!
//! The executor owns the [`Session`] and is its only writer. Hosts talk to
//! it through a [`SessionHandle`] and observe [`SessionView`] snapshots.

mod executor;
mod session;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use session::{Applied, Session};

use crate::quick_action::QuickAction;
use crate::state_machine::Event;
use crate::transcript::Message;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

/// Observable session state, published after every accepted event
#[derive(Debug, Clone)]
pub struct SessionView {
    /// Point-in-time copy of the log; never retained across appends
    pub messages: Arc<[Message]>,
    pub busy: bool,
    pub draft: String,
    /// Quick actions are offered until the first exchange
    pub quick_actions_visible: bool,
}

/// The session runtime has stopped
#[derive(Debug, Error)]
#[error("Session runtime is no longer running")]
pub struct SessionClosed;

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    event_tx: mpsc::Sender<Event>,
    view_rx: watch::Receiver<SessionView>,
}

impl SessionHandle {
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), SessionClosed> {
        self.send(Event::submit(text)).await
    }

    pub async fn submit_draft(&self) -> Result<(), SessionClosed> {
        self.send(Event::SubmitDraft).await
    }

    pub async fn set_draft(&self, text: impl Into<String>) -> Result<(), SessionClosed> {
        self.send(Event::set_draft(text)).await
    }

    pub async fn quick_action(&self, action: QuickAction) -> Result<(), SessionClosed> {
        self.send(Event::QuickAction(action)).await
    }

    /// Latest published snapshot
    pub fn view(&self) -> SessionView {
        self.view_rx.borrow().clone()
    }

    /// Receiver notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view_rx.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`
    #[cfg(test)]
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionView) -> bool,
    ) -> Result<SessionView, SessionClosed> {
        let mut rx = self.view_rx.clone();
        let view = rx.wait_for(predicate).await.map_err(|_| SessionClosed)?;
        Ok(view.clone())
    }

    async fn send(&self, event: Event) -> Result<(), SessionClosed> {
        self.event_tx.send(event).await.map_err(|_| SessionClosed)
    }
}
