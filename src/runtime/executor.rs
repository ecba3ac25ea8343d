//! Session runtime executor

use super::{Applied, Session, SessionHandle, SessionView};
use crate::agent::{AgentTransport, Dispatcher};
use crate::state_machine::{Event, SessionState, TransitionError};
use crate::transcript::Clock;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Event loop that owns a [`Session`] and runs its agent calls.
///
/// Agent calls run as spawned tasks whose result re-enters the loop as an
/// `AgentReplied` event, so submissions arriving meanwhile are seen while
/// the session is busy and refused.
pub struct SessionRuntime<T>
where
    T: AgentTransport + ?Sized + 'static,
{
    session_id: String,
    session: Session,
    dispatcher: Dispatcher<T>,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so the loop ends once every handle is dropped
    event_tx: mpsc::WeakSender<Event>,
    view_tx: watch::Sender<SessionView>,
}

impl<T> SessionRuntime<T>
where
    T: AgentTransport + ?Sized + 'static,
{
    pub fn new(dispatcher: Dispatcher<T>, clock: Arc<dyn Clock>) -> (Self, SessionHandle) {
        let session = Session::new(clock);
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (view_tx, view_rx) = watch::channel(session.view());

        let runtime = Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            session,
            dispatcher,
            event_rx,
            event_tx: event_tx.downgrade(),
            view_tx,
        };
        let handle = SessionHandle { event_tx, view_rx };
        (runtime, handle)
    }

    /// Start the runtime on the current tokio runtime
    pub fn spawn(dispatcher: Dispatcher<T>, clock: Arc<dyn Clock>) -> SessionHandle {
        let (runtime, handle) = Self::new(dispatcher, clock);
        tokio::spawn(runtime.run());
        handle
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "Starting session runtime");

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
        }

        tracing::info!(session_id = %self.session_id, "Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        let result = match event {
            Event::Submit { text } => self.session.submit(text),
            Event::SubmitDraft => self.session.submit_draft(),
            Event::AgentReplied { message } => self.session.resolve(message),
            Event::SetDraft { text } => {
                self.view_tx.send_replace(self.session.set_draft(text));
                return;
            }
            Event::QuickAction(action) => {
                self.view_tx.send_replace(self.session.quick_action(action));
                return;
            }
        };
        self.publish(result);
    }

    fn publish(&mut self, result: Result<Applied, TransitionError>) {
        let applied = match result {
            Ok(applied) => applied,
            Err(e) => {
                log_refusal(&self.session_id, self.session.state(), &e);
                return;
            }
        };

        self.view_tx.send_replace(applied.view);

        match applied.dispatch {
            Some(text) => self.start_request(text),
            None => tracing::debug!(
                session_id = %self.session_id,
                messages = self.session.log().len(),
                "Session view published"
            ),
        }
    }

    fn start_request(&mut self, text: String) {
        let Some(event_tx) = self.event_tx.upgrade() else {
            // Nobody can deliver the reply; close the turn here
            tracing::warn!(
                session_id = %self.session_id,
                "All session handles dropped, resolving request as connection lost"
            );
            let message = self.dispatcher.connection_lost();
            let result = self.session.resolve(message);
            self.publish(result);
            return;
        };
        let dispatcher = self.dispatcher.clone();
        let session_id = self.session_id.clone();

        tracing::debug!(session_id = %session_id, "Dispatching agent request");
        tokio::spawn(async move {
            let (message, outcome) = dispatcher.send_with_outcome(&text).await;
            tracing::debug!(session_id = %session_id, ?outcome, "Agent turn finished");
            if event_tx.send(Event::AgentReplied { message }).await.is_err() {
                tracing::warn!(session_id = %session_id, "Session closed before agent replied");
            }
        });
    }
}

fn log_refusal(session_id: &str, state: SessionState, error: &TransitionError) {
    match error {
        TransitionError::EmptyInput | TransitionError::Busy => {
            tracing::debug!(session_id = %session_id, ?state, reason = %error, "Submission ignored");
        }
        TransitionError::InvalidTransition(_) => {
            tracing::warn!(session_id = %session_id, ?state, error = %error, "Event refused");
        }
    }
}
