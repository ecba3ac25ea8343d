//! Turns one user submission into exactly one agent message

use super::types::{ChatRequest, RequestContext};
use super::AgentTransport;
use crate::transcript::{Clock, Message};
use std::sync::Arc;

/// Shown when the agent answered without a reply
pub const NO_RESPONSE_TEXT: &str = "System Error: No response received.";

/// Shown when the agent could not be reached or answered garbage
pub const CONNECTION_LOST_TEXT: &str = "⚠️ Connection Lost. Check backend server.";

/// How a dispatched turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Replied,
    EmptyReply,
    TransportFailed,
}

/// Stateless per call; the session guarantees one call at a time.
pub struct Dispatcher<T: AgentTransport + ?Sized> {
    transport: Arc<T>,
    context: RequestContext,
    clock: Arc<dyn Clock>,
}

impl<T: AgentTransport + ?Sized> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            context: self.context.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T: AgentTransport + ?Sized> Dispatcher<T> {
    pub fn new(transport: Arc<T>, context: RequestContext, clock: Arc<dyn Clock>) -> Self {
        Self {
            transport,
            context,
            clock,
        }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Send `user_text` to the agent. Never fails: degraded outcomes come
    /// back as agent messages with fixed fallback text.
    #[cfg(test)]
    pub async fn send(&self, user_text: &str) -> Message {
        self.send_with_outcome(user_text).await.0
    }

    pub async fn send_with_outcome(&self, user_text: &str) -> (Message, Outcome) {
        let request = ChatRequest::new(user_text, &self.context);

        let (content, outcome) = match self.transport.post_chat(&request).await {
            Ok(response) => match response.reply_text() {
                Some(reply) => (reply.to_string(), Outcome::Replied),
                None => {
                    tracing::warn!("Agent responded without a reply");
                    (NO_RESPONSE_TEXT.to_string(), Outcome::EmptyReply)
                }
            },
            // Logged by LoggingTransport
            Err(_) => return (self.connection_lost(), Outcome::TransportFailed),
        };

        (Message::agent(content, self.clock.as_ref()), outcome)
    }

    /// Fallback message for a turn the agent never saw
    pub fn connection_lost(&self) -> Message {
        Message::agent(CONNECTION_LOST_TEXT, self.clock.as_ref())
    }
}
