//! Remote agent client
//!
//! The agent is an opaque HTTP service: one request per user turn, one
//! textual reply back.

mod dispatcher;
mod error;
mod http;
mod types;

pub use dispatcher::Dispatcher;
pub use error::TransportError;

#[cfg(test)]
pub use dispatcher::{CONNECTION_LOST_TEXT, NO_RESPONSE_TEXT};
#[cfg(test)]
pub use error::TransportErrorKind;
pub use http::HttpTransport;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Wire-level access to the agent service
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Send one chat turn
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;

    /// Probe service reachability
    async fn health(&self) -> HealthStatus;
}

#[async_trait]
impl<T: AgentTransport + ?Sized> AgentTransport for Arc<T> {
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        (**self).post_chat(request).await
    }

    async fn health(&self) -> HealthStatus {
        (**self).health().await
    }
}

/// Logging wrapper for agent transports
pub struct LoggingTransport {
    inner: Arc<dyn AgentTransport>,
    endpoint: String,
}

impl LoggingTransport {
    pub fn new(inner: Arc<dyn AgentTransport>, endpoint: impl Into<String>) -> Self {
        Self {
            inner,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl AgentTransport for LoggingTransport {
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.post_chat(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    has_reply = response.reply_text().is_some(),
                    "Agent request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.label(),
                    error = %e.message,
                    "Agent request failed"
                );
            }
        }

        result
    }

    async fn health(&self) -> HealthStatus {
        let status = self.inner.health().await;
        tracing::debug!(endpoint = %self.endpoint, online = status.is_online(), "Health probe");
        status
    }
}
