//! Wire types for the agent service

use serde::{Deserialize, Serialize};

/// Situational fields sent with every request.
///
/// These belong to the session, not to individual messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_location: String,
    pub airport_code: String,
    /// Conversation key on the agent side; omitted from the body when unset
    pub thread_id: Option<String>,
}

impl RequestContext {
    pub fn new(user_location: impl Into<String>, airport_code: impl Into<String>) -> Self {
        Self {
            user_location: user_location.into(),
            airport_code: airport_code.into(),
            thread_id: None,
        }
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }
}

/// POST body for the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_location: String,
    pub airport_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, context: &RequestContext) -> Self {
        Self {
            message: message.into(),
            user_location: context.user_location.clone(),
            airport_code: context.airport_code.clone(),
            thread_id: context.thread_id.clone(),
        }
    }
}

/// Chat endpoint reply. Every field is optional so `{}` still parses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub history: Vec<String>,
}

impl ChatResponse {
    #[cfg(test)]
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            history: Vec::new(),
        }
    }

    /// Reply text, if the agent actually said something
    pub fn reply_text(&self) -> Option<&str> {
        self.response.as_deref().filter(|text| !text.is_empty())
    }
}

/// Root endpoint payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
}

/// Reachability of the agent service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Online { status: String },
    Offline { reason: String },
}

impl HealthStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, HealthStatus::Online { .. })
    }
}
