//! Conversation transcript: messages and the append-only log

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Greeting placed at the top of every session
pub const WELCOME_MESSAGE: &str =
    "Welcome to LayoverOS. I am connected to the airport grid. How can I help you today?";

/// Display format for message timestamps (e.g. `09:41 AM`)
const TIMESTAMP_FORMAT: &str = "%I:%M %p";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Agent,
}

/// A single transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
    timestamp: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn user(content: impl Into<String>, clock: &dyn Clock) -> Self {
        Self::new(Role::User, content, clock.timestamp())
    }

    pub fn agent(content: impl Into<String>, clock: &dyn Clock) -> Self {
        Self::new(Role::Agent, content, clock.timestamp())
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Source of message creation times
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Creation time rendered with the single display format
    fn timestamp(&self) -> String {
        format_timestamp(&self.now())
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Append-only, insertion-ordered message log.
///
/// Entries are never removed or reordered. The first entry is always the
/// welcome message.
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Start a log seeded with the welcome message
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            messages: vec![Message::agent(WELCOME_MESSAGE, clock)],
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// Point-in-time copy for readers outside the session
    pub fn snapshot(&self) -> Arc<[Message]> {
        Arc::from(self.all())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True while nothing but the welcome has been logged
    pub fn only_welcome(&self) -> bool {
        self.messages.len() == 1
    }
}
