//! Message log and session types

use chrono::{DateTime, Utc};

/// First message of every session, inserted locally without a round trip
pub const GREETING: &str = "\u{1F44B} Hello! I'm here to help you with any questions or feedback about this event. What would you like to know?";

/// Sole log entry when a session could not be created
pub const INIT_APOLOGY: &str =
    "Sorry, there was an error initializing the chat. Please try again later.";

/// Shown when the query service replied without an answer or a message
pub const UNPROCESSED_FALLBACK: &str = "Sorry, I couldn't process your request.";

/// Shown when the query service could not be reached
pub const CONNECTION_FALLBACK: &str =
    "Sorry, there was an error connecting to the server. Please try again.";

/// Label used when the caller supplies none
pub const DEFAULT_LABEL: &str = "Event Chat";

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

/// One entry of the append-only message log
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub content: String,
    pub author: Author,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Author::User)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, Author::Assistant)
    }

    fn new(content: impl Into<String>, author: Author) -> Self {
        Self {
            content: content.into(),
            author,
            timestamp: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}

/// Server-issued handle scoping exchanges to one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub event_id: String,
    pub label: String,
}

impl Session {
    /// Leading part of the session id, for compact display
    pub fn short_id(&self) -> &str {
        match self.session_id.char_indices().nth(12) {
            Some((idx, _)) => &self.session_id[..idx],
            None => &self.session_id,
        }
    }
}
