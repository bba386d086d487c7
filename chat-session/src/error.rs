//! Error types for chat-session
//!
//! Transports convert every backend failure into [`InitError`] or
//! [`QueryError`]; the controller turns those into log entries and never lets
//! them escape as unhandled failures.

use crate::message::{CONNECTION_FALLBACK, UNPROCESSED_FALLBACK};

/// The controller cannot start: the caller must send the user elsewhere
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("No credential available; sign in first")]
    MissingCredential,

    #[error("No event selected")]
    MissingEventId,
}

/// A chat session could not be created
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("Credential rejected by the event backend")]
    Unauthorized,

    #[error("Event not found")]
    NotFound,

    #[error("Event backend replied without a session id")]
    MissingSessionId,

    #[error("Event backend error ({}): {}", .status, .message.as_deref().unwrap_or("no details"))]
    Server { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,
}

/// A question could not be answered
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Query service error ({}): {}", .status, .message.as_deref().unwrap_or("no answer"))]
    Server { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,
}

impl QueryError {
    /// Text shown in the log in place of an answer
    pub fn fallback_text(&self) -> &str {
        match self {
            QueryError::Server {
                message: Some(message),
                ..
            } => message,
            QueryError::Server { message: None, .. } => UNPROCESSED_FALLBACK,
            QueryError::Network(_) | QueryError::Timeout => CONNECTION_FALLBACK,
        }
    }
}

/// Errors returned by [`ChatController::initialize`](crate::ChatController::initialize)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("Chat session could not be initialized: {0}")]
    Initialization(#[from] InitError),

    #[error("Chat session already initialized")]
    AlreadyInitialized,

    #[error("Chat controller was torn down")]
    TornDown,
}

/// Why a send intent produced no exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendRejected {
    #[error("Nothing to send")]
    EmptyInput,

    #[error("Still waiting for the previous answer")]
    Busy,

    #[error("No chat session")]
    NoSession,

    #[error("Chat controller was torn down")]
    TornDown,
}

/// Speech recognition failures, as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechFailure {
    #[error("No speech was detected")]
    NoSpeech,

    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("No microphone available")]
    AudioCapture,

    #[error("Speech service unreachable")]
    Network,

    #[error("Speech recognition aborted")]
    Aborted,

    #[error("Speech recognition failed: {0}")]
    Other(String),
}

impl SpeechFailure {
    /// Map a platform error code (`no-speech`, `not-allowed`, ...) to a failure
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => SpeechFailure::NoSpeech,
            "not-allowed" | "service-not-allowed" => SpeechFailure::PermissionDenied,
            "audio-capture" => SpeechFailure::AudioCapture,
            "network" => SpeechFailure::Network,
            "aborted" => SpeechFailure::Aborted,
            other => SpeechFailure::Other(other.to_string()),
        }
    }
}
