//! Transport seam between the controller and the two backends
//!
//! Implementations perform the HTTP calls (reqwest natively, gloo-net in the
//! browser) and hand the raw status and body to [`classify_init_response`] /
//! [`classify_query_response`], so every client interprets replies the same
//! way.

use shared::{ErrorBody, QueryResponse, SessionInitResponse};

use crate::error::{InitError, QueryError};

/// Result of a successful session initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub session_id: String,
}

/// Result of a successful exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
}

/// Trait defining the calls the controller makes
///
/// Both calls are abandoned by dropping the returned future. The query call
/// never receives the credential: the query service is a separate deployment
/// with its own trust boundary.
#[allow(async_fn_in_trait)]
pub trait ChatTransport {
    /// Create a session for `event_id` on the authenticated event backend
    async fn initialize(&self, event_id: &str, credential: &str)
        -> Result<SessionGrant, InitError>;

    /// Ask `question` within `session_id` on the query service
    async fn query(&self, session_id: &str, question: &str) -> Result<Answer, QueryError>;
}

/// Interpret the event backend's reply to a session initialization
pub fn classify_init_response(status: u16, body: &str) -> Result<SessionGrant, InitError> {
    match status {
        200..=299 => serde_json::from_str::<SessionInitResponse>(body)
            .ok()
            .and_then(|parsed| parsed.session_id)
            .filter(|id| !id.trim().is_empty())
            .map(|session_id| SessionGrant { session_id })
            .ok_or(InitError::MissingSessionId),
        401 | 403 => Err(InitError::Unauthorized),
        404 => Err(InitError::NotFound),
        _ => Err(InitError::Server {
            status,
            message: serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.display_message()),
        }),
    }
}

/// Interpret the query service's reply to a question
///
/// A reply only counts as an answer when the status is a success and the
/// payload carries a non-empty `answer`. Anything else is a server error,
/// keeping whatever displayable message the payload had.
pub fn classify_query_response(status: u16, body: &str) -> Result<Answer, QueryError> {
    let parsed = serde_json::from_str::<QueryResponse>(body).ok();

    if (200..300).contains(&status) {
        let text = match &parsed {
            Some(reply) => reply.answer_text().map(str::to_string),
            None => loose_answer(body),
        };
        if let Some(text) = text {
            return Ok(Answer { text });
        }
    }

    Err(QueryError::Server {
        status,
        message: parsed.and_then(|p| p.failure.display_message()),
    })
}

/// Read `answer` from a body whose other fields do not fit [`QueryResponse`]
fn loose_answer(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    value
        .get("answer")?
        .as_str()
        .filter(|a| !a.is_empty())
        .map(String::from)
}
