//! Wire types for the two HTTP/JSON backends
//!
//! The authenticated event backend creates chat sessions; the query service
//! answers questions inside a session. Both can be reached from native
//! (reqwest) and WASM (gloo-net) clients.

use serde::{Deserialize, Serialize};

/// Response from `GET /events/chat/{event_id}/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInitResponse {
    #[serde(default)]
    pub session_id: Option<String>,
    /// Echo of the requested event. The backend sends it as a number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<serde_json::Value>,
}

/// Request body for `POST /query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub session_id: String,
    pub question: String,
}

/// Response body from `POST /query`
///
/// Successful replies carry `answer`. Failed replies may carry a displayable
/// message in `error` or in `detail`, depending on which layer of the query
/// service produced them. The remaining fields are informational and kept
/// untyped so their shape never affects whether an answer is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_tool: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<serde_json::Value>,
    #[serde(flatten)]
    pub failure: ErrorBody,
}

impl QueryResponse {
    /// The answer text, if the service produced a non-empty one
    pub fn answer_text(&self) -> Option<&str> {
        self.answer.as_deref().filter(|a| !a.is_empty())
    }
}

/// Error payload shapes used by both backends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Framework-generated errors put a string here; validation errors put a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// First human-readable message found, in `error`, `message`, `detail` order
    pub fn display_message(&self) -> Option<String> {
        let detail = self.detail.as_ref().and_then(|d| d.as_str());
        [self.error.as_deref(), self.message.as_deref(), detail]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|m| !m.is_empty())
            .map(String::from)
    }
}

/// API endpoint definitions
pub mod endpoints {
    /// Query service: ask a question within a session
    pub const QUERY: &str = "/query";

    /// Event backend: create a chat session for an event
    pub fn event_chat(event_id: &str) -> String {
        format!("/events/chat/{}/", event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_response_accepts_numeric_event_echo() {
        let parsed: SessionInitResponse =
            serde_json::from_str(r#"{"session_id":"abc123","event_id":7}"#).unwrap();
        assert_eq!(parsed.session_id.as_deref(), Some("abc123"));
        assert_eq!(parsed.event_id, Some(serde_json::json!(7)));
    }

    #[test]
    fn query_response_with_extras() {
        let json = r#"{
            "session_id": "abc123",
            "question": "Was the venue good?",
            "answer": "Most attendees rated it positively.",
            "used_tool": "numeric",
            "context_length": 1200,
            "sources": [{"row": 3}],
            "timestamp": "2024-05-01T10:00:00"
        }"#;
        let parsed: QueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.answer_text(),
            Some("Most attendees rated it positively.")
        );
        assert_eq!(parsed.used_tool, Some(serde_json::json!("numeric")));
        assert_eq!(parsed.sources, Some(serde_json::json!([{"row": 3}])));
        assert_eq!(parsed.failure.display_message(), None);
    }

    #[test]
    fn query_response_extras_of_any_shape() {
        let parsed: QueryResponse = serde_json::from_str(
            r#"{"answer":"Yes","used_tool":false,"sources":null,"timestamp":1714557600}"#,
        )
        .unwrap();
        assert_eq!(parsed.answer_text(), Some("Yes"));
        assert_eq!(parsed.used_tool, Some(serde_json::json!(false)));
        assert_eq!(parsed.sources, None);
    }

    #[test]
    fn empty_answer_is_no_answer() {
        let parsed: QueryResponse =
            serde_json::from_str(r#"{"answer":"","error":"model offline"}"#).unwrap();
        assert_eq!(parsed.answer_text(), None);
        assert_eq!(
            parsed.failure.display_message().as_deref(),
            Some("model offline")
        );
    }

    #[test]
    fn detail_string_is_displayable_but_detail_list_is_not() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"Session not found or expired"}"#).unwrap();
        assert_eq!(
            body.display_message().as_deref(),
            Some("Session not found or expired")
        );

        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","question"]}]}"#).unwrap();
        assert_eq!(body.display_message(), None);
    }

    #[test]
    fn blank_error_falls_through_to_message() {
        let body = ErrorBody {
            error: Some("  ".to_string()),
            message: Some("Event not found".to_string()),
            detail: None,
        };
        assert_eq!(body.display_message().as_deref(), Some("Event not found"));
    }

    #[test]
    fn query_request_shape() {
        let req = QueryRequest {
            session_id: "abc123".to_string(),
            question: "Was the venue good?".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"session_id": "abc123", "question": "Was the venue good?"})
        );
    }

    #[test]
    fn event_chat_path() {
        assert_eq!(endpoints::event_chat("42"), "/events/chat/42/");
    }
}
