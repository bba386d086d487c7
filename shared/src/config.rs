//! Backend locations for the chat client
//!
//! The event backend (authenticated, creates sessions) and the query service
//! (answers questions) are separate deployments and are configured separately.
//! Nothing here carries a credential: it is handed to the session
//! initialization call by whoever owns it.

use std::time::Duration;

/// Default timeout applied to every backend request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration shared by all transport implementations
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Base URL of the event backend (e.g., "http://localhost:8000")
    pub api_base_url: String,
    /// Base URL of the query service (e.g., "http://localhost:8001")
    pub query_base_url: String,
    /// Upper bound on each request, including reading the body
    pub request_timeout: Duration,
}

impl ServiceConfig {
    pub fn new(api_base_url: impl Into<String>, query_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: trim_base(api_base_url.into()),
            query_base_url: trim_base(query_base_url.into()),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build a full event backend URL from a path
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base_url, endpoint)
    }

    /// Build a full query service URL from a path
    pub fn query_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.query_base_url, endpoint)
    }
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints;

    #[test]
    fn urls_join_without_double_slash() {
        let config = ServiceConfig::new("http://localhost:8000/", "http://localhost:8001//");
        assert_eq!(
            config.api_url(&endpoints::event_chat("3")),
            "http://localhost:8000/events/chat/3/"
        );
        assert_eq!(
            config.query_url(endpoints::QUERY),
            "http://localhost:8001/query"
        );
    }

    #[test]
    fn default_timeout() {
        let config = ServiceConfig::new("a", "b");
        assert_eq!(config.request_timeout, Duration::from_secs(30));

        let config = config.with_timeout(Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_millis(250));
    }
}
