//! Browser transport over `fetch`

use std::time::Duration;

use chat_session::{
    classify_init_response, classify_query_response, Answer, ChatTransport, InitError,
    QueryError, SessionGrant,
};
use futures_util::future::{select, Either};
use gloo::timers::future::TimeoutFuture;
use gloo_net::http::Request;
use shared::{endpoints, QueryRequest, ServiceConfig};

/// Why an exchange produced no HTTP response
enum Failure {
    Network(String),
    Timeout,
}

/// Talks to the event backend and the query service with `gloo-net`
pub struct GlooTransport {
    config: ServiceConfig,
}

impl GlooTransport {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

impl ChatTransport for GlooTransport {
    async fn initialize(&self, event_id: &str, credential: &str) -> Result<SessionGrant, InitError> {
        let url = self.config.api_url(&endpoints::event_chat(event_id));
        let request = Request::get(&url)
            .header("Authorization", &format!("Token {}", credential))
            .build()
            .map_err(|e| InitError::Network(e.to_string()))?;

        match exchange(request, self.config.request_timeout).await {
            Ok((status, body)) => classify_init_response(status, &body),
            Err(Failure::Network(e)) => Err(InitError::Network(e)),
            Err(Failure::Timeout) => Err(InitError::Timeout),
        }
    }

    async fn query(&self, session_id: &str, question: &str) -> Result<Answer, QueryError> {
        let url = self.config.query_url(endpoints::QUERY);
        // The query service is reached without the event backend credential.
        let request = Request::post(&url)
            .json(&QueryRequest {
                session_id: session_id.to_string(),
                question: question.to_string(),
            })
            .map_err(|e| QueryError::Network(e.to_string()))?;

        match exchange(request, self.config.request_timeout).await {
            Ok((status, body)) => classify_query_response(status, &body),
            Err(Failure::Network(e)) => Err(QueryError::Network(e)),
            Err(Failure::Timeout) => Err(QueryError::Timeout),
        }
    }
}

/// Send a request and read the whole body, giving up after `timeout`
async fn exchange(request: Request, timeout: Duration) -> Result<(u16, String), Failure> {
    let round_trip = async move {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok::<_, gloo_net::Error>((status, body))
    };
    let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);

    match select(Box::pin(round_trip), TimeoutFuture::new(millis)).await {
        Either::Left((Ok(reply), _)) => Ok(reply),
        Either::Left((Err(e), _)) => Err(Failure::Network(e.to_string())),
        Either::Right(_) => Err(Failure::Timeout),
    }
}
