//! Native transport implementation using reqwest

use chat_session::{
    classify_init_response, classify_query_response, Answer, ChatTransport, InitError,
    QueryError, SessionGrant,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use shared::{endpoints, QueryRequest, ServiceConfig};

/// Native transport for both backends
pub struct ReqwestTransport {
    client: Client,
    config: ServiceConfig,
}

impl ReqwestTransport {
    pub fn new(config: ServiceConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    /// Send and read the whole body; the status is judged by the classifier
    async fn exchange(request: RequestBuilder) -> Result<(u16, String), reqwest::Error> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }
}

impl ChatTransport for ReqwestTransport {
    async fn initialize(&self, event_id: &str, credential: &str) -> Result<SessionGrant, InitError> {
        let url = self.config.api_url(&endpoints::event_chat(event_id));
        tracing::debug!(%url, "requesting chat session");

        let request = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Token {}", credential));

        match Self::exchange(request).await {
            Ok((status, body)) => classify_init_response(status, &body),
            Err(e) if e.is_timeout() => Err(InitError::Timeout),
            Err(e) => Err(InitError::Network(e.to_string())),
        }
    }

    async fn query(&self, session_id: &str, question: &str) -> Result<Answer, QueryError> {
        let url = self.config.query_url(endpoints::QUERY);
        tracing::debug!(%url, "sending question");

        let request = self.client.post(&url).json(&QueryRequest {
            session_id: session_id.to_string(),
            question: question.to_string(),
        });

        match Self::exchange(request).await {
            Ok((status, body)) => classify_query_response(status, &body),
            Err(e) if e.is_timeout() => Err(QueryError::Timeout),
            Err(e) => Err(QueryError::Network(e.to_string())),
        }
    }
}
