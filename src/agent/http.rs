//! HTTP transport to the agent service

use super::types::{ChatRequest, ChatResponse, HealthResponse, HealthStatus};
use super::{AgentTransport, TransportError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

/// Deadline for the health probe, regardless of the chat timeout
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// reqwest-backed agent transport
pub struct HttpTransport {
    client: Client,
    chat_url: Url,
    health_url: Url,
    health_timeout: Duration,
}

impl HttpTransport {
    /// Build a transport for `chat_url`. The health probe targets the root
    /// of the same origin.
    ///
    /// `timeout` is only applied when set; the session itself never gives
    /// up on a request.
    pub fn new(chat_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let chat_url = Url::parse(chat_url)
            .map_err(|e| TransportError::other(format!("Invalid agent URL {chat_url}: {e}")))?;
        let health_url = chat_url
            .join("/")
            .map_err(|e| TransportError::other(format!("Invalid agent URL {chat_url}: {e}")))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            chat_url,
            health_url,
            health_timeout: HEALTH_TIMEOUT,
        })
    }

    #[cfg(test)]
    fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }
}

fn classify_send_error(e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::timeout(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        TransportError::connect(format!("Connection failed: {e}"))
    } else {
        TransportError::other(format!("Request failed: {e}"))
    }
}

#[async_trait]
impl AgentTransport for HttpTransport {
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        let response = self
            .client
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| classify_send_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_send_error(&e))?;

        if !status.is_success() {
            return Err(TransportError::status(
                status.as_u16(),
                format!("HTTP {status} error: {body}"),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| TransportError::decode(format!("Failed to parse response: {e} - body: {body}")))
    }

    async fn health(&self) -> HealthStatus {
        let probe = self
            .client
            .get(self.health_url.clone())
            .timeout(self.health_timeout);
        let response = match probe.send().await {
            Ok(response) => response,
            Err(e) => {
                return HealthStatus::Offline {
                    reason: classify_send_error(&e).message,
                }
            }
        };

        let status = response.status();
        if !status.is_success() {
            return HealthStatus::Offline {
                reason: format!("HTTP {status}"),
            };
        }

        match response.json::<HealthResponse>().await {
            Ok(health) => HealthStatus::Online {
                status: health.status,
            },
            Err(e) => HealthStatus::Offline {
                reason: format!("Unexpected health payload: {e}"),
            },
        }
    }
}
