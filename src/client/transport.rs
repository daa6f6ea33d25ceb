use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::models::SubmitReply;

/// Exactly the form-encoded fields the submission endpoint reads.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub message: String,
    /// RFC 3339 time the user pressed submit.
    pub timestamp: String,
}

#[derive(Debug)]
pub struct TransportError {
    pub message: String,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<String> for TransportError {
    fn from(s: String) -> Self {
        TransportError { message: s }
    }
}

impl From<&str> for TransportError {
    fn from(s: &str) -> Self {
        TransportError {
            message: s.to_string(),
        }
    }
}

/// Delivers a payload and hands back the server's structured reply.
/// Only a failure to obtain a readable reply is an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, payload: &SubmissionPayload) -> Result<SubmitReply, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TransportError::from(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: &SubmissionPayload) -> Result<SubmitReply, TransportError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .form(payload)
            .send()
            .await
            .map_err(|e| TransportError::from(format!("Request failed: {e}")))?;

        let status = resp.status();
        resp.json::<SubmitReply>().await.map_err(|e| {
            TransportError::from(format!("Unreadable response (HTTP {status}): {e}"))
        })
    }
}
