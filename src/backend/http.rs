//! HTTP implementation of the answer and feedback boundaries

use super::types::{AnswerRequest, AnswerResponse, FeedbackRequest};
use super::{AnswerService, BackendError, FeedbackService};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::Client;

/// JSON-over-HTTP client for the advisor API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    ask_url: String,
    feedback_url: String,
}

impl HttpBackend {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the underlying TLS/HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(
            client,
            &config.api_url,
            &config.feedback_url,
        ))
    }

    pub fn with_client(client: Client, api_url: &str, feedback_url: &str) -> Self {
        Self {
            client,
            ask_url: format!("{}/ask", api_url.trim_end_matches('/')),
            feedback_url: format!("{}/feedback", feedback_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl AnswerService for HttpBackend {
    async fn ask(&self, request: &AnswerRequest) -> Result<AnswerResponse, BackendError> {
        let response = self.client.post(&self.ask_url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            // the body of a failed exchange is never inspected
            return Err(BackendError::from_status(status));
        }

        Ok(response.json::<AnswerResponse>().await?)
    }
}

#[async_trait]
impl FeedbackService for HttpBackend {
    async fn submit(&self, feedback: &FeedbackRequest) -> Result<(), BackendError> {
        let response = self
            .client
            .post(&self.feedback_url)
            .json(feedback)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BackendError::from_status(status))
        }
    }
}
