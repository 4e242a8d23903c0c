//! Backend boundaries
//!
//! The session talks to two services: the answer backend (request/response)
//! and the feedback backend (fire-and-forget). Both are traits so the session
//! can be driven by mocks in tests.

mod error;
mod http;
mod types;

pub use error::{BackendError, BackendErrorKind};
pub use http::HttpBackend;
pub use types::{AnswerRequest, AnswerResponse, FeedbackRequest, Source};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Retrieval-augmented answer backend
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Perform one question/answer exchange
    async fn ask(&self, request: &AnswerRequest) -> Result<AnswerResponse, BackendError>;
}

/// Feedback ingestion backend
#[async_trait]
pub trait FeedbackService: Send + Sync {
    async fn submit(&self, feedback: &FeedbackRequest) -> Result<(), BackendError>;
}

#[async_trait]
impl<T: AnswerService + ?Sized> AnswerService for Arc<T> {
    async fn ask(&self, request: &AnswerRequest) -> Result<AnswerResponse, BackendError> {
        (**self).ask(request).await
    }
}

#[async_trait]
impl<T: FeedbackService + ?Sized> FeedbackService for Arc<T> {
    async fn submit(&self, feedback: &FeedbackRequest) -> Result<(), BackendError> {
        (**self).submit(feedback).await
    }
}

/// Logging wrapper for backend services
pub struct LoggingService<T> {
    inner: T,
}

impl<T> LoggingService<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: AnswerService> AnswerService for LoggingService<T> {
    async fn ask(&self, request: &AnswerRequest) -> Result<AnswerResponse, BackendError> {
        let start = Instant::now();
        let result = self.inner.ask(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    k = request.k,
                    translate_local = request.translate_local,
                    sources = response.sources.as_ref().map_or(0, Vec::len),
                    backend = response.backend.as_deref().unwrap_or("-"),
                    question_id = response.question_id.as_deref().unwrap_or("-"),
                    "Answer exchange completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    "Answer exchange failed"
                );
            }
        }

        result
    }
}

#[async_trait]
impl<T: FeedbackService> FeedbackService for LoggingService<T> {
    async fn submit(&self, feedback: &FeedbackRequest) -> Result<(), BackendError> {
        let start = Instant::now();
        let result = self.inner.submit(feedback).await;

        match &result {
            Ok(()) => tracing::debug!(
                question_id = %feedback.question_id,
                rating = feedback.rating.get(),
                duration_ms = %start.elapsed().as_millis(),
                "Feedback delivered"
            ),
            Err(e) => tracing::warn!(
                question_id = %feedback.question_id,
                error = %e.message,
                kind = e.kind.as_str(),
                "Feedback submission failed"
            ),
        }

        result
    }
}
