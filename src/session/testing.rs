//! Mock implementations for testing
//!
//! These mocks enable session testing without real I/O.

use crate::backend::{
    AnswerRequest, AnswerResponse, AnswerService, BackendError, FeedbackRequest, FeedbackService,
    Source,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Answer Service
// ============================================================================

/// Mock answer backend that returns queued outcomes
pub struct MockAnswerService {
    responses: Mutex<VecDeque<Result<AnswerResponse, BackendError>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<AnswerRequest>>,
}

impl MockAnswerService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: AnswerResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a failed exchange
    pub fn queue_error(&self, error: BackendError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<AnswerRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_outcome(&self, request: &AnswerRequest) -> Result<AnswerResponse, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::network("No mock response queued")))
    }
}

impl Default for MockAnswerService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerService for MockAnswerService {
    async fn ask(&self, request: &AnswerRequest) -> Result<AnswerResponse, BackendError> {
        self.next_outcome(request)
    }
}

// ============================================================================
// Delayed Mock Answer Service (for in-flight testing)
// ============================================================================

/// Mock answer backend that holds every exchange open for `delay`
pub struct DelayedMockAnswerService {
    inner: MockAnswerService,
    delay: Duration,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockAnswerService {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockAnswerService::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_response(&self, response: AnswerResponse) {
        self.inner.queue_response(response);
    }

    pub fn recorded_requests(&self) -> Vec<AnswerRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl AnswerService for DelayedMockAnswerService {
    async fn ask(&self, request: &AnswerRequest) -> Result<AnswerResponse, BackendError> {
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.next_outcome(request)
    }
}

// ============================================================================
// Mock Feedback Service
// ============================================================================

/// Mock feedback backend recording every submission
pub struct MockFeedbackService {
    fail: bool,
    pub submissions: Mutex<Vec<FeedbackRequest>>,
    /// Notified after each submission is recorded
    pub submitted: Arc<Notify>,
}

impl MockFeedbackService {
    pub fn new() -> Self {
        Self {
            fail: false,
            submissions: Mutex::new(Vec::new()),
            submitted: Arc::new(Notify::new()),
        }
    }

    /// A backend that records and then rejects every submission
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn recorded(&self) -> Vec<FeedbackRequest> {
        self.submissions.lock().unwrap().clone()
    }

    /// Wait until at least `count` submissions arrived
    pub async fn wait_for(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let notified = self.submitted.notified();
                if self.submissions.lock().unwrap().len() >= count {
                    return;
                }
                notified.await;
            }
        })
        .await
        .expect("feedback submission never arrived");
    }
}

impl Default for MockFeedbackService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedbackService for MockFeedbackService {
    async fn submit(&self, feedback: &FeedbackRequest) -> Result<(), BackendError> {
        self.submissions.lock().unwrap().push(feedback.clone());
        self.submitted.notify_waiters();
        if self.fail {
            Err(BackendError::server_error("feedback store unavailable"))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// The teff answer used across session tests
pub fn teff_answer() -> AnswerResponse {
    AnswerResponse {
        answer: "Plant in rows...".into(),
        sources: Some(vec![Source::new("...").with_metadata("crop", "teff")]),
        backend: Some("remote-rag".into()),
        question_id: Some("q1".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AnswerRequest {
        AnswerRequest {
            question: "q".into(),
            k: 3,
            translate_local: false,
        }
    }

    #[tokio::test]
    async fn test_mock_answer_service() {
        let mock = MockAnswerService::new();
        mock.queue_response(teff_answer());

        let response = mock.ask(&request()).await.unwrap();
        assert_eq!(response.question_id.as_deref(), Some("q1"));

        // Second call should fail (no more responses)
        assert!(mock.ask(&request()).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_feedback_still_records() {
        let mock = MockFeedbackService::failing();
        let feedback = FeedbackRequest {
            question_id: "q1".into(),
            rating: crate::feedback::Rating::HELPFUL,
            comment: None,
        };
        assert!(mock.submit(&feedback).await.is_err());
        mock.wait_for(1).await;
        assert_eq!(mock.recorded().len(), 1);
    }
}
