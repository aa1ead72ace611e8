//! Mock completion client for tests.
//!
//! Queue-driven: replies and errors are consumed in configuration order,
//! with a default reply once the queue is exhausted. Records every request
//! for verification.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::ports::{CompletionClient, CompletionError, CompletionRequest, CompletionResponse};

/// A configured mock outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text as the completion.
    Reply(String),
    /// Fail with this error.
    Error(CompletionError),
}

/// Mock completion client.
#[derive(Debug, Clone, Default)]
pub struct MockCompletionClient {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Duration,
}

impl MockCompletionClient {
    /// Creates a mock with an empty reply queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Reply(content.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: CompletionError) -> Self {
        self.replies.lock().unwrap().push_back(MockReply::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of requests made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded requests, in order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockReply::Reply("mock reply".to_string()))
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_reply() {
            MockReply::Reply(content) => Ok(CompletionResponse {
                content,
                model: "mock-model".to_string(),
            }),
            MockReply::Error(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Message;
    use crate::domain::foundation::{ThreadId, TraceId};
    use crate::ports::RequestMetadata;

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            vec![Message::user("hi")],
            0.1,
            RequestMetadata::new(ThreadId::new("mindmap-1").unwrap(), TraceId::new(), "test"),
        )
    }

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let client = MockCompletionClient::new()
            .with_reply("first")
            .with_reply("second");

        assert_eq!(client.complete(request()).await.unwrap().content, "first");
        assert_eq!(client.complete(request()).await.unwrap().content, "second");
        // Exhausted queue falls back to the default reply.
        assert_eq!(
            client.complete(request()).await.unwrap().content,
            "mock reply"
        );
    }

    #[tokio::test]
    async fn errors_are_returned_as_configured() {
        let client = MockCompletionClient::new()
            .with_error(CompletionError::RateLimited { retry_after_secs: 30 });

        let err = client.complete(request()).await.unwrap_err();
        assert!(matches!(
            err,
            CompletionError::RateLimited { retry_after_secs: 30 }
        ));
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let client = MockCompletionClient::new().with_reply("ok");

        assert_eq!(client.call_count(), 0);
        client.complete(request()).await.unwrap();
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.calls()[0].temperature, 0.1);
    }
}
