//! Completion Client Port - interface for the text-completion service.
//!
//! The model is treated as a black box that may fail, time out, or return
//! text that is not valid JSON even when instructed otherwise. One request
//! maps to exactly one model invocation; this subsystem never retries
//! (retry policy, if any, belongs to the transport layer above).

use async_trait::async_trait;

use crate::domain::conversation::Message;
use crate::domain::foundation::{ThreadId, TraceId};

/// Port for completion-service interactions.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generates a single completion. Not retried on failure.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, CompletionError>;
}

/// One completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Full model input, system instruction first.
    pub messages: Vec<Message>,
    /// Sampling temperature; fixed per responder role so runs are
    /// reproducible against a stubbed client.
    pub temperature: f32,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Creates a new completion request.
    pub fn new(messages: Vec<Message>, temperature: f32, metadata: RequestMetadata) -> Self {
        Self {
            messages,
            temperature,
            metadata,
        }
    }
}

/// Request metadata for trace correlation.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Thread the request belongs to.
    pub thread_id: ThreadId,
    /// Trace id for the enclosing turn.
    pub trace_id: TraceId,
    /// Which unit issued the request (classifier or responder name).
    pub operation: String,
}

impl RequestMetadata {
    /// Creates new request metadata.
    pub fn new(thread_id: ThreadId, trace_id: TraceId, operation: impl Into<String>) -> Self {
        Self {
            thread_id,
            trace_id,
            operation: operation.into(),
        }
    }
}

/// Response from the completion service.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text, exactly as returned by the model.
    pub content: String,
    /// Model that generated the response.
    pub model: String,
}

/// Completion service errors.
///
/// All variants resolve to the same orchestration outcome (a user-safe
/// fallback reply); the taxonomy exists for logs and operator visibility.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompletionError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider's response body.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Request exceeded the bounded timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl CompletionError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}
