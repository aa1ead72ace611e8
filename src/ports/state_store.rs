//! State Store Port - durable, thread-keyed conversation persistence.
//!
//! The store owns the durable copy of every thread's state and must support
//! atomic read-modify-write per key plus point lookup by key. A turn is not
//! complete until its state write succeeds, so storage failures are the one
//! error class that propagates out of the orchestration.

use async_trait::async_trait;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::ThreadId;

/// Errors raised by state storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StateStoreError {
    #[error("failed to serialize state: {0}")]
    Serialization(String),

    #[error("failed to deserialize state: {0}")]
    Deserialization(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Port for persisting and loading conversation state.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the state for a thread; `None` when the thread has no turns yet.
    async fn load(&self, thread_id: &ThreadId) -> Result<Option<ConversationState>, StateStoreError>;

    /// Persists the full state for a thread, atomically replacing the
    /// previous durable copy.
    async fn save(&self, state: &ConversationState) -> Result<(), StateStoreError>;
}
