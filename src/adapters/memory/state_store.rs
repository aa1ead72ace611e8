//! In-memory implementation of the state store.
//!
//! Useful for tests and development. Supports one-shot failure injection
//! so persistence-failure paths can be exercised.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::ThreadId;
use crate::ports::{StateStore, StateStoreError};

/// In-memory state store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    states: Arc<RwLock<HashMap<ThreadId, ConversationState>>>,
    fail_next_save: Arc<AtomicBool>,
}

impl InMemoryStateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `save` call fail, then clears the flag.
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    /// Number of threads with stored state.
    pub async fn state_count(&self) -> usize {
        self.states.read().await.len()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Option<ConversationState>, StateStoreError> {
        Ok(self.states.read().await.get(thread_id).cloned())
    }

    async fn save(&self, state: &ConversationState) -> Result<(), StateStoreError> {
        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(StateStoreError::Unavailable(
                "injected save failure".to_string(),
            ));
        }

        self.states
            .write()
            .await
            .insert(state.thread_id().clone(), state.clone());
        Ok(())
    }
}
