//! PostgreSQL implementation of the state store.
//!
//! Each thread's state lives in one JSONB row keyed by thread id. Saving
//! is a single upsert, so the durable copy switches atomically from the
//! previous turn's snapshot to the new one; readers never observe a
//! half-written turn.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::ThreadId;
use crate::ports::{StateStore, StateStoreError};

/// PostgreSQL implementation of the state store.
#[derive(Clone)]
pub struct PostgresStateStore {
    pool: PgPool,
}

impl PostgresStateStore {
    /// Creates a store backed by the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateStore for PostgresStateStore {
    async fn load(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Option<ConversationState>, StateStoreError> {
        let row = sqlx::query("SELECT state FROM conversation_states WHERE thread_id = $1")
            .bind(thread_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StateStoreError::Database(format!("failed to load state: {e}")))?;

        match row {
            Some(row) => {
                let state: serde_json::Value = row
                    .try_get("state")
                    .map_err(|e| StateStoreError::Database(format!("failed to read column: {e}")))?;
                let state = serde_json::from_value(state)
                    .map_err(|e| StateStoreError::Deserialization(e.to_string()))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, state: &ConversationState) -> Result<(), StateStoreError> {
        let value = serde_json::to_value(state)
            .map_err(|e| StateStoreError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO conversation_states (thread_id, state, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (thread_id)
            DO UPDATE SET state = EXCLUDED.state, updated_at = now()
            "#,
        )
        .bind(state.thread_id().as_str())
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| StateStoreError::Database(format!("failed to save state: {e}")))?;

        Ok(())
    }
}
