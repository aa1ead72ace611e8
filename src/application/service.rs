//! The chat service facade - the surface the transport layer talks to.
//!
//! Translates map-scoped requests into thread-scoped turns: derives the
//! thread id from the map id, packs the map payload into the turn's
//! envelope context, and shapes the outcome for presentation.

use std::sync::Arc;

use serde_json::Value;
use tracing::Instrument;

use crate::domain::conversation::{Classification, Role, SharedInputs};
use crate::domain::foundation::{ThreadId, TraceId};

use super::dispatcher::{Dispatcher, TurnError, TurnInput};

/// A completed turn, shaped for the transport layer.
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// The text shown to the student.
    pub message: String,
    /// How the turn was routed.
    pub classification: Classification,
}

/// One message of a thread's history, shaped for presentation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HistoryMessage {
    /// Position in the log, starting at 1.
    pub id: usize,
    /// "user" or "assistant".
    pub role: String,
    /// The conversational text; user envelopes are unwrapped to their query.
    pub content: String,
    /// Which responder produced an assistant message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Failures the facade reports to the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Storage(#[from] TurnError),
}

impl ChatError {
    /// A message safe to show the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::Storage(_) => {
                "Sorry, we could not save your conversation. Please try again."
            }
        }
    }

    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

/// Facade over the dispatcher for map-scoped chat.
pub struct ChatService {
    dispatcher: Dispatcher,
}

impl ChatService {
    /// Creates the service over a dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Runs one turn for a map's conversation.
    pub async fn process_message(
        &self,
        map_id: i64,
        message: &str,
        mind_map_data: Value,
        article_content: &str,
    ) -> Result<ChatReply, ChatError> {
        let thread_id = ThreadId::for_map(map_id);
        let trace_id = TraceId::new();

        let span = tracing::info_span!(
            "process_message",
            thread_id = %thread_id,
            trace_id = %trace_id,
        );

        let input = TurnInput {
            thread_id,
            user_text: message.to_string(),
            context: {
                let mut context = serde_json::Map::new();
                context.insert("mind_map_data".to_string(), mind_map_data);
                context
            },
            shared_inputs: SharedInputs::with_article(article_content),
            trace_id,
        };

        let outcome = self.dispatcher.run_turn(input).instrument(span).await?;

        Ok(ChatReply {
            message: outcome.reply,
            classification: outcome.classification,
        })
    }

    /// The presentable history of a map's conversation, oldest first.
    pub async fn history(&self, map_id: i64) -> Result<Vec<HistoryMessage>, ChatError> {
        let thread_id = ThreadId::for_map(map_id);
        let state = self.dispatcher.state(&thread_id).await?;

        let Some(state) = state else {
            return Ok(Vec::new());
        };

        let history = state
            .messages()
            .iter()
            .filter(|m| m.role != Role::System)
            .enumerate()
            .map(|(i, m)| {
                let content = match m.role {
                    Role::User => crate::domain::conversation::Envelope::decode(&m.content)
                        .map(|e| e.query)
                        .unwrap_or_else(|| m.content.clone()),
                    _ => m.content.clone(),
                };
                HistoryMessage {
                    id: i + 1,
                    role: m.role.to_string(),
                    content,
                    kind: m.kind.clone(),
                }
            })
            .collect();

        Ok(history)
    }
}
