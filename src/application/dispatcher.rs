//! The turn dispatcher - one conversation turn, end to end.
//!
//! A turn is: load (or create) the thread's state, append the user
//! envelope, classify, route to a responder, append the reply, persist.
//! Turns on the same thread are serialized by a per-thread lock and the
//! durable copy only changes at the final save, so a failed turn leaves
//! the store exactly as the previous turn left it and a retry starts
//! clean. Classifier and responder failures degrade inside the turn; the
//! only error a caller sees is a persistence failure.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::domain::agents::{IntentClassifier, ResponderTable};
use crate::domain::conversation::{
    Classification, ConversationState, Envelope, Message, SharedInputs,
};
use crate::domain::foundation::{ThreadId, TraceId};
use crate::ports::{CompletionClient, RequestMetadata, StateStore, StateStoreError};

/// Everything a turn needs from the caller.
#[derive(Debug, Clone)]
pub struct TurnInput {
    /// Thread the turn belongs to.
    pub thread_id: ThreadId,
    /// The user's message text.
    pub user_text: String,
    /// Structured context attached to this turn's envelope.
    pub context: Map<String, Value>,
    /// Read-only inputs shared with the responders.
    pub shared_inputs: SharedInputs,
    /// Trace id correlating the turn's model calls and logs.
    pub trace_id: TraceId,
}

impl TurnInput {
    /// Creates a turn input with no context and fresh trace id.
    pub fn new(thread_id: ThreadId, user_text: impl Into<String>) -> Self {
        Self {
            thread_id,
            user_text: user_text.into(),
            context: Map::new(),
            shared_inputs: SharedInputs::default(),
            trace_id: TraceId::new(),
        }
    }

    /// Attaches one context entry to the turn's envelope.
    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Sets the shared inputs for the turn.
    pub fn with_shared_inputs(mut self, inputs: SharedInputs) -> Self {
        self.shared_inputs = inputs;
        self
    }
}

/// The result of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The state as persisted at turn end.
    pub state: ConversationState,
    /// The reply shown to the user.
    pub reply: String,
    /// How the turn was routed.
    pub classification: Classification,
}

/// The one way a turn can fail.
///
/// Model-side failures never surface here; they degrade to fallback
/// replies inside the turn. Only a persistence failure aborts, because a
/// turn that cannot be saved has not happened.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("failed to persist turn: {0}")]
    Storage(#[from] StateStoreError),
}

/// Runs conversation turns.
pub struct Dispatcher {
    classifier: IntentClassifier,
    responders: ResponderTable,
    client: Arc<dyn CompletionClient>,
    store: Arc<dyn StateStore>,
    /// One lock per active thread, serializing its turns.
    locks: Mutex<HashMap<ThreadId, Arc<Mutex<()>>>>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given collaborators.
    pub fn new(
        classifier: IntentClassifier,
        responders: ResponderTable,
        client: Arc<dyn CompletionClient>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            classifier,
            responders,
            client,
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Runs one turn to completion.
    pub async fn run_turn(&self, input: TurnInput) -> Result<TurnOutcome, TurnError> {
        let _guard = self.thread_lock(&input.thread_id).await.lock_owned().await;

        let mut state = self
            .store
            .load(&input.thread_id)
            .await?
            .unwrap_or_else(|| ConversationState::new(input.thread_id.clone()));

        let mut envelope = Envelope::new(&input.user_text);
        envelope.context = input.context.clone();
        state.append(Message::user(envelope.encode()));

        let classification = self
            .classifier
            .classify(
                self.client.as_ref(),
                state.messages(),
                self.metadata(&input, "classifier"),
            )
            .await;

        tracing::info!(
            thread_id = %input.thread_id,
            trace_id = %input.trace_id,
            category = %classification.category,
            "turn classified"
        );

        let responder = self.responders.route(classification.category);
        let reply = responder
            .respond(
                self.client.as_ref(),
                state.messages(),
                &input.shared_inputs,
                self.metadata(&input, responder.name()),
            )
            .await;

        state.append(Message::assistant_from(&reply.reply, responder.name()));
        state.record_classification(classification.clone());
        state.record_responder_metadata(reply.metadata);

        // The durable copy changes only here. On failure the store still
        // holds the previous turn's snapshot and a retry reloads it.
        self.store.save(&state).await?;

        Ok(TurnOutcome {
            state,
            reply: reply.reply,
            classification,
        })
    }

    /// Loads a thread's state without running a turn.
    pub async fn state(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Option<ConversationState>, TurnError> {
        Ok(self.store.load(thread_id).await?)
    }

    fn metadata(&self, input: &TurnInput, operation: &str) -> RequestMetadata {
        RequestMetadata::new(input.thread_id.clone(), input.trace_id, operation)
    }

    async fn thread_lock(&self, thread_id: &ThreadId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(
            locks
                .entry(thread_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}
