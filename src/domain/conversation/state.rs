//! Durable per-thread conversation state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{ThreadId, Timestamp};

use super::{Classification, Envelope, Message, Role};

/// Auxiliary read-only data supplied for one turn.
///
/// Shared inputs come from the caller (e.g. the reference article attached
/// to the map's template) and are not part of the persisted message log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedInputs {
    /// Reference article text, empty when the map has no template.
    #[serde(default)]
    pub article_content: String,
    /// Further producer-defined domain context.
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl SharedInputs {
    /// Creates shared inputs carrying a reference article.
    pub fn with_article(article_content: impl Into<String>) -> Self {
        Self {
            article_content: article_content.into(),
            extra: Map::new(),
        }
    }
}

/// The durable state of one conversation thread.
///
/// The message log is append-only: [`append`](Self::append) is the only way
/// to change it, and nothing exposes mutable access to past messages. The
/// state store owns the durable copy; the dispatcher owns one in-memory
/// working copy per turn and writes it back atomically at turn end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    thread_id: ThreadId,
    messages: Vec<Message>,
    classification: Option<Classification>,
    #[serde(default)]
    responder_metadata: Map<String, Value>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ConversationState {
    /// Creates empty state for a thread's first turn.
    pub fn new(thread_id: ThreadId) -> Self {
        let now = Timestamp::now();
        Self {
            thread_id,
            messages: Vec::new(),
            classification: None,
            responder_metadata: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The thread this state belongs to.
    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    /// The message log, in conversation order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The last-computed classification, if any turn has run.
    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }

    /// Metadata produced by the last responder.
    pub fn responder_metadata(&self) -> &Map<String, Value> {
        &self.responder_metadata
    }

    /// When the thread was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the thread last advanced.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Appends one message to the log.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Timestamp::now();
    }

    /// Records the classification computed for the current turn.
    pub fn record_classification(&mut self, classification: Classification) {
        self.classification = Some(classification);
        self.updated_at = Timestamp::now();
    }

    /// Records the metadata produced by the current turn's responder.
    ///
    /// The previous turn's metadata is replaced wholesale, matching the
    /// "last responder" semantics of the field.
    pub fn record_responder_metadata(&mut self, metadata: Map<String, Value>) {
        self.responder_metadata = metadata;
        self.updated_at = Timestamp::now();
    }

    /// The most recent user message decoded as an envelope.
    pub fn last_user_envelope(&self) -> Option<Envelope> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .and_then(|m| Envelope::decode(&m.content))
    }
}
