//! The structured payload carried inside user message content.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `{query, context}` JSON payload of a user message.
///
/// `query` is always present; `context` keys are producer-defined
/// (`mind_map_data`, `essay_content`, ...) and consumers must tolerate the
/// absence of any key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// The user's question, verbatim.
    pub query: String,
    /// Structured domain context attached by the producer.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,
}

impl Envelope {
    /// Creates an envelope with no context.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context: Map::new(),
        }
    }

    /// Attaches one context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Encodes the envelope as message content.
    pub fn encode(&self) -> String {
        // Serializing a Map/String structure cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| self.query.clone())
    }

    /// Decodes message content into an envelope, if it is one.
    pub fn decode(content: &str) -> Option<Self> {
        serde_json::from_str(content).ok()
    }
}
