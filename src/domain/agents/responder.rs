//! The responder capability shared by all expert agents.
//!
//! Every invocation runs PREPARE (filter history, prepend the instruction
//! template) then INVOKE (one non-retried completion call) then INTERPRET
//! (structured-output validation). Any step failing terminates the
//! invocation with a user-safe fallback reply and empty metadata; errors
//! never propagate to the dispatcher from here.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::conversation::{Message, SharedInputs};
use crate::ports::{CompletionClient, CompletionRequest, RequestMetadata};

/// Reply shown when the completion service fails or times out.
pub const FALLBACK_REPLY: &str =
    "Sorry, I ran into a technical problem. Please try again in a moment.";

/// A responder's terminal output for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    /// The text appended to the conversation as the assistant message.
    pub reply: String,
    /// Structured data pulled from the model output, empty when the output
    /// had none or failed validation.
    pub metadata: Map<String, Value>,
}

impl AgentReply {
    /// A plain-text reply with no metadata.
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            metadata: Map::new(),
        }
    }

    /// The user-safe reply used when invocation fails.
    pub fn fallback() -> Self {
        Self::text(FALLBACK_REPLY)
    }
}

/// A unit that turns a message history into a reply via one model
/// invocation plus structured-output interpretation.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Stable identity; tags the assistant messages this responder produces.
    fn name(&self) -> &'static str;

    /// Sampling temperature for this role: lower for scoring, higher for
    /// open-ended guidance.
    fn temperature(&self) -> f32;

    /// Builds the model input: filtered history with the instruction
    /// template prepended as a system message.
    fn prepare(&self, history: &[Message], inputs: &SharedInputs) -> Vec<Message>;

    /// Turns raw model text into a reply and metadata. Must be total:
    /// partial or unparseable structured output degrades to the raw text
    /// rather than failing the turn.
    fn interpret(&self, raw: &str) -> AgentReply;

    /// Runs the full PREPARE -> INVOKE -> INTERPRET pipeline.
    async fn respond(
        &self,
        client: &dyn CompletionClient,
        history: &[Message],
        inputs: &SharedInputs,
        metadata: RequestMetadata,
    ) -> AgentReply {
        let messages = self.prepare(history, inputs);
        let request = CompletionRequest::new(messages, self.temperature(), metadata);

        match client.complete(request).await {
            Ok(response) => self.interpret(&response.content),
            Err(err) => {
                tracing::warn!(
                    responder = self.name(),
                    error = %err,
                    "completion failed, returning fallback reply"
                );
                AgentReply::fallback()
            }
        }
    }
}
