//! Cognitive support: coaches the student on claims, evidence and
//! reasoning against the reference article.
//!
//! The only responder that sees the full, unfiltered history, since its
//! guidance depends on the map payloads earlier turns carried. Output is a
//! JSON object whose `final_response` is what the student sees; the
//! strategy fields travel as metadata.

use serde_json::{Map, Value};

use crate::domain::conversation::{parse_structured, Message, SharedInputs};

use super::prompts::{with_article, COGNITIVE_SUPPORT_PROMPT};
use super::responder::{AgentReply, Responder};

/// Keys copied from the model output into responder metadata when present.
const METADATA_KEYS: [&str; 3] = ["reasoning", "response_strategy", "strategy_detail"];

/// Responder for comprehension and reasoning guidance.
#[derive(Debug, Default)]
pub struct CognitiveSupportResponder;

#[async_trait::async_trait]
impl Responder for CognitiveSupportResponder {
    fn name(&self) -> &'static str {
        "cognitive_support"
    }

    fn temperature(&self) -> f32 {
        0.5
    }

    fn prepare(&self, history: &[Message], inputs: &SharedInputs) -> Vec<Message> {
        let prompt = with_article(COGNITIVE_SUPPORT_PROMPT, &inputs.article_content);
        let mut messages = vec![Message::system(prompt)];
        messages.extend_from_slice(history);
        messages
    }

    fn interpret(&self, raw: &str) -> AgentReply {
        let parsed = match parse_structured(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(
                    responder = self.name(),
                    error = %err,
                    "output was not structured, passing raw text through"
                );
                return AgentReply::text(raw);
            }
        };

        let reply = match parsed.get("final_response").and_then(Value::as_str) {
            Some(reply) => reply.to_string(),
            None => {
                tracing::warn!(
                    responder = self.name(),
                    "structured output missing final_response, passing raw text through"
                );
                return AgentReply::text(raw);
            }
        };

        let mut metadata = Map::new();
        for key in METADATA_KEYS {
            if let Some(value) = parsed.get(key) {
                metadata.insert(key.to_string(), value.clone());
            }
        }

        AgentReply { reply, metadata }
    }
}
