//! Operator support: answers questions about operating the map editor.
//!
//! The default route. Sees only the conversational text of each user turn
//! (no map payloads) and replies in plain prose, so its interpreter is a
//! passthrough.

use crate::domain::conversation::{filter_messages, Message, SharedInputs};

use super::prompts::OPERATOR_SUPPORT_PROMPT;
use super::responder::{AgentReply, Responder};

/// Responder for interface and tooling questions.
#[derive(Debug, Default)]
pub struct OperatorSupportResponder;

#[async_trait::async_trait]
impl Responder for OperatorSupportResponder {
    fn name(&self) -> &'static str {
        "operator_support"
    }

    fn temperature(&self) -> f32 {
        0.3
    }

    fn prepare(&self, history: &[Message], _inputs: &SharedInputs) -> Vec<Message> {
        let mut messages = vec![Message::system(OPERATOR_SUPPORT_PROMPT)];
        messages.extend(filter_messages(history, &[]));
        messages
    }

    fn interpret(&self, raw: &str) -> AgentReply {
        AgentReply::text(raw)
    }
}
