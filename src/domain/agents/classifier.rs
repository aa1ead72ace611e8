//! Intent classification for incoming turns.
//!
//! One low-temperature model call over the context-stripped history decides
//! which responder handles the turn. Classification is total: any failure
//! along the way (transport, malformed output, a label outside the closed
//! set) resolves to the configured default category with the failure reason
//! recorded as the rationale. A turn never dies in classification.

use serde_json::Value;

use crate::domain::conversation::{
    filter_messages, parse_structured, Category, Classification, Message,
};
use crate::ports::{CompletionClient, CompletionRequest, RequestMetadata};

use super::prompts::CLASSIFIER_PROMPT;

/// Decides the routing category for the latest user message.
#[derive(Debug)]
pub struct IntentClassifier {
    default_category: Category,
}

impl IntentClassifier {
    /// Sampling temperature; low so routing stays stable across retries.
    const TEMPERATURE: f32 = 0.1;

    /// Creates a classifier that falls back to `default_category` when it
    /// cannot produce a confident label.
    pub fn new(default_category: Category) -> Self {
        Self { default_category }
    }

    /// Classifies the latest user message given the whole history.
    pub async fn classify(
        &self,
        client: &dyn CompletionClient,
        history: &[Message],
        metadata: RequestMetadata,
    ) -> Classification {
        let mut messages = vec![Message::system(CLASSIFIER_PROMPT)];
        messages.extend(filter_messages(history, &[]));
        let request = CompletionRequest::new(messages, Self::TEMPERATURE, metadata);

        let raw = match client.complete(request).await {
            Ok(response) => response.content,
            Err(err) => {
                return self.fall_back(format!("classifier call failed: {err}"));
            }
        };

        let parsed = match parse_structured(&raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                return self.fall_back(format!("classifier output unparseable: {err}"));
            }
        };

        let label = match parsed.get("next_action").and_then(Value::as_str) {
            Some(label) => label,
            None => {
                return self.fall_back("classifier output missing next_action");
            }
        };

        match label.parse::<Category>() {
            Ok(category) => {
                let rationale = parsed
                    .get("reasoning")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Classification::new(category, rationale)
            }
            Err(err) => self.fall_back(format!("classifier chose an unroutable label: {err}")),
        }
    }

    fn fall_back(&self, reason: impl Into<String>) -> Classification {
        let reason = reason.into();
        tracing::warn!(
            default = %self.default_category,
            reason = %reason,
            "classification failed, routing to default category"
        );
        Classification::new(self.default_category, reason)
    }
}
