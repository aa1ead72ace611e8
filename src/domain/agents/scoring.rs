//! Scoring: grades the current mind map against the reference article.
//!
//! Grades the map, not the conversation: the model input is the article
//! plus the latest map payload alone, so earlier chatter cannot sway the
//! score. The output contract is a JSON object with `Claim`, `Evidence`
//! and `Reasoning` sections, each carrying coverage, score and feedback.

use serde_json::{Map, Value};

use crate::domain::conversation::{parse_structured, Envelope, Message, Role, SharedInputs};

use super::prompts::{with_article, SCORING_PROMPT};
use super::responder::{AgentReply, Responder};

/// Dimensions the model must score.
const DIMENSIONS: [&str; 3] = ["Claim", "Evidence", "Reasoning"];

/// Responder for map evaluation requests.
#[derive(Debug, Default)]
pub struct ScoringResponder;

impl ScoringResponder {
    /// The latest map payload in the history, encoded for the model.
    /// Falls back to an empty object when no user turn carried one.
    fn latest_map_payload(history: &[Message]) -> String {
        history
            .iter()
            .rev()
            .filter(|msg| msg.role == Role::User)
            .find_map(|msg| {
                let envelope = Envelope::decode(&msg.content)?;
                let payload = envelope.context.get("mind_map_data")?;
                serde_json::to_string(payload).ok()
            })
            .unwrap_or_else(|| "{}".to_string())
    }
}

#[async_trait::async_trait]
impl Responder for ScoringResponder {
    fn name(&self) -> &'static str {
        "scoring"
    }

    fn temperature(&self) -> f32 {
        0.3
    }

    fn prepare(&self, history: &[Message], inputs: &SharedInputs) -> Vec<Message> {
        let prompt = with_article(SCORING_PROMPT, &inputs.article_content);
        vec![
            Message::system(prompt),
            Message::user(Self::latest_map_payload(history)),
        ]
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

        if let Some(missing) = DIMENSIONS.iter().find(|dim| !parsed.contains_key(**dim)) {
            tracing::warn!(
                responder = self.name(),
                dimension = *missing,
                "scoring output missing a dimension, passing raw text through"
            );
            return AgentReply::text(raw);
        }

        let mut metadata = Map::new();
        for dim in DIMENSIONS {
            if let Some(Value::Object(section)) = parsed.get(dim) {
                for field in ["coverage", "score", "feedback"] {
                    if let Some(value) = section.get(field) {
                        let key = format!("{}_{field}", dim.to_lowercase());
                        metadata.insert(key, value.clone());
                    }
                }
            }
        }

        let reply = serde_json::to_string_pretty(&Value::Object(parsed))
            .unwrap_or_else(|_| raw.to_string());

        AgentReply { reply, metadata }
    }
}
