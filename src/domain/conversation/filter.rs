//! Context-scoped message filtering.
//!
//! Responders differ in how much structural context they may see: the
//! operator-support agent and the classifier work from queries alone, while
//! the cognitive-support agent reads the full map data. Filtering rewrites
//! user envelopes down to `query` plus an allow-list of context keys before
//! the history reaches the model. This is a token-budget and stability
//! control; the caller decides per responder what context is relevant.

use serde_json::{Map, Value};

use super::{Message, Role};

/// Reduces user envelope messages to `query` plus the allow-listed context
/// keys.
///
/// An empty `keep_fields` strips context entirely. A non-empty list is an
/// allow-list: unlisted keys are dropped even when present. Non-envelope or
/// non-decodable messages pass through unchanged.
pub fn filter_messages(messages: &[Message], keep_fields: &[&str]) -> Vec<Message> {
    messages
        .iter()
        .map(|msg| {
            if msg.role != Role::User {
                return msg.clone();
            }
            match reduced_content(&msg.content, keep_fields) {
                Some(content) => Message {
                    content,
                    ..msg.clone()
                },
                None => msg.clone(),
            }
        })
        .collect()
}

/// Re-encodes envelope content with only the allow-listed context keys.
/// Returns `None` when the content is not an envelope.
fn reduced_content(content: &str, keep_fields: &[&str]) -> Option<String> {
    let data: Value = serde_json::from_str(content).ok()?;
    let data = data.as_object()?;
    let query = data.get("query")?;

    let mut reduced = Map::new();
    reduced.insert("query".to_string(), query.clone());

    if !keep_fields.is_empty() {
        if let Some(Value::Object(context)) = data.get("context") {
            let kept: Map<String, Value> = keep_fields
                .iter()
                .filter_map(|field| context.get(*field).map(|v| ((*field).to_string(), v.clone())))
                .collect();
            if !kept.is_empty() {
                reduced.insert("context".to_string(), Value::Object(kept));
            }
        }
    }

    serde_json::to_string(&Value::Object(reduced)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Envelope;
    use serde_json::json;

    fn envelope_message(query: &str, context: Value) -> Message {
        let mut envelope = Envelope::new(query);
        if let Value::Object(map) = context {
            envelope.context = map;
        }
        Message::user(envelope.encode())
    }

    #[test]
    fn empty_keep_list_strips_context_entirely() {
        let messages = vec![envelope_message(
            "how do I add a node?",
            json!({"mind_map_data": {"nodes": [1, 2]}, "essay_content": "draft"}),
        )];

        let filtered = filter_messages(&messages, &[]);
        let value: Value = serde_json::from_str(&filtered[0].content).unwrap();
        assert_eq!(value, json!({"query": "how do I add a node?"}));
    }

    #[test]
    fn allow_list_keeps_only_listed_keys() {
        let messages = vec![envelope_message("q", json!({"a": 1, "b": 2}))];

        let filtered = filter_messages(&messages, &["a"]);
        let value: Value = serde_json::from_str(&filtered[0].content).unwrap();
        assert_eq!(value, json!({"query": "q", "context": {"a": 1}}));
    }

    #[test]
    fn allow_listed_but_absent_keys_yield_no_context() {
        let messages = vec![envelope_message("q", json!({"b": 2}))];

        let filtered = filter_messages(&messages, &["a"]);
        let value: Value = serde_json::from_str(&filtered[0].content).unwrap();
        assert_eq!(value, json!({"query": "q"}));
    }

    #[test]
    fn non_envelope_user_messages_pass_through() {
        let messages = vec![Message::user("plain text, not an envelope")];
        let filtered = filter_messages(&messages, &[]);
        assert_eq!(filtered[0].content, "plain text, not an envelope");
    }

    #[test]
    fn assistant_and_system_messages_pass_through() {
        let messages = vec![
            Message::system(r#"{"query": "looks like an envelope but is a prompt"}"#),
            Message::assistant("reply"),
        ];

        let filtered = filter_messages(&messages, &[]);
        assert_eq!(filtered[0].content, messages[0].content);
        assert_eq!(filtered[1].content, "reply");
    }

    #[test]
    fn no_output_message_carries_context_when_list_is_empty() {
        let messages = vec![
            envelope_message("a", json!({"mind_map_data": {}})),
            Message::assistant("ok"),
            envelope_message("b", json!({"essay_content": "text"})),
        ];

        for msg in filter_messages(&messages, &[]) {
            if msg.role == Role::User {
                let value: Value = serde_json::from_str(&msg.content).unwrap();
                assert!(value.get("context").is_none());
            }
        }
    }
}
