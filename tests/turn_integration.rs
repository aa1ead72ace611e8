//! Integration tests for the full turn pipeline.
//!
//! These tests exercise the end-to-end flow through the public crate API:
//! 1. Chat service derives the thread from the map id
//! 2. Dispatcher loads state, classifies, routes, persists
//! 3. Responders interpret model output defensively
//! 4. Persistence failures abort the turn without corrupting the store
//!
//! Uses the in-memory state store and the mock completion client so no
//! external services are needed.

use std::sync::Arc;

use serde_json::json;

use mindtutor::adapters::ai::MockCompletionClient;
use mindtutor::adapters::memory::InMemoryStateStore;
use mindtutor::application::{ChatService, Dispatcher, TurnError, TurnInput};
use mindtutor::domain::agents::{
    CognitiveSupportResponder, IntentClassifier, OperatorSupportResponder, ResponderTable,
    ScoringResponder, FALLBACK_REPLY,
};
use mindtutor::domain::conversation::{Category, Role};
use mindtutor::domain::foundation::ThreadId;
use mindtutor::ports::{CompletionError, StateStore};

fn build_service(
    client: MockCompletionClient,
    store: Arc<InMemoryStateStore>,
) -> ChatService {
    ChatService::new(build_dispatcher(client, store))
}

fn build_dispatcher(client: MockCompletionClient, store: Arc<InMemoryStateStore>) -> Dispatcher {
    let responders = ResponderTable::new(Arc::new(OperatorSupportResponder))
        .with(Category::OperatorSupport, Arc::new(OperatorSupportResponder))
        .with(
            Category::CognitiveSupport,
            Arc::new(CognitiveSupportResponder),
        )
        .with(Category::Scoring, Arc::new(ScoringResponder));

    Dispatcher::new(
        IntentClassifier::new(Category::OperatorSupport),
        responders,
        Arc::new(client),
        store,
    )
}

const CLASSIFY_OPERATOR: &str = r#"{"next_action": "operator_support", "reasoning": "ui"}"#;

// =============================================================================
// Scenario: a prose-wrapped classification routes to the scoring agent
// =============================================================================

#[tokio::test]
async fn prose_wrapped_classification_routes_to_scoring() {
    let client = MockCompletionClient::new()
        .with_reply(r#"Sure! {"next_action": "scoring", "reasoning": "asked for a grade"}"#)
        .with_reply(
            r#"{"Claim": {"coverage": "80%", "score": "4", "feedback": "solid"},
                "Evidence": {"coverage": "40%", "score": "2", "feedback": "thin"},
                "Reasoning": {"coverage": "60%", "score": "3", "feedback": "connect"}}"#,
        );
    let store = Arc::new(InMemoryStateStore::new());
    let service = build_service(client, Arc::clone(&store));

    let reply = service
        .process_message(
            1,
            "please grade my map",
            json!({"nodes": [{"id": 1, "label": "claim"}]}),
            "Article about the water cycle.",
        )
        .await
        .unwrap();

    assert_eq!(reply.classification.category, Category::Scoring);
    assert_eq!(reply.classification.rationale, "asked for a grade");

    let state = store.load(&ThreadId::for_map(1)).await.unwrap().unwrap();
    assert_eq!(state.responder_metadata()["claim_score"], json!("4"));
    assert_eq!(state.messages()[1].kind.as_deref(), Some("scoring"));
}

// =============================================================================
// Scenario: garbage classifier output degrades to the default route
// =============================================================================

#[tokio::test]
async fn garbage_classifier_output_falls_back_to_default_route() {
    let client = MockCompletionClient::new()
        .with_reply("not json at all")
        .with_reply("You can rename a node by double-clicking it.");
    let store = Arc::new(InMemoryStateStore::new());
    let service = build_service(client, Arc::clone(&store));

    let reply = service
        .process_message(2, "???", json!({}), "")
        .await
        .unwrap();

    assert_eq!(reply.classification.category, Category::OperatorSupport);
    assert_eq!(reply.message, "You can rename a node by double-clicking it.");
}

// =============================================================================
// Scenario: responder invocation failure yields the fallback reply,
// and the turn still persists
// =============================================================================

#[tokio::test]
async fn responder_failure_persists_a_fallback_turn() {
    let client = MockCompletionClient::new()
        .with_reply(CLASSIFY_OPERATOR)
        .with_error(CompletionError::Timeout { timeout_secs: 60 });
    let store = Arc::new(InMemoryStateStore::new());
    let service = build_service(client, Arc::clone(&store));

    let reply = service
        .process_message(3, "help", json!({}), "")
        .await
        .unwrap();

    assert_eq!(reply.message, FALLBACK_REPLY);

    // The failed model call did not lose the turn.
    let state = store.load(&ThreadId::for_map(3)).await.unwrap().unwrap();
    assert_eq!(state.messages().len(), 2);
    assert_eq!(state.messages()[1].content, FALLBACK_REPLY);
}

// =============================================================================
// Scenario: persistence failure aborts the turn; a retry starts clean
// =============================================================================

#[tokio::test]
async fn persistence_failure_aborts_and_retry_starts_clean() {
    let client = MockCompletionClient::new()
        .with_reply(CLASSIFY_OPERATOR)
        .with_reply("first reply")
        .with_reply(CLASSIFY_OPERATOR)
        .with_reply("second reply");
    let store = Arc::new(InMemoryStateStore::new());
    let dispatcher = build_dispatcher(client, Arc::clone(&store));

    let thread = ThreadId::for_map(4);
    store.fail_next_save();

    let err = dispatcher
        .run_turn(TurnInput::new(thread.clone(), "hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, TurnError::Storage(_)));
    assert!(store.load(&thread).await.unwrap().is_none());

    // The retry sees no trace of the failed turn: exactly one user and
    // one assistant message, no duplicates.
    let outcome = dispatcher
        .run_turn(TurnInput::new(thread.clone(), "hello"))
        .await
        .unwrap();
    assert_eq!(outcome.reply, "second reply");
    assert_eq!(outcome.state.messages().len(), 2);
}

// =============================================================================
// Scenario: turns accumulate across requests on the same map
// =============================================================================

#[tokio::test]
async fn history_accumulates_across_turns() {
    let client = MockCompletionClient::new()
        .with_reply(CLASSIFY_OPERATOR)
        .with_reply("Use the toolbar.")
        .with_reply(CLASSIFY_OPERATOR)
        .with_reply("Press ctrl+s.");
    let store = Arc::new(InMemoryStateStore::new());
    let service = build_service(client, Arc::clone(&store));

    service
        .process_message(5, "where is the toolbar?", json!({}), "")
        .await
        .unwrap();
    service
        .process_message(5, "and how do I save?", json!({}), "")
        .await
        .unwrap();

    let history = service.history(5).await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].content, "where is the toolbar?");
    assert_eq!(history[1].content, "Use the toolbar.");
    assert_eq!(history[2].content, "and how do I save?");
    assert_eq!(history[3].content, "Press ctrl+s.");
    assert_eq!(history[0].id, 1);
    assert_eq!(history[3].id, 4);
}

// =============================================================================
// Scenario: concurrent turns on one thread serialize
// =============================================================================

#[tokio::test]
async fn concurrent_turns_on_one_thread_serialize() {
    let client = MockCompletionClient::new()
        .with_reply(CLASSIFY_OPERATOR)
        .with_reply("reply a")
        .with_reply(CLASSIFY_OPERATOR)
        .with_reply("reply b")
        .with_delay(std::time::Duration::from_millis(10));
    let store = Arc::new(InMemoryStateStore::new());
    let dispatcher = Arc::new(build_dispatcher(client, Arc::clone(&store)));

    let thread = ThreadId::for_map(6);
    let mut handles = Vec::new();
    for text in ["first", "second"] {
        let d = Arc::clone(&dispatcher);
        let t = thread.clone();
        handles.push(tokio::spawn(async move {
            d.run_turn(TurnInput::new(t, text)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let state = store.load(&thread).await.unwrap().unwrap();
    let roles: Vec<Role> = state.messages().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
}

// =============================================================================
// Scenario: cognitive support sees the article and full map context
// =============================================================================

#[tokio::test]
async fn cognitive_route_uses_structured_final_response() {
    let client = MockCompletionClient::new()
        .with_reply(r#"{"next_action": "cognitive_support", "reasoning": "asks about evidence"}"#)
        .with_reply(
            r#"{"reasoning": "weak link", "response_strategy": "socratic",
                "strategy_detail": "prompt for connection",
                "final_response": "How does that evidence support your claim?"}"#,
        );
    let store = Arc::new(InMemoryStateStore::new());
    let service = build_service(client, Arc::clone(&store));

    let reply = service
        .process_message(
            7,
            "is my evidence good?",
            json!({"nodes": []}),
            "Article text.",
        )
        .await
        .unwrap();

    assert_eq!(reply.message, "How does that evidence support your claim?");

    let state = store.load(&ThreadId::for_map(7)).await.unwrap().unwrap();
    assert_eq!(
        state.responder_metadata()["response_strategy"],
        json!("socratic")
    );
    // The student-visible log carries the reply text, not the raw JSON.
    assert!(!state.messages()[1].content.contains("response_strategy"));
}
