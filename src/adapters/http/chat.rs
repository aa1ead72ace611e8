//! HTTP endpoints for the tutoring chat.
//!
//! - POST /api/chat - run one conversation turn for a map
//! - GET /api/chat/:map_id/history - the map's conversation so far
//!
//! Responses always carry a `success` flag. Turn-internal model failures
//! never surface as HTTP errors (the reply is the fallback text instead);
//! only persistence failures map to a 500.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{ChatError, ChatService, HistoryMessage};

/// Shared state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub service: Arc<ChatService>,
}

impl ChatAppState {
    /// Creates the handler state.
    pub fn new(service: Arc<ChatService>) -> Self {
        Self { service }
    }
}

/// Routes for chat endpoints, nested under /api.
pub fn chat_router(state: ChatAppState) -> Router {
    Router::new()
        .route("/api/chat", post(send_message))
        .route("/api/chat/:map_id/history", get(get_history))
        .with_state(state)
}

/// Request body for POST /api/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The map whose conversation this turn belongs to.
    pub map_id: i64,
    /// The student's message.
    pub message: String,
    /// Current map payload, empty object when absent.
    #[serde(default = "empty_object")]
    pub mind_map_data: Value,
    /// Reference article text, empty when the map has no template.
    #[serde(default)]
    pub article_content: String,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Response body for POST /api/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    /// The category the turn was routed to.
    pub category: String,
}

/// Response body for GET /api/chat/:map_id/history.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub messages: Vec<HistoryMessage>,
}

/// Error body shared by both endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub detail: String,
}

/// POST /api/chat - runs one conversation turn.
async fn send_message(
    State(state): State<ChatAppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    let reply = state
        .service
        .process_message(
            request.map_id,
            &request.message,
            request.mind_map_data,
            &request.article_content,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(ChatResponse {
            success: true,
            message: reply.message,
            category: reply.classification.category.to_string(),
        }),
    ))
}

/// GET /api/chat/:map_id/history - the map's conversation so far.
async fn get_history(
    State(state): State<ChatAppState>,
    Path(map_id): Path<i64>,
) -> Result<impl IntoResponse, ChatApiError> {
    let messages = state.service.history(map_id).await?;

    Ok((
        StatusCode::OK,
        Json(HistoryResponse {
            success: true,
            messages,
        }),
    ))
}

/// Wraps facade errors for HTTP presentation.
#[derive(Debug)]
pub struct ChatApiError(ChatError);

impl From<ChatError> for ChatApiError {
    fn from(err: ChatError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        tracing::error!(error = %err, "chat request failed");

        let body = ErrorResponse {
            success: false,
            message: err.user_message().to_string(),
            error: ErrorDetail {
                kind: err.kind().to_string(),
                detail: err.to_string(),
            },
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
