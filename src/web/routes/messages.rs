use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::services::message_service::{self, ChatUpstreamError};
use crate::web::middleware::auth::AuthenticatedUser;

fn upstream_error(context: &str, e: ChatUpstreamError) -> (StatusCode, Json<Value>) {
    tracing::warn!(status = %e.status, body = ?e.body, "{}_failed", context);
    (
        e.status,
        Json(
            e.body
                .unwrap_or_else(|| serde_json::json!({ "error": "bad_gateway" })),
        ),
    )
}

fn require_token(auth_user: &AuthenticatedUser) -> Result<String, (StatusCode, Json<Value>)> {
    auth_user.token.clone().ok_or((
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": "unauthorized" })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListConversationsQuery {
    limit: Option<i64>,
    before: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    limit: Option<i64>,
    before: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    content: String,
}

pub async fn health_handler() -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    message_service::health()
        .await
        .map(Json)
        .map_err(|e| upstream_error("chat_health", e))
}

pub async fn list_conversations_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(q): Query<ListConversationsQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let token = require_token(&auth_user)?;
    message_service::list_conversations(&token, q.limit.unwrap_or(50), q.before)
        .await
        .map(Json)
        .map_err(|e| upstream_error("chat_list_conversations", e))
}

pub async fn list_messages_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(conversation_id): Path<String>,
    Query(q): Query<ListMessagesQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let token = require_token(&auth_user)?;
    message_service::list_messages(&token, &conversation_id, q.limit.unwrap_or(50), q.before)
        .await
        .map(Json)
        .map_err(|e| upstream_error("chat_list_messages", e))
}

pub async fn send_message_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(conversation_id): Path<String>,
    Json(body): Json<SendMessageBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let token = require_token(&auth_user)?;

    if body.content.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "empty_message" })),
        ));
    }

    message_service::send_message(&token, &conversation_id, body.content)
        .await
        .map(Json)
        .map_err(|e| upstream_error("chat_send_message", e))
}
