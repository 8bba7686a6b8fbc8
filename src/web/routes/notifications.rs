use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::notification_service;
use crate::web::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct NotificationListQuery {
    limit: Option<i64>,
}

pub async fn list_notifications_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<NotificationListQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(50);
    match notification_service::build_notification_page(&pool, &auth_user.id, limit).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            warn!("Notification list load failed for {}: {}", auth_user.id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn mark_read_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(notification_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    match notification_service::mark_read(&pool, &auth_user.id, &notification_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            warn!("Mark-read failed for {}: {}", notification_id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn mark_all_read_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    match notification_service::mark_all_read(&pool, &auth_user.id).await {
        Ok(updated) => Json(serde_json::json!({ "updated": updated })).into_response(),
        Err(e) => {
            warn!("Mark-all-read failed for {}: {}", auth_user.id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PushNotificationBody {
    pub title: String,
    pub body: String,
    pub kind: Option<String>,
}

pub async fn push_notification_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Json(body): Json<PushNotificationBody>,
) -> impl IntoResponse {
    if body.title.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "empty_title" })),
        )
            .into_response();
    }

    let kind = body.kind.as_deref().unwrap_or("system");
    match notification_service::push_notification(&pool, &auth_user.id, &body.title, &body.body, kind)
        .await
    {
        Ok(notification_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "notification_id": notification_id })),
        )
            .into_response(),
        Err(e) => {
            warn!("Notification insert failed for {}: {}", auth_user.id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
