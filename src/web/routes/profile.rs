use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::profile_service;
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn me_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let view = match profile_service::load_profile_view(&pool, &auth_user.id).await {
        Ok(v) => v,
        Err(e) => {
            warn!("Profile load failed for {}: {}", auth_user.id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(view) = view else {
        return StatusCode::NOT_FOUND.into_response();
    };

    Json(view).into_response()
}
