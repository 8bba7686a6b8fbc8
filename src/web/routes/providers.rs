use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::provider_service::{self, NearbyQuery, ProviderSearchError};
use crate::services::ranking_service::Coordinate;
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn nearby_providers_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<NearbyQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    match provider_service::search_nearby(&pool, &auth_user.id, &query).await {
        Ok(providers) => (StatusCode::OK, Json(serde_json::json!({ "providers": providers })))
            .into_response(),
        Err(ProviderSearchError::MissingOrigin) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "missing_origin",
                "hint": "Pass lat/lon or store a location on your profile."
            })),
        )
            .into_response(),
        Err(ProviderSearchError::InvalidOrigin(e)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "invalid_origin", "detail": e.to_string() })),
        )
            .into_response(),
        Err(ProviderSearchError::Fetch(e)) => {
            warn!("Nearby provider fetch failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "fetch_failed" })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderDetailQuery {
    lat: Option<f64>,
    lon: Option<f64>,
}

pub async fn provider_detail_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Path(provider_id): Path<String>,
    Query(query): Query<ProviderDetailQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    // A bad origin on the detail page only suppresses the distance badge.
    let origin = query
        .lat
        .zip(query.lon)
        .and_then(|(lat, lon)| Coordinate::new(lat, lon).ok());

    let view = match provider_service::load_provider_detail(&pool, &provider_id, origin).await {
        Ok(v) => v,
        Err(e) => {
            warn!("Provider detail load failed for {}: {}", provider_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(view) = view else {
        return StatusCode::NOT_FOUND.into_response();
    };

    Json(view).into_response()
}
