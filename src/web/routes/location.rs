use axum::{extract::Query, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::services::location_service;

#[derive(Debug, Deserialize)]
pub struct LocationSearchQuery {
    q: Option<String>,
    limit: Option<usize>,
}

// Backs the client's location selector; at least two characters before we
// bother the upstream.
pub async fn search_locations_handler(
    Query(query): Query<LocationSearchQuery>,
) -> impl IntoResponse {
    let Some(q) = query.q.as_ref().map(|s| s.trim()).filter(|s| s.len() >= 2) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "query_too_short", "locations": [] })),
        );
    };

    let limit = query.limit.unwrap_or(8).min(20);
    match location_service::search_places(q, limit).await {
        Ok(results) => (StatusCode::OK, Json(json!({ "locations": results }))),
        Err(e) => {
            warn!("Location search failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "upstream_unavailable", "locations": [] })),
            )
        }
    }
}
