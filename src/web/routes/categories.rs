use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::category_repo;

#[derive(Debug, Serialize)]
pub struct ServiceCategoryView {
    pub category_id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

pub async fn list_categories_handler(State(pool): State<SqlitePool>) -> impl IntoResponse {
    let rows = match category_repo::list_categories(&pool).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Category list load failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let categories: Vec<ServiceCategoryView> = rows
        .into_iter()
        .map(|row| ServiceCategoryView {
            category_id: row.category_id,
            name: row.name,
            icon: row.icon.unwrap_or_default(),
            color: row.color.unwrap_or_default(),
        })
        .collect();

    Json(serde_json::json!({ "categories": categories })).into_response()
}
