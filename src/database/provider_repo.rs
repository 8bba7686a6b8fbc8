use sqlx::{sqlite::SqliteArguments, Arguments, SqlitePool};

use crate::models::{ProviderGeoCandidateRow, ProviderRow};

pub const SQL_PROVIDER_BASE: &str = r#"
SELECT
    p.provider_id, p.business_name, p.category, p.avatar_url,
    p.rating_average, p.rating_count, p.experience,
    p.is_available, p.is_verified, p.latitude, p.longitude
FROM service_providers p
WHERE (p.is_deleted = 0 OR p.is_deleted IS NULL)
"#;

pub const SQL_LOAD_PROVIDER: &str = r#"
SELECT
    p.provider_id, p.business_name, p.category, p.avatar_url,
    p.rating_average, p.rating_count, p.experience,
    p.is_available, p.is_verified, p.latitude, p.longitude
FROM service_providers p
WHERE p.provider_id = ?1
  AND (p.is_deleted = 0 OR p.is_deleted IS NULL)
"#;

pub async fn load_provider(pool: &SqlitePool, provider_id: &str) -> sqlx::Result<Option<ProviderRow>> {
    sqlx::query_as::<_, ProviderRow>(SQL_LOAD_PROVIDER)
        .bind(provider_id)
        .fetch_optional(pool)
        .await
}

pub async fn load_provider_candidates(
    pool: &SqlitePool,
    category: Option<&str>,
    available_only: bool,
    bbox: Option<(f64, f64, f64, f64)>,
) -> sqlx::Result<Vec<ProviderRow>> {
    let mut sql = String::from(SQL_PROVIDER_BASE);
    let mut args = SqliteArguments::default();

    if let Some(category) = category {
        sql.push_str(" AND p.category = ?");
        args.add(category);
    }

    if available_only {
        sql.push_str(" AND p.is_available = 1");
    }

    if let Some((min_lat, max_lat, min_lon, max_lon)) = bbox {
        sql.push_str(" AND p.latitude BETWEEN ? AND ? AND p.longitude BETWEEN ? AND ?");
        args.add(min_lat);
        args.add(max_lat);
        args.add(min_lon);
        args.add(max_lon);
    }

    sql.push_str(" LIMIT 500");

    sqlx::query_as_with::<_, ProviderRow, _>(&sql, args)
        .fetch_all(pool)
        .await
}

const SQL_LIST_PROVIDERS_MISSING_GEO: &str = r#"
SELECT
  provider_id,
  business_name,
  address,
  latitude,
  longitude
FROM service_providers
WHERE (is_deleted = 0 OR is_deleted IS NULL)
  AND (latitude IS NULL OR longitude IS NULL)
  AND address IS NOT NULL
  AND address != ''
ORDER BY created_at ASC
LIMIT ?
"#;

pub async fn list_providers_missing_geo(
    pool: &SqlitePool,
    limit: i64,
) -> sqlx::Result<Vec<ProviderGeoCandidateRow>> {
    sqlx::query_as::<_, ProviderGeoCandidateRow>(SQL_LIST_PROVIDERS_MISSING_GEO)
        .bind(limit)
        .fetch_all(pool)
        .await
}

const SQL_UPDATE_PROVIDER_GEO: &str = r#"
UPDATE service_providers
SET latitude = ?, longitude = ?
WHERE provider_id = ?
"#;

pub async fn update_provider_geo(
    pool: &SqlitePool,
    provider_id: &str,
    latitude: f64,
    longitude: f64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_PROVIDER_GEO)
        .bind(latitude)
        .bind(longitude)
        .bind(provider_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
