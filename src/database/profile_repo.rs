use sqlx::SqlitePool;

use crate::models::{DevSessionRow, ServiceProviderRow, UserProfileRow};

pub const SQL_LOAD_USER_PROFILE: &str = r#"
SELECT user_id, name, email, avatar_url, is_provider, latitude, longitude
FROM user_profiles
WHERE user_id = ?1
"#;

pub async fn load_user_profile(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<UserProfileRow>> {
    sqlx::query_as::<_, UserProfileRow>(SQL_LOAD_USER_PROFILE)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub const SQL_LOAD_PROVIDER_PROFILE: &str = r#"
SELECT provider_id, business_name, category, experience
FROM service_providers
WHERE provider_id = ?1
  AND (is_deleted = 0 OR is_deleted IS NULL)
"#;

pub async fn load_provider_profile(
    pool: &SqlitePool,
    user_id: &str,
) -> sqlx::Result<Option<ServiceProviderRow>> {
    sqlx::query_as::<_, ServiceProviderRow>(SQL_LOAD_PROVIDER_PROFILE)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

// Offline/dev fallback: a single-row table holding the signed-in user id,
// used when no JWT cookie is present.
pub const SQL_LOAD_DEV_SESSION_USER_ID: &str = r#"
SELECT user_id
FROM dev_session
LIMIT 1
"#;

pub async fn load_dev_session_user_id(pool: &SqlitePool) -> sqlx::Result<Option<String>> {
    let row = sqlx::query_as::<_, DevSessionRow>(SQL_LOAD_DEV_SESSION_USER_ID)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.user_id))
}
