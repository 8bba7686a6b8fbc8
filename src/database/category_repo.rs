use sqlx::SqlitePool;

use crate::models::ServiceCategoryRow;

pub const SQL_LIST_CATEGORIES: &str = r#"
SELECT category_id, name, icon, color
FROM service_categories
ORDER BY sort_order ASC, name ASC
"#;

pub async fn list_categories(pool: &SqlitePool) -> sqlx::Result<Vec<ServiceCategoryRow>> {
    sqlx::query_as::<_, ServiceCategoryRow>(SQL_LIST_CATEGORIES)
        .fetch_all(pool)
        .await
}
