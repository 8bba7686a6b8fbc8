use sqlx::SqlitePool;

use crate::models::NotificationRow;

pub const SQL_LIST_NOTIFICATIONS: &str = r#"
SELECT notification_id, user_id, title, body, kind, is_read, created_at
FROM notifications
WHERE user_id = ?1
ORDER BY created_at DESC
LIMIT ?2
"#;

pub async fn list_notifications(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<NotificationRow>> {
    sqlx::query_as::<_, NotificationRow>(SQL_LIST_NOTIFICATIONS)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}

const SQL_COUNT_UNREAD: &str = r#"
SELECT COUNT(*)
FROM notifications
WHERE user_id = ?1
  AND (is_read = 0 OR is_read IS NULL)
"#;

pub async fn count_unread(pool: &SqlitePool, user_id: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_UNREAD)
        .bind(user_id)
        .fetch_one(pool)
        .await
}

const SQL_MARK_READ: &str = r#"
UPDATE notifications
SET is_read = 1
WHERE notification_id = ?1 AND user_id = ?2
"#;

pub async fn mark_read(
    pool: &SqlitePool,
    user_id: &str,
    notification_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_MARK_READ)
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_MARK_ALL_READ: &str = r#"
UPDATE notifications
SET is_read = 1
WHERE user_id = ?1
  AND (is_read = 0 OR is_read IS NULL)
"#;

pub async fn mark_all_read(pool: &SqlitePool, user_id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_MARK_ALL_READ)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_INSERT_NOTIFICATION: &str = r#"
INSERT INTO notifications (notification_id, user_id, title, body, kind, is_read, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, 0, datetime('now'))
"#;

pub async fn insert_notification(
    pool: &SqlitePool,
    notification_id: &str,
    user_id: &str,
    title: &str,
    body: &str,
    kind: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_NOTIFICATION)
        .bind(notification_id)
        .bind(user_id)
        .bind(title)
        .bind(body)
        .bind(kind)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
