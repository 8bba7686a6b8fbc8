use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::notification_repo;

#[derive(Debug, Serialize)]
pub struct NotificationView {
    pub notification_id: String,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub is_read: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotificationPageData {
    pub notifications: Vec<NotificationView>,
    pub unread_count: i64,
}

const NOTIFICATION_KINDS: [&str; 3] = ["job", "system", "payment"];

pub async fn build_notification_page(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> sqlx::Result<NotificationPageData> {
    let rows = notification_repo::list_notifications(pool, user_id, limit.clamp(1, 200)).await?;
    let unread_count = notification_repo::count_unread(pool, user_id).await?;

    let notifications = rows
        .into_iter()
        .map(|row| NotificationView {
            notification_id: row.notification_id,
            title: row.title,
            body: row.body,
            kind: row.kind,
            is_read: row.is_read.unwrap_or(0) == 1,
            created_at: row.created_at,
        })
        .collect();

    Ok(NotificationPageData {
        notifications,
        unread_count,
    })
}

pub async fn mark_read(
    pool: &SqlitePool,
    user_id: &str,
    notification_id: &str,
) -> sqlx::Result<bool> {
    let updated = notification_repo::mark_read(pool, user_id, notification_id).await?;
    Ok(updated > 0)
}

pub async fn mark_all_read(pool: &SqlitePool, user_id: &str) -> sqlx::Result<u64> {
    notification_repo::mark_all_read(pool, user_id).await
}

/// Unknown kinds collapse to "system" so the client's icon mapping never
/// sees a value it does not understand.
pub async fn push_notification(
    pool: &SqlitePool,
    user_id: &str,
    title: &str,
    body: &str,
    kind: &str,
) -> sqlx::Result<String> {
    let kind = if NOTIFICATION_KINDS.contains(&kind) {
        kind
    } else {
        "system"
    };
    let notification_id = Uuid::new_v4().to_string();
    notification_repo::insert_notification(pool, &notification_id, user_id, title, body, kind)
        .await?;
    Ok(notification_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_are_complete() {
        for kind in ["job", "system", "payment"] {
            assert!(NOTIFICATION_KINDS.contains(&kind));
        }
        assert!(!NOTIFICATION_KINDS.contains(&"spam"));
    }
}
