// Notification kinds mirror the client: "job", "system", "payment".
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationRow {
    pub notification_id: String,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub is_read: Option<i64>,
    pub created_at: Option<String>,
}
