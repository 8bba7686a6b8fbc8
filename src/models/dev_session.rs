#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DevSessionRow {
    pub user_id: String,
}
