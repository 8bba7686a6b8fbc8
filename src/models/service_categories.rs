#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceCategoryRow {
    pub category_id: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}
