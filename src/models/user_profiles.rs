#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfileRow {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub is_provider: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceProviderRow {
    pub provider_id: String,
    pub business_name: Option<String>,
    pub category: Option<String>,
    pub experience: Option<String>,
}
