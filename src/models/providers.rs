// Row for the provider search grid.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProviderRow {
    pub provider_id: String,
    pub business_name: Option<String>,
    pub category: Option<String>,
    pub avatar_url: Option<String>,
    pub rating_average: Option<f64>,
    pub rating_count: Option<i64>,
    pub experience: Option<String>,
    pub is_available: Option<i64>,
    pub is_verified: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProviderGeoCandidateRow {
    pub provider_id: String,
    pub business_name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
