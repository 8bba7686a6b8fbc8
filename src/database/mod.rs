pub mod category_repo;
pub mod notification_repo;
pub mod profile_repo;
pub mod provider_repo;
