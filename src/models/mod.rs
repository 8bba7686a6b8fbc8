pub mod dev_session;
pub mod notifications;
pub mod providers;
pub mod service_categories;
pub mod user_profiles;

pub use dev_session::DevSessionRow;
pub use notifications::NotificationRow;
pub use providers::{ProviderGeoCandidateRow, ProviderRow};
pub use service_categories::ServiceCategoryRow;
pub use user_profiles::{ServiceProviderRow, UserProfileRow};
