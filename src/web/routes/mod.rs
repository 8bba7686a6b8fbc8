pub mod auth;
pub mod categories;
pub mod location;
pub mod messages;
pub mod notifications;
pub mod profile;
pub mod providers;
