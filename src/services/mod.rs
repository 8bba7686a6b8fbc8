pub mod location_service;
pub mod message_service;
pub mod notification_service;
pub mod profile_service;
pub mod provider_geo_service;
pub mod provider_service;
pub mod ranking_service;
