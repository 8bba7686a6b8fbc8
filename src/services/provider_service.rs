use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::database::{profile_repo, provider_repo};
use crate::models::ProviderRow;
use crate::services::ranking_service::{
    self, Coordinate, RankedProvider, ValidationError, DEFAULT_RADIUS_KM,
};

#[derive(Debug, Deserialize, Default)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub category: Option<String>,
    pub radius_km: Option<f64>,
    pub available_only: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ProviderSearchError {
    #[error("no origin coordinate in the request or the caller's profile")]
    MissingOrigin,
    #[error(transparent)]
    InvalidOrigin(#[from] ValidationError),
    #[error("provider fetch failed: {0}")]
    Fetch(#[from] sqlx::Error),
}

#[derive(Debug, Serialize)]
pub struct RankedProviderView {
    pub provider_id: String,
    pub business_name: String,
    pub category: Option<String>,
    pub avatar_url: Option<String>,
    pub rating_average: f64,
    pub rating_count: i64,
    pub experience: Option<String>,
    pub is_available: bool,
    pub is_verified: bool,
    pub distance_km: f64,
}

#[derive(Debug, Serialize)]
pub struct ProviderDetailView {
    pub provider_id: String,
    pub business_name: String,
    pub category: Option<String>,
    pub avatar_url: Option<String>,
    pub rating_average: f64,
    pub rating_count: i64,
    pub experience: Option<String>,
    pub is_available: bool,
    pub is_verified: bool,
    // Only present when the caller supplied an origin.
    pub distance_km: Option<f64>,
}

/// Nearby search: resolve the origin, pull a bounding-box prefiltered
/// candidate set, then let the ranking core do the exact distance work.
pub async fn search_nearby(
    pool: &SqlitePool,
    auth_user_id: &str,
    query: &NearbyQuery,
) -> Result<Vec<RankedProviderView>, ProviderSearchError> {
    let origin = resolve_origin(pool, auth_user_id, query.lat, query.lon).await?;
    let radius_km = sanitize_radius(query.radius_km);

    let bbox = bounding_box(origin, radius_km);
    let candidates = provider_repo::load_provider_candidates(
        pool,
        query.category.as_deref(),
        query.available_only.unwrap_or(false),
        Some(bbox),
    )
    .await?;

    let ranked = ranking_service::rank_providers(
        origin,
        candidates,
        Some(radius_km),
        query.category.as_deref(),
    );

    Ok(ranked.into_iter().map(ranked_view).collect())
}

pub async fn load_provider_detail(
    pool: &SqlitePool,
    provider_id: &str,
    origin: Option<Coordinate>,
) -> sqlx::Result<Option<ProviderDetailView>> {
    let Some(row) = provider_repo::load_provider(pool, provider_id).await? else {
        return Ok(None);
    };

    let distance_km = detail_distance(origin, &row);
    Ok(Some(detail_view(row, distance_km)))
}

/// Distance badge for the detail page. Uses the same usable-coordinate
/// check as ranking, so sentinel rows show no distance instead of one
/// measured to Null Island.
fn detail_distance(origin: Option<Coordinate>, row: &ProviderRow) -> Option<f64> {
    origin
        .zip(ranking_service::candidate_coordinate(row))
        .map(|(from, to)| ranking_service::haversine_km(from, to))
}

/// Explicit query coordinates win; otherwise fall back to the location
/// stored on the caller's profile.
async fn resolve_origin(
    pool: &SqlitePool,
    auth_user_id: &str,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<Coordinate, ProviderSearchError> {
    if let (Some(lat), Some(lon)) = (lat, lon) {
        return Ok(Coordinate::new(lat, lon)?);
    }

    let profile = profile_repo::load_user_profile(pool, auth_user_id).await?;
    let stored = profile.and_then(|p| p.latitude.zip(p.longitude));
    let Some((lat, lon)) = stored else {
        return Err(ProviderSearchError::MissingOrigin);
    };
    Ok(Coordinate::new(lat, lon)?)
}

fn sanitize_radius(radius_km: Option<f64>) -> f64 {
    radius_km
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(DEFAULT_RADIUS_KM)
}

/// Cheap SQL prefilter so we never haul the whole provider table into
/// memory. Slightly over-covers near the poles; the exact Haversine pass
/// trims the corners.
fn bounding_box(origin: Coordinate, radius_km: f64) -> (f64, f64, f64, f64) {
    let lat = origin.latitude();
    let lon = origin.longitude();
    let lat_change = radius_km / 111.0;
    let lon_change = (radius_km / 111.0) / lat.to_radians().cos().abs().max(0.01);

    (
        lat - lat_change,
        lat + lat_change,
        lon - lon_change,
        lon + lon_change,
    )
}

fn ranked_view(ranked: RankedProvider) -> RankedProviderView {
    let RankedProvider {
        provider,
        distance_km,
    } = ranked;
    RankedProviderView {
        provider_id: provider.provider_id,
        business_name: provider.business_name.unwrap_or_default(),
        category: provider.category,
        avatar_url: provider.avatar_url,
        rating_average: provider.rating_average.unwrap_or(0.0),
        rating_count: provider.rating_count.unwrap_or(0),
        experience: provider.experience,
        is_available: provider.is_available.unwrap_or(0) == 1,
        is_verified: provider.is_verified.unwrap_or(0) == 1,
        distance_km,
    }
}

fn detail_view(row: ProviderRow, distance_km: Option<f64>) -> ProviderDetailView {
    ProviderDetailView {
        provider_id: row.provider_id,
        business_name: row.business_name.unwrap_or_default(),
        category: row.category,
        avatar_url: row.avatar_url,
        rating_average: row.rating_average.unwrap_or(0.0),
        rating_count: row.rating_count.unwrap_or(0),
        experience: row.experience,
        is_available: row.is_available.unwrap_or(0) == 1,
        is_verified: row.is_verified.unwrap_or(0) == 1,
        distance_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_radius_defaults_and_rejects_nonsense() {
        assert_eq!(sanitize_radius(None), DEFAULT_RADIUS_KM);
        assert_eq!(sanitize_radius(Some(25.0)), 25.0);
        assert_eq!(sanitize_radius(Some(0.0)), DEFAULT_RADIUS_KM);
        assert_eq!(sanitize_radius(Some(-3.0)), DEFAULT_RADIUS_KM);
        assert_eq!(sanitize_radius(Some(f64::NAN)), DEFAULT_RADIUS_KM);
        assert_eq!(sanitize_radius(Some(f64::INFINITY)), DEFAULT_RADIUS_KM);
    }

    fn provider_at(lat: Option<f64>, lon: Option<f64>) -> ProviderRow {
        ProviderRow {
            provider_id: "p1".to_string(),
            business_name: Some("Master Plumbers Co.".to_string()),
            category: Some("plumbers".to_string()),
            avatar_url: None,
            rating_average: Some(4.8),
            rating_count: Some(112),
            experience: None,
            is_available: Some(1),
            is_verified: Some(1),
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn detail_distance_skips_sentinel_and_missing_locations() {
        let origin = Coordinate::new(0.05, 0.05).ok();
        assert_eq!(detail_distance(origin, &provider_at(Some(0.0), Some(0.0))), None);
        assert_eq!(detail_distance(origin, &provider_at(None, None)), None);
        assert_eq!(detail_distance(None, &provider_at(Some(0.06), Some(0.05))), None);
        assert!(detail_distance(origin, &provider_at(Some(0.06), Some(0.05))).is_some());
    }

    #[test]
    fn bounding_box_contains_the_radius() {
        let origin = Coordinate::new(37.7749, -122.4194).unwrap();
        let (min_lat, max_lat, min_lon, max_lon) = bounding_box(origin, 10.0);
        assert!(min_lat < 37.7749 && 37.7749 < max_lat);
        assert!(min_lon < -122.4194 && -122.4194 < max_lon);
        // 10 km is roughly 0.09 degrees of latitude.
        assert!((max_lat - 37.7749 - 0.09).abs() < 0.01);
        // Longitude degrees shrink with latitude, so the box widens.
        assert!(max_lon - (-122.4194) > max_lat - 37.7749);
    }
}
