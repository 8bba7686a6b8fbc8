use std::cmp::Ordering;

use thiserror::Error;

use crate::models::ProviderRow;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A validated latitude/longitude pair. Construction is the only place
/// range checks happen; a `Coordinate` value is always usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        // NaN fails both contains() checks, so it is rejected here too.
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Provider plus its computed distance from the search origin.
/// Built per ranking call, never persisted.
#[derive(Debug, Clone)]
pub struct RankedProvider {
    pub provider: ProviderRow,
    pub distance_km: f64,
}

/// Great-circle distance in km, rounded to one decimal.
/// The rounded value is what gets filtered and sorted on, so a provider at
/// 10.04 km still makes a 10 km radius.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    round_one_decimal(EARTH_RADIUS_KM * c)
}

fn round_one_decimal(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

/// Distance-sort the candidate set around `origin`.
///
/// Candidates without a usable coordinate are dropped: they have no distance,
/// so they can never satisfy the radius filter. (0, 0) counts as unusable —
/// legacy rows used it as a "location unknown" sentinel.
/// Ties keep their input order (stable sort, no secondary key).
pub fn rank_providers(
    origin: Coordinate,
    candidates: Vec<ProviderRow>,
    max_distance_km: Option<f64>,
    category_filter: Option<&str>,
) -> Vec<RankedProvider> {
    let max_km = max_distance_km.unwrap_or(DEFAULT_RADIUS_KM);

    let mut ranked: Vec<RankedProvider> = Vec::new();
    for provider in candidates {
        if let Some(filter) = category_filter {
            if provider.category.as_deref() != Some(filter) {
                continue;
            }
        }

        let Some(point) = candidate_coordinate(&provider) else {
            continue;
        };

        let distance_km = haversine_km(origin, point);
        if distance_km > max_km {
            continue;
        }

        ranked.push(RankedProvider {
            provider,
            distance_km,
        });
    }

    ranked.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// The single place that decides whether a provider row has a usable
/// location. Anything distance-related must go through this, so the
/// legacy (0, 0) sentinel can never leak into output.
pub fn candidate_coordinate(provider: &ProviderRow) -> Option<Coordinate> {
    let lat = provider.latitude?;
    let lon = provider.longitude?;
    if lat == 0.0 && lon == 0.0 {
        return None;
    }
    Coordinate::new(lat, lon).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: &str, category: &str, lat: f64, lon: f64) -> ProviderRow {
        ProviderRow {
            provider_id: id.to_string(),
            business_name: Some(format!("Provider {}", id)),
            category: Some(category.to_string()),
            avatar_url: None,
            rating_average: Some(4.5),
            rating_count: Some(10),
            experience: None,
            is_available: Some(1),
            is_verified: Some(1),
            latitude: Some(lat),
            longitude: Some(lon),
        }
    }

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    const SF: (f64, f64) = (37.7749, -122.4194);

    #[test]
    fn coordinate_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(91.0, 0.0),
            Err(ValidationError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.5),
            Err(ValidationError::LongitudeOutOfRange(-180.5))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn distance_is_symmetric() {
        let a = coord(SF.0, SF.1);
        let b = coord(40.7128, -74.0060);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = coord(SF.0, SF.1);
        assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn distance_matches_reference_point() {
        // Downtown SF to the Alamo Square area, ~1.05 km great-circle.
        let origin = coord(SF.0, SF.1);
        let candidate = coord(37.773972, -122.431297);
        let d = haversine_km(origin, candidate);
        assert!((d - 1.1).abs() < 0.15, "got {}", d);
    }

    #[test]
    fn distance_is_rounded_to_one_decimal() {
        let origin = coord(SF.0, SF.1);
        let candidate = coord(37.783587, -122.408227);
        let d = haversine_km(origin, candidate);
        assert_eq!(d, (d * 10.0).round() / 10.0);
    }

    #[test]
    fn rank_sorts_ascending_by_distance() {
        let origin = coord(SF.0, SF.1);
        let candidates = vec![
            provider("far", "plumbers", 37.85, -122.4194),
            provider("near", "plumbers", 37.776, -122.4194),
            provider("mid", "plumbers", 37.80, -122.4194),
        ];
        let ranked = rank_providers(origin, candidates, Some(25.0), None);
        let ids: Vec<&str> = ranked.iter().map(|r| r.provider.provider_id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
    }

    #[test]
    fn rank_excludes_candidates_beyond_radius() {
        let origin = coord(SF.0, SF.1);
        // ~50 km north of the origin.
        let candidates = vec![
            provider("close", "plumbers", 37.776, -122.4194),
            provider("distant", "plumbers", 38.225, -122.4194),
        ];
        let ranked = rank_providers(origin, candidates, None, None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].provider.provider_id, "close");
        assert!(ranked[0].distance_km <= DEFAULT_RADIUS_KM);
    }

    #[test]
    fn rank_filters_by_exact_category() {
        let origin = coord(SF.0, SF.1);
        let candidates = vec![
            provider("a", "plumbers", 37.776, -122.4194),
            provider("b", "electrical", 37.777, -122.4194),
            provider("c", "Plumbers", 37.778, -122.4194),
        ];
        let ranked = rank_providers(origin, candidates, None, Some("plumbers"));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].provider.provider_id, "a");
        assert_eq!(ranked[0].provider.category.as_deref(), Some("plumbers"));
    }

    #[test]
    fn rank_of_empty_input_is_empty() {
        let origin = coord(SF.0, SF.1);
        assert!(rank_providers(origin, Vec::new(), None, None).is_empty());
    }

    #[test]
    fn rank_drops_candidates_without_coordinates() {
        let origin = coord(SF.0, SF.1);
        let mut no_geo = provider("no_geo", "plumbers", 0.0, 0.0);
        no_geo.latitude = None;
        no_geo.longitude = None;
        let candidates = vec![no_geo, provider("ok", "plumbers", 37.776, -122.4194)];
        let ranked = rank_providers(origin, candidates, None, None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].provider.provider_id, "ok");
    }

    #[test]
    fn rank_treats_null_island_as_missing() {
        // (0, 0) is the legacy "unknown location" sentinel, not a real shop.
        let origin = coord(0.05, 0.05);
        let candidates = vec![
            provider("sentinel", "plumbers", 0.0, 0.0),
            provider("real", "plumbers", 0.06, 0.05),
        ];
        let ranked = rank_providers(origin, candidates, None, None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].provider.provider_id, "real");
    }

    #[test]
    fn rank_keeps_input_order_on_ties() {
        let origin = coord(SF.0, SF.1);
        let candidates = vec![
            provider("first", "plumbers", 37.776, -122.4194),
            provider("second", "plumbers", 37.776, -122.4194),
        ];
        let ranked = rank_providers(origin, candidates, None, None);
        assert_eq!(ranked[0].provider.provider_id, "first");
        assert_eq!(ranked[1].provider.provider_id, "second");
    }

    #[test]
    fn rank_never_grows_the_input() {
        let origin = coord(SF.0, SF.1);
        let candidates = vec![
            provider("a", "plumbers", 37.776, -122.4194),
            provider("b", "plumbers", 37.777, -122.4194),
        ];
        let n = candidates.len();
        assert!(rank_providers(origin, candidates, None, None).len() <= n);
    }
}
