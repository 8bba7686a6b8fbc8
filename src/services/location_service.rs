use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::services::ranking_service::Coordinate;

#[derive(Debug, Error)]
pub enum LocationLookupError {
    #[error("geocoding upstream unreachable: {0}")]
    Connect(#[source] reqwest::Error),
    #[error("geocoding upstream returned {0}")]
    Status(reqwest::StatusCode),
    #[error("geocoding response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

/// One entry in the client's location selector dropdown.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceSuggestion {
    pub id: String,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

// Nominatim-style search hit: coordinates arrive as strings, and the label
// field depends on the place type.
#[derive(Debug, Deserialize)]
struct GeocodeHit {
    place_id: Option<i64>,
    display_name: Option<String>,
    name: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
}

fn geocode_base_url() -> String {
    std::env::var("LOCATION_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

/// Free-text place search against the geocoding upstream. Backs the
/// client's location selector and the provider geo backfill.
pub async fn search_places(
    q: &str,
    limit: usize,
) -> Result<Vec<PlaceSuggestion>, LocationLookupError> {
    let q = q.trim();
    if q.len() < 2 {
        return Ok(Vec::new());
    }

    let limit = limit.clamp(1, 20);
    let url = format!("{}/search", geocode_base_url().trim_end_matches('/'));

    let client = reqwest::Client::new();
    let mut req = client.get(&url).query(&[
        ("q", q),
        ("format", "jsonv2"),
        ("limit", &limit.to_string()),
    ]);
    if let Ok(key) = std::env::var("LOCATION_API_KEY") {
        req = req.header("x-api-key", key);
    }

    let resp = req.send().await.map_err(|e| {
        warn!("📍 Geocoding request failed: {}", e);
        LocationLookupError::Connect(e)
    })?;

    let status = resp.status();
    if !status.is_success() {
        warn!("📍 Geocoding upstream returned {}", status);
        return Err(LocationLookupError::Status(status));
    }

    let hits: Vec<GeocodeHit> = resp.json().await.map_err(LocationLookupError::Decode)?;
    Ok(hits.into_iter().filter_map(suggestion_from_hit).collect())
}

/// Hits with unparsable or out-of-range coordinates are dropped rather than
/// surfaced as broken suggestions.
fn suggestion_from_hit(hit: GeocodeHit) -> Option<PlaceSuggestion> {
    let lat: f64 = hit.lat?.parse().ok()?;
    let lon: f64 = hit.lon?.parse().ok()?;
    let point = Coordinate::new(lat, lon).ok()?;

    let label = hit
        .display_name
        .or(hit.name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    Some(PlaceSuggestion {
        id: hit.place_id.map(|id| id.to_string()).unwrap_or_default(),
        label,
        latitude: point.latitude(),
        longitude: point.longitude(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(lat: &str, lon: &str, display_name: Option<&str>, name: Option<&str>) -> GeocodeHit {
        GeocodeHit {
            place_id: Some(42),
            display_name: display_name.map(|s| s.to_string()),
            name: name.map(|s| s.to_string()),
            lat: Some(lat.to_string()),
            lon: Some(lon.to_string()),
        }
    }

    #[test]
    fn suggestion_parses_string_coordinates() {
        let s = suggestion_from_hit(hit("37.7749", "-122.4194", Some("San Francisco, CA"), None))
            .unwrap();
        assert_eq!(s.id, "42");
        assert_eq!(s.label, "San Francisco, CA");
        assert!((s.latitude - 37.7749).abs() < 1e-9);
        assert!((s.longitude - -122.4194).abs() < 1e-9);
    }

    #[test]
    fn suggestion_falls_back_to_the_short_name() {
        let s = suggestion_from_hit(hit("51.5", "-0.12", None, Some("London"))).unwrap();
        assert_eq!(s.label, "London");
    }

    #[test]
    fn suggestion_drops_bad_coordinates() {
        assert!(suggestion_from_hit(hit("not-a-number", "-0.12", Some("x"), None)).is_none());
        assert!(suggestion_from_hit(hit("91.2", "-0.12", Some("x"), None)).is_none());
        assert!(suggestion_from_hit(hit("51.5", "181.0", Some("x"), None)).is_none());
    }

    #[test]
    fn suggestion_requires_some_label() {
        assert!(suggestion_from_hit(hit("51.5", "-0.12", Some("   "), None)).is_none());
        assert!(suggestion_from_hit(hit("51.5", "-0.12", None, None)).is_none());
    }
}
