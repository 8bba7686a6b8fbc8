use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::info;
use tracing::warn;

use crate::database::provider_repo;
use crate::services::location_service;

#[derive(Debug, Default)]
pub struct ProviderGeoBackfillReport {
    pub candidates: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Geocode providers that signed up with an address but no coordinates.
/// Nearby search drops them until this runs, so it is scheduled alongside
/// provider onboarding.
pub async fn backfill_provider_geo(
    pool: &SqlitePool,
    limit: i64,
) -> sqlx::Result<ProviderGeoBackfillReport> {
    let candidates = provider_repo::list_providers_missing_geo(pool, limit).await?;
    let mut report = ProviderGeoBackfillReport {
        candidates: candidates.len(),
        ..Default::default()
    };

    let mut cache: HashMap<String, (f64, f64)> = HashMap::new();

    for row in candidates {
        if row.latitude.is_some() && row.longitude.is_some() {
            report.skipped += 1;
            continue;
        }

        let queries = build_queries(&row.address, &row.business_name);

        let mut chosen: Option<(f64, f64)> = None;
        for query in queries {
            let cache_key = query.to_lowercase();
            if let Some(coords) = cache.get(&cache_key).copied() {
                chosen = Some(coords);
                break;
            }

            let coords = match location_service::search_places(&query, 3).await {
                Ok(results) => results.first().map(|r| (r.latitude, r.longitude)),
                Err(_) => {
                    report.failed += 1;
                    chosen = None;
                    break;
                }
            };

            if let Some(coords) = coords {
                cache.insert(cache_key, coords);
                chosen = Some(coords);
                break;
            }
        }

        let Some((lat, lon)) = chosen else {
            warn!(
                "📍 No coords found for provider {} (business='{}')",
                row.provider_id, row.business_name
            );
            report.failed += 1;
            continue;
        };

        let updated = provider_repo::update_provider_geo(pool, &row.provider_id, lat, lon).await?;
        if updated > 0 {
            report.updated += 1;
        } else {
            report.failed += 1;
        }
    }

    info!(
        "📍 Provider geo backfill done: candidates={}, updated={}, skipped={}, failed={}",
        report.candidates, report.updated, report.skipped, report.failed
    );

    Ok(report)
}

/// Most specific query first; fall back to the bare business name when the
/// address yields nothing.
fn build_queries(address: &str, business_name: &str) -> Vec<String> {
    let mut queries = Vec::new();

    let address = address.trim();
    if !address.is_empty() {
        queries.push(address.to_string());
    }

    let business_name = business_name.trim();
    if !business_name.is_empty() {
        if !address.is_empty() {
            queries.push(format!("{} {}", business_name, address));
        }
        queries.push(business_name.to_string());
    }

    let mut seen = std::collections::HashSet::new();
    queries
        .into_iter()
        .filter(|q| seen.insert(q.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_queries_prefers_the_address() {
        let queries = build_queries("12 Market St, San Francisco", "Master Plumbers Co.");
        assert_eq!(queries[0], "12 Market St, San Francisco");
        assert!(queries.contains(&"Master Plumbers Co.".to_string()));
    }

    #[test]
    fn build_queries_deduplicates_case_insensitively() {
        let queries = build_queries("Main Street", "main street");
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0], "Main Street");
    }
}
