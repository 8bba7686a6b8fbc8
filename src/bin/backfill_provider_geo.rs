use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;

use handyhub::services::provider_geo_service;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env");
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Cannot connect to DB");

    let limit: i64 = env::var("BACKFILL_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(500);

    match provider_geo_service::backfill_provider_geo(&pool, limit).await {
        Ok(report) => {
            println!(
                "provider geo backfill: candidates={}, updated={}, skipped={}, failed={}",
                report.candidates, report.updated, report.skipped, report.failed
            );
        }
        Err(e) => {
            eprintln!("provider geo backfill failed: {}", e);
            std::process::exit(1);
        }
    }
}
