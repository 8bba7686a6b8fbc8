use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use handyhub::web::middleware::auth as auth_middleware;
use handyhub::web::routes::{
    auth, categories, location, messages, notifications, profile, providers,
};

#[tokio::main]
async fn main() {
    // Load .env file
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();

    // 2. Connect to the database
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env");
    println!("Connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Cannot connect to DB");

    // 3. Protected routes under one middleware layer
    let protected_routes = Router::new()
        .route(
            "/api/providers/nearby",
            get(providers::nearby_providers_handler),
        )
        .route(
            "/api/providers/:provider_id",
            get(providers::provider_detail_handler),
        )
        .route("/api/categories", get(categories::list_categories_handler))
        .route(
            "/api/notifications",
            get(notifications::list_notifications_handler)
                .post(notifications::push_notification_handler),
        )
        .route(
            "/api/notifications/:notification_id/read",
            post(notifications::mark_read_handler),
        )
        .route(
            "/api/notifications/read-all",
            post(notifications::mark_all_read_handler),
        )
        .route(
            "/api/conversations",
            get(messages::list_conversations_handler),
        )
        .route(
            "/api/conversations/:conversation_id/messages",
            get(messages::list_messages_handler).post(messages::send_message_handler),
        )
        .route("/api/chat/health", get(messages::health_handler))
        .route(
            "/api/location/search",
            get(location::search_locations_handler),
        )
        .route("/api/me", get(profile::me_handler))
        .route("/api/auth/logout", post(auth::logout_handler))
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_auth,
        ));

    // 4. Build the whole application
    let app = Router::new()
        // Public routes
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({ "status": "ok" })) }),
        )
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/register", post(auth::register_handler))
        // Protected routes
        .merge(protected_routes)
        // Layers
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        // State
        .with_state(pool);

    // 5. Start the server (with fallback port)
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "⚠️  Could not bind on {}: {}. Trying fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Cannot parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Cannot bind on fallback port")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    println!("🚀 HandyHub backend running on http://{}", bound_addr);

    axum::serve(listener, app).await.unwrap();
}
