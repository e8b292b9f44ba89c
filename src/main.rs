use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};

use gather::database;
use gather::web::middleware::auth as auth_middleware;
use gather::web::routes::{attendance, feedback, registrations};

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();

    // 2. Connect to the database
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    info!("Connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Cannot connect to database");

    database::ensure_schema(&pool)
        .await
        .expect("Cannot apply database schema");

    // 3. Pipeline routes behind one auth middleware layer
    let protected_routes = Router::new()
        .route(
            "/events/:event_id/registrations",
            post(registrations::register_handler)
                .delete(registrations::unregister_handler)
                .get(registrations::list_handler),
        )
        .route(
            "/events/:event_id/attendance/bulk",
            post(attendance::validate_bulk_handler),
        )
        .route(
            "/events/:event_id/attendance/stats",
            get(attendance::stats_handler),
        )
        .route(
            "/events/:event_id/attendance/:registration_id",
            put(attendance::validate_handler).delete(attendance::reset_handler),
        )
        .route(
            "/events/:event_id/feedback",
            post(feedback::submit_handler).put(feedback::update_handler),
        )
        .route(
            "/events/:event_id/feedback/eligibility",
            get(feedback::eligibility_handler),
        )
        .route(
            "/events/:event_id/feedback/summary",
            get(feedback::summary_handler),
        )
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_auth,
        ));

    // 4. Assemble the application
    let app = Router::new()
        .merge(protected_routes)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
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
            warn!(
                "Could not bind on {}: {}. Trying fallback {}:{}",
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
    info!("Server listening on http://{}", bound_addr);

    axum::serve(listener, app).await.unwrap();
}
