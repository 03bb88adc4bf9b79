use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use beacon_api::auth::AppStateInner;
use beacon_api::routes;
use beacon_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beacon=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret = std::env::var("BEACON_JWT_SECRET").unwrap_or_else(|_| {
        warn!("BEACON_JWT_SECRET not set, falling back to the development secret");
        "dev-secret-change-me".into()
    });
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let host = std::env::var("BEACON_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("BEACON_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database (pool + migrations)
    let db = Database::connect(&database_url).await?;

    // Shared state
    let state = Arc::new(AppStateInner {
        store: db,
        jwt_secret,
    });

    // Routes
    let app = routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Beacon server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
