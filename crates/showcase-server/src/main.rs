use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use showcase_api::{AppState, AppStateInner};
use showcase_media::HostedMediaStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showcase=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("SHOWCASE_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("SHOWCASE_DB_PATH").unwrap_or_else(|_| "showcase.db".into());
    let host = std::env::var("SHOWCASE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("SHOWCASE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let media_url = std::env::var("SHOWCASE_MEDIA_URL")
        .unwrap_or_else(|_| "http://localhost:9000".into());
    let media_key = std::env::var("SHOWCASE_MEDIA_KEY").unwrap_or_default();
    let max_file_size: usize = std::env::var("SHOWCASE_MAX_FILE_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10 * 1024 * 1024);

    // Legacy compatibility mode: requests without a recognized profile id
    // fall back to tenant 1. On by default for pre-multi-tenant data; set
    // SHOWCASE_LEGACY_TENANT=0 to disable on fresh deployments.
    let legacy_enabled = std::env::var("SHOWCASE_LEGACY_TENANT")
        .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
        .unwrap_or(true);
    if legacy_enabled {
        warn!("Legacy single-tenant fallback enabled (SHOWCASE_LEGACY_TENANT=0 to disable)");
    }

    // Init database and media client
    let db = showcase_db::Database::open(&PathBuf::from(&db_path))?;
    let media = Arc::new(HostedMediaStore::new(media_url, media_key));

    let state: AppState = Arc::new(AppStateInner {
        db,
        media,
        jwt_secret,
        legacy_tenant: legacy_enabled.then_some(1),
        max_file_size,
    });

    let app = showcase_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Showcase server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
