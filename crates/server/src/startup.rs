use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use configs::{AppConfig, StorageConfig};
use dotenvy::dotenv;
use storage::{LocalFsBackend, ObjectStore, S3Backend};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Construct the object store selected by configuration. The store is
/// built once here and shared by reference with every request.
async fn build_store(cfg: &StorageConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    match cfg.backend.as_str() {
        "local" => {
            info!(root = %cfg.local_root, "using local filesystem storage backend");
            Ok(Arc::new(LocalFsBackend::new(&cfg.local_root).await?))
        }
        _ => {
            info!(bucket = %cfg.bucket, endpoint = cfg.endpoint.as_deref().unwrap_or("aws"), "using s3 storage backend");
            Ok(Arc::new(S3Backend::new(&cfg.bucket, cfg.endpoint.as_deref()).await))
        }
    }
}

/// Public entry: build the app and run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    let cfg = AppConfig::load_and_validate()?;
    let store = build_store(&cfg.storage).await?;
    let state = AppState::new(store, cfg.storage.bucket.clone());

    let app: Router = routes::build_router(build_cors(), state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, bucket = %cfg.storage.bucket, "starting slot document server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
