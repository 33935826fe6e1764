mod config;
mod edits;
mod errors;
mod export;
mod layout;
mod models;
mod normalize;
mod photo;
mod render;
mod routes;
mod session;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::a4_page;
use crate::routes::build_router;
use crate::session::ResumeSession;
use crate::state::AppState;
use crate::storage::{FileKvStore, KvStore, RedisKvStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails only on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume builder v{}", env!("CARGO_PKG_VERSION"));

    // Pick the storage backend
    let store: Arc<dyn KvStore> = match &config.redis_url {
        Some(url) => {
            info!("Storing the resume in Redis");
            Arc::new(RedisKvStore::open(url)?)
        }
        None => {
            info!("Storing the resume under {}", config.storage_dir.display());
            Arc::new(FileKvStore::new(config.storage_dir.clone()))
        }
    };

    let session = Arc::new(ResumeSession::open(store).await);

    let page = a4_page();
    info!(
        "Page geometry: {}x{}pt, {}pt margins",
        page.width_pt, page.height_pt, page.margin_pt
    );

    let state = AppState { session, page };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port).parse()?;
    info!("Listening on http://{addr} (preview at http://{addr}/preview)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
