use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use doclens_backend::config;
use doclens_backend::service::DocumentService;
use doclens_backend::store::SqliteStore;
use state::AppState;

/// All HTTP routes / 路由表
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(api::server::health_check))
        .route(
            "/api/documents",
            get(api::documents::list_documents).post(api::documents::create_document),
        )
        .route("/api/documents/search", get(api::search::search_all))
        .route(
            "/api/documents/:documentId",
            get(api::documents::get_document).patch(api::documents::replace_ranges),
        )
        .route("/api/documents/:documentId/search", get(api::search::search_document))
        .route("/api/search", post(api::search::search_ranked))
        .route("/api/upload", post(api::upload::upload_file))
        .layer(DefaultBodyLimit::disable()) // No size limit
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doclens_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    let app_config = config::init_config()
        .map_err(anyhow::Error::msg)?
        .read()
        .clone();
    tracing::info!("Server will listen on {}", app_config.get_bind_address());

    // Create data directory if not exists / 创建数据目录
    let data_dir = app_config.get_data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Created data directory: {:?}", data_dir);
    }

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| app_config.get_database_url());
    let store = Arc::new(SqliteStore::connect(&database_url).await?);

    let state = Arc::new(AppState {
        service: DocumentService::new(store, &app_config),
    });
    let app = build_router(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
