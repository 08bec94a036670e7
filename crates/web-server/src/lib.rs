use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use configuration::Settings;
use database::{AssumptionsStore, DbRepository, InMemoryStore, SalesHistory};
use projection::ProjectionEngine;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod tenant;

pub use tenant::TENANT_HEADER;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub assumptions: Arc<dyn AssumptionsStore>,
    pub sales: Arc<dyn SalesHistory>,
    pub engine: ProjectionEngine,
    pub baseline_window_months: u32,
}

impl AppState {
    /// State backed by a PostgreSQL repository. Migrations are applied first.
    pub async fn connect(settings: &Settings) -> anyhow::Result<Self> {
        let db_pool = database::connect(&settings.database).await?;
        database::run_migrations(&db_pool).await?;
        let repo = Arc::new(DbRepository::new(db_pool));
        Self::with_stores(settings, repo.clone(), repo)
    }

    /// State backed by an `InMemoryStore`; nothing survives a restart.
    pub fn in_memory(settings: &Settings) -> anyhow::Result<Self> {
        let store = Arc::new(InMemoryStore::new());
        Self::with_stores(settings, store.clone(), store)
    }

    pub fn with_stores(
        settings: &Settings,
        assumptions: Arc<dyn AssumptionsStore>,
        sales: Arc<dyn SalesHistory>,
    ) -> anyhow::Result<Self> {
        let engine = ProjectionEngine::new(settings.projection.clone())?;
        Ok(Self {
            assumptions,
            sales,
            engine,
            baseline_window_months: settings.baseline.window_months,
        })
    }
}

/// Builds the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/assumptions",
            get(handlers::get_assumptions).put(handlers::put_assumptions),
        )
        .route("/api/metrics", get(handlers::get_metrics))
        .route("/api/metrics/export", get(handlers::export_metrics))
        .with_state(Arc::new(state))
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 64))
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutdown signal received.");
        })
        .await?;

    Ok(())
}
