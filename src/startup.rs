//! Server startup and wiring.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use freight_admin_core::JwtValidator;
use freight_admin_db::{DbConfig, MemoryStore, PgRecordStore, RecordStore, create_pool};
use http::{HeaderName, Request};
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};

use crate::config::Config;
use crate::export::ExporterRegistry;
use crate::middleware::{AuthLayer, MetricsLayer, RequestIdLayer};
use crate::panel::Panel;
use crate::routes::rest_routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub panel: Arc<Panel>,
    pub exporters: Arc<ExporterRegistry>,
    /// Row cap for a single export.
    pub export_max_rows: usize,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, panel: Panel, export_max_rows: usize) -> Self {
        Self {
            store,
            panel: Arc::new(panel),
            exporters: Arc::new(ExporterRegistry::new()),
            export_max_rows,
        }
    }
}

/// Build and configure the complete application.
///
/// `extra_routes` are merged under the same middleware stack (e.g. `/metrics`).
pub async fn build_app(config: &Config, extra_routes: Router) -> anyhow::Result<(Router, SocketAddr)> {
    let store = init_store(config).await?;
    let panel = Panel::new(&config.admin_prefix);
    info!(
        prefix = panel.prefix(),
        resources = panel.resources().count(),
        "Admin panel registered"
    );

    let addr: SocketAddr = config.http_address.parse()?;
    let state = AppState::new(store, panel, config.export_max_rows);

    Ok((app_router(config, state, extra_routes), addr))
}

/// Routes plus the middleware stack.
pub fn app_router(config: &Config, state: AppState, extra_routes: Router) -> Router {
    let jwt_validator = JwtValidator::new(&config.jwt_secret_key);
    let cors = build_cors(config.cors_allow_origins.as_deref());

    // Executes top-to-bottom on request
    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_response(tower_http::trace::DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(RequestIdLayer::new())
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(GlobalConcurrencyLimitLayer::new(config.concurrency_limit))
        .layer(cors)
        .layer(AuthLayer::new(jwt_validator));

    rest_routes(state)
        .merge(extra_routes)
        .layer(MetricsLayer::new())
        .layer(middleware)
}

/// PostgreSQL when a database URL is configured, otherwise in-memory records.
async fn init_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    let Some(url) = config.database_url() else {
        warn!("DB_URL not set, records are kept in memory");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let db_config = DbConfig {
        url,
        pool_min: config.db_pool_min,
        pool_max: config.db_pool_max,
        connect_timeout: config.db_connect_timeout(),
        migrate: true,
    };
    let pool = create_pool(&db_config).await?;
    info!("Connected to database");
    Ok(Arc::new(PgRecordStore::new(pool)))
}

fn build_cors(origins: Option<&str>) -> CorsLayer {
    let cors = match origins {
        Some(o) if o.trim() == "*" => CorsLayer::permissive(),
        Some(o) => {
            let origins: Vec<_> = o.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            CorsLayer::new().allow_origin(origins)
        }
        None => CorsLayer::permissive(),
    };

    cors.allow_headers(Any)
        .expose_headers([
            HeaderName::from_static("x-request-id"),
            http::header::CONTENT_DISPOSITION,
        ])
        .allow_methods(Any)
        .max_age(Duration::from_secs(3600))
}
