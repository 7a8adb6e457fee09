//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerSettings;
pub use state_builders::StoreBackend;
use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use chrono::Utc;
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use greencare::Trace;
#[cfg(debug_assertions)]
use greencare::doc::ApiDoc;
use greencare::domain::{UserId, UserProfile};
use greencare::inbound::http::configure_api;
use greencare::inbound::http::error::json_error_handler;
use greencare::inbound::http::health::{HealthState, live, ready};
use greencare::inbound::http::state::HttpState;
use greencare::outbound::memory::MemoryStore;
use greencare::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(web::scope("/api").configure(configure_api))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("greencare")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("Prometheus metrics: {e}")))
}

/// Resolve the store backend, running migrations first when asked to.
///
/// # Errors
/// Returns [`std::io::Error`] when the pool cannot be built or migrations fail.
pub async fn connect_store(settings: &ServerSettings) -> std::io::Result<StoreBackend> {
    let Some(url) = settings.database_url() else {
        warn!("no database URL configured; using the in-memory store (data is not persisted)");
        let store = Arc::new(MemoryStore::new());
        if let Some(token) = settings.dev_token() {
            let user = UserId::random();
            store.seed_user(UserProfile::new(
                user,
                "Demo gardener",
                "demo@greencare.local",
                Utc::now(),
            ));
            store.issue_token(user, token);
            info!(user_id = %user, "seeded demo user for the configured dev token");
        }
        return Ok(StoreBackend::Memory(store));
    };

    if settings.run_migrations() {
        let applied = run_pending_migrations(url)
            .await
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
        info!(applied, "database schema is current");
    }

    let pool = DbPool::new(
        PoolConfig::new(url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;
    Ok(StoreBackend::Postgres(pool))
}

/// Construct the HTTP server and mark the health state ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    settings: &ServerSettings,
    backend: &StoreBackend,
) -> std::io::Result<Server> {
    let http_state = build_http_state(backend);
    let server_health_state = health_state.clone();

    #[cfg(feature = "metrics")]
    let metrics = make_metrics()?;

    let bind_addr = settings.bind_addr();
    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics.clone());

        app
    })
    .bind(bind_addr.clone())?
    .run();

    info!(host = %bind_addr.0, port = bind_addr.1, "listening");
    health_state.mark_ready();
    Ok(server)
}
