//! GreenCare server entry point.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use greencare::inbound::http::health::HealthState;
use server::{ServerSettings, connect_store, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("configuration: {e}")))?;
    let backend = connect_store(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), &settings, &backend)?;
    let handle = server.handle();

    let drain_state = health_state.clone();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            drain_state.mark_unhealthy();
            handle.stop(true).await;
        }
    });

    server.await
}
