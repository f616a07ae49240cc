//! Backend entry-point: loads settings, connects the store, and serves the
//! registration endpoints.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hostwatch::inbound::http::health::HealthState;
use server::{AppSettings, ServerConfig, StoreBackend, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let store_settings = settings
        .store()
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let store = StoreBackend::connect(store_settings).await?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, store))?;

    info!(%bind_addr, "listening");
    server.await
}
