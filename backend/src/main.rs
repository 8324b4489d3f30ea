//! Backend entry-point: loads settings, validates session configuration and
//! runs the HTTP server.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use shelfmates::inbound::http::health::HealthState;
use shelfmates::inbound::http::session_config::{BuildMode, session_settings};

use server::{AppSettings, ServerConfig, create_server};

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

    let settings = AppSettings::load_from_iter(std::env::args_os()).map_err(|err| {
        error!(error = %err, "failed to load configuration");
        std::io::Error::other(err.to_string())
    })?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| std::io::Error::other(format!("invalid bind address: {err}")))?;
    let session = session_settings(
        &settings.session_toggles(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(|err| {
        error!(error = %err, "invalid session configuration");
        std::io::Error::other(err)
    })?;

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_data_dir(settings.data_dir.clone());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
