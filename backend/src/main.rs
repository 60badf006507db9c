//! Entry point: loads settings, selects the storage backend and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{eyre, Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use user_registry::inbound::http::health::HealthState;
use user_registry::settings::AppSettings;

use server::{build_http_state, create_server, select_backend, ServerConfig, UserBackend};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // A missing .env is normal outside development.
    let dotenv = dotenvy::dotenv();

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?
        .with_legacy_env(|key| std::env::var(key).ok())
        .wrap_err("failed to read deployment environment keys")?;
    let backend = select_backend(&settings).wrap_err("failed to prepare storage backend")?;
    let http_state = build_http_state(UserBackend::new(backend, settings.permissions()));

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(settings.bind_target(), http_state);
    let server = create_server(health_state, config).wrap_err("failed to start HTTP server")?;
    server.await.wrap_err("HTTP server exited with an error")
}
