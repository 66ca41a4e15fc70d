//! Backend entry point: loads configuration, prepares storage and serves the
//! REST API until interrupted.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use todo_backend::inbound::http::health::HealthState;
use todo_backend::inbound::http::token_config::{BuildMode, token_settings_from_env};
use todo_backend::outbound::persistence::{DbPool, run_pending_migrations};

use server::{ServerConfig, ServerSettings, create_server};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let ownership = settings.ownership_policy().map_err(io::Error::other)?;
    let token = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;

    let mut config = ServerConfig::new(settings.bind_addr(), token.into_signer(), ownership);
    match settings.pool_config() {
        Some(pool_config) => {
            let url = pool_config.database_url().to_owned();
            let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
                .await
                .map_err(io::Error::other)?
                .map_err(io::Error::other)?;
            info!(applied = ?applied, "database migrations up to date");
            let pool = DbPool::new(pool_config).await.map_err(io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("TODO_DATABASE_URL not set; data is kept in memory and lost on restart"),
    }
    info!(%ownership, "ownership policy");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let handle = server.handle();
    let running = actix_web::rt::spawn(server);

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested; draining connections");
    health_state.mark_unhealthy();
    handle.stop(true).await;
    running.await.map_err(io::Error::other)?
}
