//! Backend entry point: loads settings, prepares storage and runs the
//! HTTP server.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use carousel_backend::inbound::http::health::HealthState;
use carousel_backend::inbound::http::session_config::{
    BuildMode, session_cookie_settings_from_env,
};
use carousel_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use carousel_backend::settings::ServerSettings;
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let cookie =
        session_cookie_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
            .map_err(io::Error::other)?;
    let mut config = ServerConfig::new(
        cookie.key,
        cookie.cookie_secure,
        cookie.same_site,
        settings.bind_addr().map_err(io::Error::other)?,
    )
    .with_session_ttl(settings.session_ttl().map_err(io::Error::other)?)
    .with_bcrypt_cost(settings.bcrypt_cost());

    match settings.database_url() {
        Some(url) => {
            run_pending_migrations(url).await.map_err(io::Error::other)?;
            info!("database migrations applied");
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("CAROUSEL_DATABASE_URL not set; data will not survive a restart"),
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
