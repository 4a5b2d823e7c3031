//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;
use std::time::Duration;

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

#[cfg(debug_assertions)]
use carousel_backend::doc::ApiDoc;
use carousel_backend::domain::ports::{SessionRepository, UserRepository};
use carousel_backend::domain::{AccountService, CarouselService};
use carousel_backend::inbound::http::configure_api;
use carousel_backend::inbound::http::health::{HealthState, live, ready};
use carousel_backend::inbound::http::state::HttpState;
use carousel_backend::middleware::Trace;
use carousel_backend::outbound::bcrypt_hasher::BcryptPasswordHasher;
use carousel_backend::outbound::memory::{InMemorySessionRepository, InMemoryUserRepository};
use carousel_backend::outbound::persistence::{DieselSessionRepository, DieselUserRepository};
use carousel_backend::outbound::session_store::PortSessionStore;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// How often expired sessions are swept from the store.
const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(10 * 60);

/// Storage adapters shared by every worker.
struct Stores {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
}

fn build_stores(config: &ServerConfig) -> Stores {
    match &config.db_pool {
        Some(pool) => Stores {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            sessions: Arc::new(DieselSessionRepository::new(pool.clone())),
        },
        None => {
            info!("no database pool configured; users and sessions live in memory");
            Stores {
                users: Arc::new(InMemoryUserRepository::new()),
                sessions: Arc::new(InMemorySessionRepository::new()),
            }
        }
    }
}

fn build_http_state(
    users: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
    clock: Arc<dyn Clock>,
) -> std::io::Result<HttpState> {
    let hasher = BcryptPasswordHasher::new(bcrypt_cost).map_err(std::io::Error::other)?;
    let accounts = Arc::new(AccountService::new(Arc::clone(&users), Arc::new(hasher)));
    let carousels = Arc::new(CarouselService::new(users, clock));
    Ok(HttpState::new(
        accounts.clone(),
        accounts,
        carousels.clone(),
        carousels,
    ))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session_store: PortSessionStore,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    session_ttl: Duration,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session_store,
        key,
        cookie_secure,
        same_site,
        session_ttl,
    } = deps;

    let ttl_secs = i64::try_from(session_ttl.as_secs()).unwrap_or(i64::MAX);
    let session = SessionMiddleware::builder(session_store, key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::seconds(ttl_secs)),
        )
        .build();

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(configure_api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct the HTTP server.
///
/// # Errors
/// Propagates [`std::io::Error`] when the adapters cannot be built or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let Stores { users, sessions } = build_stores(&config);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let http_state = web::Data::new(build_http_state(
        users,
        config.bcrypt_cost,
        Arc::clone(&clock),
    )?);
    let session_store = PortSessionStore::new(sessions, clock);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        session_ttl,
        bcrypt_cost: _,
        db_pool: _,
    } = config;

    actix_web::rt::spawn(session_store.clone().run_expiry_sweeper(SESSION_SWEEP_PERIOD));

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session_store: session_store.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            session_ttl,
        })
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    actix_web::rt::spawn(drain_on_interrupt(health_state.clone(), server.handle()));
    info!(%bind_addr, "server listening");
    health_state.mark_ready();
    Ok(server)
}

/// Wait for Ctrl-C, fail both health checks, then stop gracefully so in-flight
/// requests finish.
async fn drain_on_interrupt(health_state: web::Data<HealthState>, handle: ServerHandle) {
    if let Err(err) = actix_web::rt::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for shutdown signal");
        return;
    }
    info!("shutdown requested, draining");
    health_state.begin_drain();
    handle.stop(true).await;
}
