//! Server construction, route wiring, and startup.

mod config;
mod state_builders;

pub use config::{ConfigError, ServerConfig};
use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::{App, HttpServer, Scope, web};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use mockable::DefaultClock;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::IdentityProvider;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::{accounts, meetups, reviews, users};
use crate::middleware::trace::Trace;
use crate::outbound::identity::JwtIdentityProvider;
use crate::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

/// All REST routes under the `/api/v1` scope.
///
/// Shared between the server bootstrap and integration tests so both run
/// the same routing table.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .service(accounts::register_account)
        .service(accounts::login)
        .service(users::current_user)
        .service(users::my_meetups)
        .service(users::my_past_meetups)
        .service(meetups::list_meetups)
        .service(meetups::create_meetup)
        .service(meetups::get_meetup)
        .service(meetups::register_attendance)
        .service(meetups::unregister_attendance)
        .service(reviews::list_reviews)
        .service(reviews::submit_review)
}

/// Run the HTTP server until shutdown.
///
/// Applies pending migrations, builds the connection pool and state, binds,
/// and only then reports readiness.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    info!(
        fingerprint = %config.secret_fingerprint(),
        "token signing secret loaded"
    );

    let identity: Arc<dyn IdentityProvider> = Arc::new(JwtIdentityProvider::new(
        config.token_secret(),
        Arc::new(DefaultClock),
    ));

    let Some(database_url) = config.database_url.clone() else {
        return Err(std::io::Error::other(
            "DATABASE_URL must be set to start the server",
        ));
    };

    run_pending_migrations(&database_url).map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(std::io::Error::other)?;

    let http_state = web::Data::new(build_http_state(pool, identity));
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays accessible.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        #[cfg_attr(not(debug_assertions), expect(unused_mut, reason = "Swagger is debug-only"))]
        let mut app = App::new()
            .app_data(http_state.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .service(api_scope())
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app
                .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        }

        #[cfg(feature = "metrics")]
        let app = app.wrap(make_metrics());

        app
    })
    .bind(config.bind_addr())?;

    health_state.mark_ready();
    server.run().await
}

#[cfg(feature = "metrics")]
fn make_metrics() -> actix_web_prom::PrometheusMetrics {
    PrometheusMetricsBuilder::new("meetups")
        .endpoint("/metrics")
        .build()
        .expect("configure Prometheus metrics")
}
