//! # skl-api — Axum API for the Skladno Compliance Stack
//!
//! HTTP surface over the record registers and the alert aggregator.
//! Records live in the in-process store (hydrated from PostgreSQL when
//! configured); the alert feed is computed fresh on every read.
//!
//! ## API Surface
//!
//! | Prefix                     | Module                  | Domain                 |
//! |----------------------------|-------------------------|------------------------|
//! | `/v1/alerts*`              | [`routes::alerts`]      | Aggregated alert feed  |
//! | `/v1/incidents*`           | [`routes::incidents`]   | Security incidents     |
//! | `/v1/reports*`             | [`routes::reports`]     | Whistleblower reports  |
//! | `/v1/erasure-requests*`    | [`routes::erasures`]    | Erasure requests       |
//! | `/v1/licenses*`            | [`routes::licenses`]    | Software licenses      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Auto-generated OpenAPI spec via utoipa derive macros at `/openapi.json`.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and the Prometheus scrape endpoint are
/// mounted outside the auth middleware so they remain accessible
/// without credentials. `/metrics` is only mounted when enabled in the
/// configuration.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics_enabled = state.config.metrics_enabled;

    // Authenticated API routes.
    let api = Router::new()
        .merge(routes::alerts::router())
        .merge(routes::incidents::router())
        .merge(routes::reports::router())
        .merge(routes::erasures::router())
        .merge(routes::licenses::router())
        .merge(openapi::router())
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state);

    // Unauthenticated health probes.
    let mut public = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));
    if metrics_enabled {
        public = public.route("/metrics", axum::routing::get(metrics::render_metrics));
    }

    Router::new().merge(public).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
