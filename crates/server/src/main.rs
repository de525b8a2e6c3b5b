//! RetailRadar API server.
//!
//! This binary serves the campus marketplace REST API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework serving JSON endpoints under `/api`
//! - `PostgreSQL` via sqlx for users, stores, products, and orders
//! - Stateless auth: a signed bearer token carried in the `auth-token`
//!   cookie or an `Authorization: Bearer` header
//!
//! # Surface
//!
//! - `/api/auth` - registration, login, logout
//! - `/api/stores` - public store browsing plus owner-side CRUD
//! - `/api/products` - public catalog plus owner-side CRUD
//! - `/api/orders` - order placement, history, and status updates
//!
//! See the [`routes`] module for the full route tree.

#![cfg_attr(not(test), forbid(unsafe_code))]
// The binary compiles the same modules as the library target; a few pub
// items (e.g. the password hasher used by the CLI seeder) are only
// reachable from there.
#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use sentry::integrations::tracing as sentry_tracing;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod policy;
mod routes;
mod services;
mod state;

use config::ServerConfig;
use state::AppState;

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().expect("Failed to load configuration");
    let _telemetry = init_telemetry(&config);

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // Migrations are NOT applied here; run them explicitly first:
    //   cargo run -p retail-radar-cli -- migrate

    let addr = config.socket_addr();
    let state = AppState::new(config, pool);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!("server listening on {addr}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Assemble the router with the full middleware stack.
fn app(state: AppState) -> Router {
    // The API is consumed by browser frontends on other origins; auth
    // works cross-origin via the Authorization header (the cookie is
    // same-site only).
    let cors = CorsLayer::permissive();

    let trace = TraceLayer::new_for_http()
        .make_span_with(request_span)
        .on_response(finish_request_span);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(trace)
        .with_state(state)
        // Sentry layers sit outermost so they see every request
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Span opened per request; `request_id`, `status`, and `latency_ms` are
/// filled in by the middleware and [`finish_request_span`].
fn request_span(request: &axum::http::Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    )
}

fn finish_request_span(response: &axum::http::Response<Body>, latency: Duration, span: &Span) {
    span.record("status", response.status().as_u16());
    span.record("latency_ms", latency.as_millis() as u64);
    DefaultOnResponse::default().on_response(response, latency, span);
}

/// Set up Sentry and the tracing subscriber.
///
/// The returned guard flushes pending Sentry events on drop, so it must
/// stay alive for the lifetime of the process.
fn init_telemetry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: config
                    .sentry_environment
                    .clone()
                    .map(std::borrow::Cow::Owned),
                sample_rate: config.sentry_sample_rate,
                traces_sample_rate: config.sentry_traces_sample_rate,
                attach_stacktrace: true,
                ..Default::default()
            },
        ))
    });

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "retail_radar_server=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter));

    // Fly.io parses JSON logs; keep plain text for local runs
    if std::env::var_os("FLY_APP_NAME").is_some() {
        registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    if guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    guard
}

/// Route tracing events to Sentry: warnings and errors become events,
/// info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    use tracing::Level;

    match *metadata.level() {
        Level::ERROR | Level::WARN => sentry_tracing::EventFilter::Event,
        Level::INFO | Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

/// Liveness check. Says nothing about dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness check; 503 until the database answers.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let probe = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.pool())
        .await;

    if probe.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Resolve when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
