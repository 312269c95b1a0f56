// Server module - Router assembly and the HTTP serve loop
// Used by main.rs and by the integration tests

use axum::{Router, http::HeaderValue, middleware, routing::get};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::api::error::{
    ExposeInternalErrors, envelope_method_not_allowed, handle_panic, mask_internal_errors,
    route_not_found,
};
use crate::api_docs;
use crate::config::Config;
use crate::infrastructure::AppState;

/// Build the full application router
pub fn build_router(state: AppState, config: &Config) -> Router {
    let api_router = api::api_router_with_state(state.clone());

    Router::new()
        .route("/health", get(api::health::health_check))
        .route("/api-docs/openapi.json", get(api_docs::openapi_json))
        .with_state(state)
        .nest("/api/v1", api_router)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(envelope_method_not_allowed))
        .layer(middleware::from_fn_with_state(
            ExposeInternalErrors(config.debug),
            mask_internal_errors,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins))
}

/// Any origin when none are configured, otherwise only the listed ones
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let mut allowed = Vec::new();
    for origin in origins {
        match origin.parse::<HeaderValue>() {
            Ok(v) => allowed.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }

    cors.allow_origin(allowed)
}

/// Bind the configured host, which may be a name such as `localhost`
pub async fn bind(config: &Config) -> std::io::Result<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.port)).await
}

/// Bind and serve until Ctrl-C
pub async fn serve(state: AppState, config: &Config) -> std::io::Result<()> {
    let app = build_router(state, config);
    let listener = bind(config).await?;

    tracing::info!("{} listening on {}", config.app_name, listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
