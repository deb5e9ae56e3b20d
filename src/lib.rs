pub mod config;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;

pub use config::{Config, ConfigError};
pub use observability::{init_observability, Metrics};

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use handlers::{create_api_router, health_check, metrics_handler};
use observability::observability_middleware;
use services::CartStore;

/// Build the full application router: cart API, health, metrics and request middleware
pub fn create_app(cart_store: Arc<CartStore>, metrics: Arc<Metrics>) -> Router {
    let metrics_for_middleware = metrics.clone();

    Router::new()
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        .merge(create_api_router(cart_store))
        // Add middleware layers (order matters - outer to inner)
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
