//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: data store, memo caches and the derived views
//! - `routes/`: HTTP routes + handlers (one file per dashboard section)
//! - `dto.rs`: response DTOs and presentation mapping (alerts, rounding)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use retailpulse_infra::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: AppConfig) -> Router {
    let services = Arc::new(services::AppServices::new(config));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
