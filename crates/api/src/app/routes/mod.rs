use axum::{
    Router,
    routing::{get, post},
};

pub mod demand;
pub mod inventory;
pub mod pricing;
pub mod system;

/// Router for the dashboard sections and cache control.
pub fn router() -> Router {
    Router::new()
        .route("/sections", get(system::sections))
        .route("/cache/invalidate", post(system::invalidate))
        .nest("/demand", demand::router())
        .nest("/inventory", inventory::router())
        .nest("/pricing", pricing::router())
}
