use std::sync::Arc;

use axum::{Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::get};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/optimization", get(get_price_optimization))
}

pub async fn get_price_optimization(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let insight = match tokio::task::spawn_blocking(move || services.price_optimization()).await {
        Ok(Ok(i)) => i,
        Ok(Err(e)) => return errors::service_error_to_response(e),
        Err(e) => return errors::join_error_to_response(e),
    };

    (StatusCode::OK, Json(dto::pricing(&insight))).into_response()
}
