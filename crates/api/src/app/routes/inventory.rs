use std::sync::Arc;

use axum::{Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::get};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/redistribution", get(get_redistribution_plan))
}

pub async fn get_redistribution_plan(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let plan = match tokio::task::spawn_blocking(move || services.redistribution_plan()).await {
        Ok(Ok(p)) => p,
        Ok(Err(e)) => return errors::service_error_to_response(e),
        Err(e) => return errors::join_error_to_response(e),
    };

    (StatusCode::OK, Json(dto::redistribution(&plan))).into_response()
}
