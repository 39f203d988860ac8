use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::dto;
use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn sections() -> impl IntoResponse {
    Json(serde_json::json!({ "sections": dto::SECTIONS }))
}

pub async fn invalidate(Extension(services): Extension<Arc<AppServices>>) -> StatusCode {
    services.invalidate();
    StatusCode::NO_CONTENT
}
