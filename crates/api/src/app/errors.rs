use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tokio::task::JoinError;
use tracing::{error, warn};

use retailpulse_ai::AiError;
use retailpulse_infra::LoadError;

use crate::app::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Load(e) => load_error_to_response(e),
        ServiceError::Inference(e) => ai_error_to_response(e),
    }
}

pub fn load_error_to_response(err: LoadError) -> axum::response::Response {
    warn!("data load failed: {err}");
    match err {
        LoadError::MissingData(e) => json_error(StatusCode::SERVICE_UNAVAILABLE, "missing_data", e.to_string()),
        LoadError::Io { .. } => json_error(StatusCode::INTERNAL_SERVER_ERROR, "io_error", err.to_string()),
        other => json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_data", other.to_string()),
    }
}

pub fn ai_error_to_response(err: AiError) -> axum::response::Response {
    warn!("inference failed: {err}");
    match err {
        AiError::InvalidInput(msg) => json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_input", msg),
        AiError::InferenceFailed(msg) => json_error(StatusCode::UNPROCESSABLE_ENTITY, "inference_failed", msg),
    }
}

pub fn join_error_to_response(err: JoinError) -> axum::response::Response {
    error!("blocking task failed: {err}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", "request processing failed")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
