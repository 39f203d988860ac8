use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/sample", get(get_demand_sample))
}

pub async fn get_demand_sample(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::DemandSampleQuery>,
) -> axum::response::Response {
    let rows = query.rows.unwrap_or(services.config().demand_sample_rows);
    let data = match tokio::task::spawn_blocking(move || services.data()).await {
        Ok(Ok(d)) => d,
        Ok(Err(e)) => return errors::load_error_to_response(e),
        Err(e) => return errors::join_error_to_response(e),
    };

    (StatusCode::OK, Json(dto::demand_sample(&data.demand, rows))).into_response()
}
