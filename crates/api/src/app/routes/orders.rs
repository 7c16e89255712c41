use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/check", post(check_order))
}

pub async fn check_order(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::OrderCheckRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.catalog().check_order(&body.lines).await {
        Ok(check) => (StatusCode::OK, Json(check)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
