use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/refresh", post(refresh_catalog))
}

/// Invalidate the snapshot and crawl the upstream catalog now.
pub async fn refresh_catalog(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.catalog().refresh().await {
        Ok(snapshot) => (StatusCode::OK, Json(dto::RefreshResponse::from(snapshot.as_ref()))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
