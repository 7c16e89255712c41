use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query, rejection::{JsonRejection, QueryRejection}},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use partmatch_inventory::MatchTarget;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/summary", get(get_summary))
        .route("/search", get(search_items))
        .route("/related", post(find_related))
}

pub async fn get_summary(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.catalog().stock_summary().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn search_items(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::SearchQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let code = query.code.unwrap_or_default();

    match services.catalog().search(&code).await {
        Ok(items) => (StatusCode::OK, Json(dto::SearchResponse::new(code.trim(), items))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn find_related(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<MatchTarget>, JsonRejection>,
) -> axum::response::Response {
    let Json(target) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.catalog().find_related(&target).await {
        Ok(related) => (StatusCode::OK, Json(dto::RelatedPartsResponse::from(related))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
