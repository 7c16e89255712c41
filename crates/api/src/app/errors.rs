use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use partmatch_core::DomainError;
use partmatch_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    let status = match &err {
        ServiceError::Domain(DomainError::MalformedInput(_)) => StatusCode::BAD_REQUEST,
        ServiceError::Domain(DomainError::NotFound(_)) => StatusCode::NOT_FOUND,
        ServiceError::Domain(DomainError::ClassificationUnresolved(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Fetch(_) => StatusCode::BAD_GATEWAY,
    };
    json_error(status, err.code(), err.to_string())
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "malformed_input", rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "malformed_input", rejection.body_text())
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
