use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use coursehub_courses::CourseStatus;
use coursehub_infra::LifecycleError;

pub fn lifecycle_error_to_response(err: LifecycleError) -> axum::response::Response {
    match err {
        LifecycleError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        LifecycleError::InvalidState(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_state", msg)
        }
        LifecycleError::NotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "course not found")
        }
        LifecycleError::Concurrency(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        LifecycleError::Store(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            format!("{e}"),
        ),
    }
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

pub fn parse_course_status(s: &str) -> Result<CourseStatus, axum::response::Response> {
    s.parse().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "status must be one of: DRAFT, PUBLISHED, ARCHIVED",
        )
    })
}
