use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use coursehub_core::CourseId;
use coursehub_courses::NewCourse;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_course).get(list_courses))
        .route("/:id", get(find_course).put(update_course))
        .route("/:id/publish", post(publish_course))
        .route("/:id/archive", post(archive_course))
}

#[derive(Debug, Deserialize)]
pub struct ListCoursesQuery {
    pub status: Option<String>,
}

fn parse_course_id(raw: &str) -> Result<CourseId, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid course id")
    })
}

pub async fn create_course(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCourseRequest>,
) -> axum::response::Response {
    let new = match NewCourse::new(
        body.title.unwrap_or_default(),
        body.description,
        body.duration,
    ) {
        Ok(v) => v,
        Err(e) => return errors::lifecycle_error_to_response(e.into()),
    };

    match services.courses.create(new) {
        Ok(course) => {
            (StatusCode::CREATED, Json(dto::course_to_json(&course))).into_response()
        }
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn list_courses(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListCoursesQuery>,
) -> axum::response::Response {
    let status = match query.status.as_deref() {
        Some(raw) => match errors::parse_course_status(raw) {
            Ok(s) => Some(s),
            Err(resp) => return resp,
        },
        None => None,
    };

    match services.courses.find_all(status) {
        Ok(courses) => {
            let items = courses.iter().map(dto::course_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn find_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_course_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.courses.find_by_id(id) {
        Ok(course) => (StatusCode::OK, Json(dto::course_to_json(&course))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn update_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateCourseRequest>,
) -> axum::response::Response {
    let id = match parse_course_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.courses.update(id, body.into()) {
        Ok(course) => (StatusCode::OK, Json(dto::course_to_json(&course))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn publish_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_course_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.courses.publish(id) {
        Ok(course) => (StatusCode::OK, Json(dto::course_to_json(&course))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}

pub async fn archive_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_course_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.courses.archive(id) {
        Ok(course) => (StatusCode::OK, Json(dto::course_to_json(&course))).into_response(),
        Err(e) => errors::lifecycle_error_to_response(e),
    }
}
