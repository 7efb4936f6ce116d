use axum::Router;

pub mod courses;
pub mod system;

/// Router for all API endpoints.
pub fn router() -> Router {
    Router::new().nest("/courses", courses::router())
}
