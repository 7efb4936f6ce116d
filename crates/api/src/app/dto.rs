use serde::Deserialize;

use coursehub_courses::{Course, CourseUpdate};

// -------------------------
// Request DTOs
// -------------------------

/// Creation payload. `title`/`duration` are optional at the wire level so a
/// missing field reaches the validation gate instead of failing
/// deserialization; the gate is `NewCourse::new`.
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<u32>,
}

/// Partial update payload. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<u32>,
}

impl From<UpdateCourseRequest> for CourseUpdate {
    fn from(value: UpdateCourseRequest) -> Self {
        CourseUpdate {
            title: value.title,
            description: value.description,
            duration: value.duration,
        }
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn course_to_json(course: &Course) -> serde_json::Value {
    serde_json::json!({
        "id": course.id_typed().as_u64(),
        "title": course.title(),
        "description": course.description(),
        "duration": course.duration(),
        "status": course.status().as_str(),
        "publishedAt": course.published_at().map(|t| t.to_rfc3339()),
    })
}
