//! Service wiring for the HTTP layer.

use coursehub_infra::{CourseLifecycleService, InMemoryCourseStore};

/// Shared application services handed to every handler.
#[derive(Debug)]
pub struct AppServices {
    pub courses: CourseLifecycleService<InMemoryCourseStore>,
}

/// Build the service graph.
///
/// The in-memory store is the reference persistence backend; swapping the
/// backend means constructing `CourseLifecycleService` over another
/// `CourseStore` here, nothing else changes.
pub fn build_services() -> AppServices {
    AppServices {
        courses: CourseLifecycleService::new(InMemoryCourseStore::new()),
    }
}
