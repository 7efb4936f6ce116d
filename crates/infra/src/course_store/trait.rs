use thiserror::Error;

use coursehub_core::{CourseId, ExpectedVersion};
use coursehub_courses::{Course, NewCourse};

/// Persistence failure surfaced by a course store.
///
/// Stores report infrastructure outcomes only; lifecycle rules are enforced
/// a layer up.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Optimistic concurrency failure (stale record version on save).
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    /// Save against an id that has no record.
    #[error("no course record with id {0}")]
    Missing(CourseId),

    /// The store could not complete the call (unreachable backend, poisoned
    /// lock). Propagated unchanged; callers decide whether to retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Minimal persistence contract the lifecycle service depends on.
///
/// Calls are individually atomic. Read-check-write correctness across calls
/// is the caller's job: `save` carries the version the caller loaded, and a
/// store rejects the write when the record has moved on.
pub trait CourseStore: Send + Sync {
    /// Persist a new draft, assigning the next id. Returns the stored entity.
    fn insert(&self, new: NewCourse) -> Result<Course, StoreError>;

    /// Fetch a course by id.
    fn get(&self, id: CourseId) -> Result<Option<Course>, StoreError>;

    /// Replace a course record iff the stored version matches `expected`.
    ///
    /// Returns the record with its bumped version.
    fn save(&self, course: &Course, expected: ExpectedVersion) -> Result<Course, StoreError>;

    /// All courses in insertion order.
    fn list(&self) -> Result<Vec<Course>, StoreError>;
}
