//! Course lifecycle orchestration (application-level).
//!
//! The lifecycle service is the sole authority for state transitions and
//! field validation; stores never enforce business rules. Every mutation runs
//! read-check-write against the store under optimistic concurrency: load the
//! record, run the transition on a copy, save with the loaded version, and
//! retry when a concurrent writer made the version stale. A precondition
//! validated on a stale read (e.g. "not archived") therefore can never land.
//!
//! The service is stateless between calls; all durable state lives in the
//! store. Cross-id operations are independent. Infrastructure failures
//! (`StoreError::Unavailable`) are propagated unchanged and never retried
//! here; that policy belongs to the caller.

use chrono::Utc;

use coursehub_core::{CourseId, DomainError, DomainResult, Entity, ExpectedVersion};
use coursehub_courses::{Course, CourseStatus, CourseUpdate, NewCourse};

use crate::course_store::{CourseStore, StoreError};

/// Bounded retries for stale-version saves. Conflicts on a single course id
/// are short-lived; anything persistent is surfaced to the caller.
const MAX_CONFLICT_RETRIES: usize = 3;

/// Failure of a lifecycle operation.
#[derive(Debug)]
pub enum LifecycleError {
    /// Input fails a business rule; recoverable by correcting the input.
    Validation(String),
    /// Operation not permitted in the course's current lifecycle state.
    InvalidState(String),
    /// Referenced course id does not exist.
    NotFound,
    /// Optimistic concurrency conflict that survived retrying.
    Concurrency(String),
    /// Underlying persistence failure, propagated unchanged.
    Store(StoreError),
}

impl From<DomainError> for LifecycleError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => LifecycleError::Validation(msg),
            DomainError::InvalidState(msg) => LifecycleError::InvalidState(msg),
            DomainError::NotFound => LifecycleError::NotFound,
            DomainError::Conflict(msg) => LifecycleError::Concurrency(msg),
            DomainError::InvalidId(msg) => LifecycleError::Validation(msg),
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Concurrency(msg) => LifecycleError::Concurrency(msg),
            // A record that vanished between load and save; no deletion path
            // exists, so surface it the same way as a missing id.
            StoreError::Missing(_) => LifecycleError::NotFound,
            other => LifecycleError::Store(other),
        }
    }
}

/// Course lifecycle service.
#[derive(Debug)]
pub struct CourseLifecycleService<S> {
    store: S,
}

impl<S> CourseLifecycleService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: CourseStore> CourseLifecycleService<S> {
    /// Persist a new draft. Creation-time validation is carried by
    /// `NewCourse` itself, so the store only ever sees valid drafts.
    pub fn create(&self, new: NewCourse) -> Result<Course, LifecycleError> {
        let course = self.store.insert(new)?;
        tracing::info!(course_id = %course.id_typed(), "course created");
        Ok(course)
    }

    /// Partial update of the editable fields. Absent fields are untouched.
    ///
    /// Publish eligibility is not re-checked here: a draft may be updated
    /// into an ineligible state without error.
    pub fn update(&self, id: CourseId, update: CourseUpdate) -> Result<Course, LifecycleError> {
        self.mutate(id, |course| course.apply_update(update.clone()))
    }

    /// Transition to `Published`, stamping the publication time.
    ///
    /// Eligibility is evaluated fresh against the loaded record; publishing
    /// an already published course succeeds and refreshes `published_at`.
    pub fn publish(&self, id: CourseId) -> Result<Course, LifecycleError> {
        let course = self.mutate(id, |course| course.publish(Utc::now()))?;
        tracing::info!(course_id = %id, "course published");
        Ok(course)
    }

    /// Transition to `Archived`. Unconditional and idempotent.
    pub fn archive(&self, id: CourseId) -> Result<Course, LifecycleError> {
        let course = self.mutate(id, |course| course.archive())?;
        tracing::info!(course_id = %id, "course archived");
        Ok(course)
    }

    pub fn find_by_id(&self, id: CourseId) -> Result<Course, LifecycleError> {
        self.store.get(id)?.ok_or(LifecycleError::NotFound)
    }

    /// All courses in insertion order, optionally narrowed to one status.
    pub fn find_all(&self, status: Option<CourseStatus>) -> Result<Vec<Course>, LifecycleError> {
        let courses = self.store.list()?;
        Ok(match status {
            Some(wanted) => courses
                .into_iter()
                .filter(|course| course.status() == wanted)
                .collect(),
            None => courses,
        })
    }

    /// Read-check-write under optimistic concurrency.
    ///
    /// The transition runs on a copy of the loaded record and the save
    /// carries the loaded version, so a concurrent writer invalidates this
    /// attempt instead of being overwritten. Domain rejections are final;
    /// only stale-version saves are retried.
    fn mutate<F>(&self, id: CourseId, transition: F) -> Result<Course, LifecycleError>
    where
        F: Fn(&mut Course) -> DomainResult<()>,
    {
        let mut attempts = 0;
        loop {
            let mut course = self.store.get(id)?.ok_or(LifecycleError::NotFound)?;
            let loaded_version = course.version();
            transition(&mut course)?;

            match self.store.save(&course, ExpectedVersion::Exact(loaded_version)) {
                Ok(stored) => return Ok(stored),
                Err(StoreError::Concurrency(msg)) if attempts < MAX_CONFLICT_RETRIES => {
                    attempts += 1;
                    tracing::debug!(
                        course_id = %id,
                        attempt = attempts,
                        "stale version on save, retrying: {msg}"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
