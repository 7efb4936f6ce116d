use std::collections::BTreeMap;
use std::sync::RwLock;

use coursehub_core::{CourseId, Entity, ExpectedVersion};
use coursehub_courses::{Course, NewCourse};

use super::r#trait::{CourseStore, StoreError};

/// In-memory course store.
///
/// The reference implementation: tests/dev. Ids are handed out ascending, so
/// `BTreeMap` iteration order equals insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCourseStore {
    records: RwLock<BTreeMap<CourseId, Course>>,
}

impl InMemoryCourseStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(records: &BTreeMap<CourseId, Course>) -> CourseId {
        let last = records.keys().next_back().map(|id| id.as_u64()).unwrap_or(0);
        CourseId::new(last + 1)
    }
}

impl CourseStore for InMemoryCourseStore {
    fn insert(&self, new: NewCourse) -> Result<Course, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let id = Self::next_id(&records);
        let course = Course::insert_draft(id, new);
        records.insert(id, course.clone());
        Ok(course)
    }

    fn get(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(records.get(&id).cloned())
    }

    fn save(&self, course: &Course, expected: ExpectedVersion) -> Result<Course, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let id = course.id_typed();
        let current = records.get(&id).ok_or(StoreError::Missing(id))?;

        if !expected.matches(current.version()) {
            return Err(StoreError::Concurrency(format!(
                "expected {expected:?}, found {}",
                current.version()
            )));
        }

        let stored = course.clone().with_version(current.version() + 1);
        records.insert(id, stored.clone());
        Ok(stored)
    }

    fn list(&self) -> Result<Vec<Course>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(records.values().cloned().collect())
    }
}
