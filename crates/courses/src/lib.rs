//! Courses domain module.
//!
//! This crate contains the business rules for the course catalog, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage): the
//! lifecycle state machine and the publish-eligibility checks.

pub mod course;

pub use course::{Course, CourseStatus, CourseUpdate, NewCourse};
