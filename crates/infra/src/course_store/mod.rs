//! Course record store boundary.
//!
//! This module defines an infrastructure-facing abstraction for persisting
//! course records without making any storage assumptions. Identity assignment
//! lives behind this boundary; business rules never do.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryCourseStore;
pub use r#trait::{CourseStore, StoreError};
