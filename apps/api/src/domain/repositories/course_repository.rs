use async_trait::async_trait;
use thiserror::Error;

use crate::domain::course::{Course, NewCourse};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::validation::ValidationErrors;

/// Failure returned by course persistence
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Input broke a validation or uniqueness rule; nothing was written
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository trait for the Course aggregate
///
/// Defines the contract for persisting courses with their tutors.
/// Implementations must treat a course and its tutors as one unit.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Validate and insert a course with its nested tutors atomically
    async fn create(&self, course: NewCourse) -> Result<Course, RepositoryError>;

    /// Fetch one page of courses in creation order, tutors included
    async fn list(&self, page: PageRequest) -> Result<Page<Course>, RepositoryError>;
}
