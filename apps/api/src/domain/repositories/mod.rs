// Repository interfaces (ports)
// Implemented by adapters in the infrastructure layer

pub mod course_repository;

pub use course_repository::{CourseRepository, RepositoryError};
