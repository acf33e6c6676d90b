// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod postgres_course_repository;

pub use postgres_course_repository::PostgresCourseRepository;
