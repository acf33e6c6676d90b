// Course domain module
// Contains the course aggregate and its nested tutors

#![allow(clippy::module_inception)]

pub mod course;
pub mod tutor;

// Re-export main types for convenience
pub use course::{Course, NewCourse, TakenValues};
pub use tutor::{NewTutor, Tutor};
