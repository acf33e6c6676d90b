// Domain layer module exports
// Domain is independent of HTTP concerns

pub mod course;
pub mod pagination;
pub mod repositories;
pub mod validation;
