// HTTP handlers (driving adapters)

pub mod courses;
pub mod health;
