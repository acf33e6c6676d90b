//! Courses API Library
//!
//! JSON:API service for courses and their tutors: domain validation,
//! PostgreSQL persistence, and the axum HTTP layer.

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
