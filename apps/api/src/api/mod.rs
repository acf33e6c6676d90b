// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod jsonapi;
pub mod state;

pub use state::AppState;
