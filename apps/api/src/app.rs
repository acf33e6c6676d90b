use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{courses, health};
use crate::api::AppState;

/// Builds the application router
///
/// Shared by the server binary and the HTTP integration tests.
pub fn router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = Router::new().route(
        "/courses",
        get(courses::list_courses).post(courses::create_course),
    );

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .nest("/api/v1", v1)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
