use std::sync::Arc;

use crate::domain::repositories::CourseRepository;

/// Shared router state
#[derive(Clone)]
pub struct AppState {
    pub courses: Arc<dyn CourseRepository>,
    /// Base for absolute links; derived from the `Host` header when unset
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(courses: impl CourseRepository + 'static, public_url: Option<String>) -> Self {
        Self {
            courses: Arc::new(courses),
            public_url,
        }
    }
}
