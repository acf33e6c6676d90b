//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use chrono::Utc;
use courses_api::api::AppState;
use courses_api::app;
use courses_api::domain::course::{Course, NewCourse, TakenValues, Tutor};
use courses_api::domain::pagination::{Page, PageRequest};
use courses_api::domain::repositories::{CourseRepository, RepositoryError};
use serde_json::Value;

#[derive(Default)]
struct Store {
    courses: Vec<Course>,
    next_course_id: i64,
    next_tutor_id: i64,
}

/// CourseRepository kept in memory, applying the same rules as PostgreSQL
#[derive(Default)]
pub struct InMemoryCourseRepository {
    store: Mutex<Store>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn create(&self, course: NewCourse) -> Result<Course, RepositoryError> {
        let mut store = self.store.lock().unwrap();

        let taken = TakenValues {
            title: course
                .present_title()
                .map_or(false, |t| store.courses.iter().any(|c| c.title == t)),
            emails: store
                .courses
                .iter()
                .flat_map(|c| c.tutors.iter().map(|t| t.email.clone()))
                .collect(),
        };
        course.validate(&taken).map_err(RepositoryError::Validation)?;

        store.next_course_id += 1;
        let course_id = store.next_course_id;
        let now = Utc::now();

        let mut tutors = Vec::new();
        for tutor in course.tutors {
            store.next_tutor_id += 1;
            tutors.push(Tutor {
                id: store.next_tutor_id,
                course_id,
                first_name: tutor.first_name.unwrap_or_default(),
                last_name: tutor.last_name,
                email: tutor.email.unwrap_or_default(),
                created_at: now,
                updated_at: now,
            });
        }

        let created = Course {
            id: course_id,
            title: course.title.unwrap_or_default(),
            description: course.description,
            created_at: now,
            updated_at: now,
            tutors,
        };
        store.courses.push(created.clone());

        Ok(created)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Course>, RepositoryError> {
        let store = self.store.lock().unwrap();
        let items = store
            .courses
            .iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(Page::new(items, page, store.courses.len() as u64))
    }
}

/// Router backed by a fresh in-memory repository
pub fn setup_app() -> Router {
    app::router(AppState::new(InMemoryCourseRepository::new(), None))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("host", "www.example.com")
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", "www.example.com")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(payload).unwrap()))
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", "www.example.com")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
