//! End-to-end API integration tests
//!
//! These tests drive the real router over HTTP requests:
//! - Course creation with nested tutors
//! - Validation failures and their JSON:API error documents
//! - Paginated JSON:API listing and its links
//!
//! Storage is the in-memory repository from `common`, so no database is needed.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, get, post_form, post_json, setup_app};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot

const COURSES: &str = "/api/v1/courses";

fn valid_payload() -> Value {
    json!({
        "course": {
            "title": "Ruby",
            "description": "Dev friendly language.",
            "tutors_attributes": [{
                "first_name": "Royce",
                "last_name": "Gottlieb",
                "email": "sydney.lueilwitz@example.com"
            }]
        }
    })
}

fn link(number: u64, size: u64) -> String {
    format!(
        "http://www.example.com/api/v1/courses?page%5Bnumber%5D={}&page%5Bsize%5D={}",
        number, size
    )
}

async fn list(app: &axum::Router, uri: &str) -> Value {
    let response = app.clone().oneshot(get(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn create(app: &axum::Router, payload: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(post_json(COURSES, &payload))
        .await
        .unwrap();
    let status = response.status();
    let body = body_bytes(response).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn seed_course(app: &axum::Router, title: &str, tutor_emails: &[&str]) -> Value {
    let tutors: Vec<Value> = tutor_emails
        .iter()
        .map(|email| json!({"first_name": "Tutor", "last_name": "Example", "email": email}))
        .collect();

    let (status, body) = create(
        app,
        json!({"course": {"title": title, "description": "About it", "tutors_attributes": tutors}}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], b"OK");
}

#[tokio::test]
async fn test_create_course_returns_created() {
    let app = setup_app();

    let (status, body) = create(&app, valid_payload()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "Ruby");
    assert_eq!(body["description"], "Dev friendly language.");
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_string());
}

#[tokio::test]
async fn test_create_course_persists_course_and_tutor() {
    let app = setup_app();

    let before = list(&app, COURSES).await;
    assert_eq!(before["data"].as_array().unwrap().len(), 0);
    assert_eq!(before["included"].as_array().unwrap().len(), 0);

    let (status, _) = create(&app, valid_payload()).await;
    assert_eq!(status, StatusCode::CREATED);

    let after = list(&app, COURSES).await;
    assert_eq!(after["data"].as_array().unwrap().len(), 1);
    assert_eq!(after["included"].as_array().unwrap().len(), 1);
    assert_eq!(
        after["included"][0]["attributes"]["email"],
        "sydney.lueilwitz@example.com"
    );
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let app = setup_app();

    let response = app
        .clone()
        .oneshot(post_json(COURSES, &json!({"course": {"title": ""}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.contains("application/json"));

    let body = body_json(response).await;
    assert_eq!(
        body["errors"][0]["source"]["pointer"],
        "/data/attributes/title"
    );
    assert_eq!(body["errors"][0]["detail"], "can't be blank");

    let listed = list(&app, COURSES).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_title_is_rejected() {
    let app = setup_app();
    seed_course(&app, "duplicate title", &[]).await;

    let (status, body) = create(&app, json!({"course": {"title": "duplicate title"}})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"][0]["source"]["pointer"],
        "/data/attributes/title"
    );
    assert_eq!(body["errors"][0]["detail"], "has already been taken");

    let listed = list(&app, COURSES).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_blank_tutor_fields_are_rejected() {
    let app = setup_app();

    let (status, body) = create(
        &app,
        json!({
            "course": {
                "title": "Ruby",
                "description": "Dev friendly language.",
                "tutors_attributes": [{"first_name": "", "last_name": "Gottlieb", "email": ""}]
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"],
        json!([
            {"source": {"pointer": "/data/attributes/tutors.first-name"}, "detail": "can't be blank"},
            {"source": {"pointer": "/data/attributes/tutors.email"}, "detail": "can't be blank"}
        ])
    );

    let listed = list(&app, COURSES).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
    assert!(listed["included"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_tutor_email_is_rejected() {
    let app = setup_app();
    seed_course(&app, "Elixir", &["taken@example.com"]).await;

    let (status, body) = create(
        &app,
        json!({
            "course": {
                "title": "Ruby",
                "tutors_attributes": [{"first_name": "Ada", "email": "taken@example.com"}]
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"],
        json!([
            {"source": {"pointer": "/data/attributes/tutors.email"}, "detail": "has already been taken"}
        ])
    );

    let listed = list(&app, COURSES).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_course_from_form_params() {
    let app = setup_app();

    let form = "course%5Btitle%5D=Ruby\
        &course%5Bdescription%5D=Dev+friendly+language.\
        &course%5Btutors_attributes%5D%5B%5D%5Bfirst_name%5D=Royce\
        &course%5Btutors_attributes%5D%5B%5D%5Blast_name%5D=Gottlieb\
        &course%5Btutors_attributes%5D%5B%5D%5Bemail%5D=sydney.lueilwitz%40example.com";

    let response = app.clone().oneshot(post_form(COURSES, form)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Ruby");
    assert_eq!(body["description"], "Dev friendly language.");

    let listed = list(&app, COURSES).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["included"].as_array().unwrap().len(), 1);
    assert_eq!(listed["included"][0]["attributes"]["first-name"], "Royce");
    assert_eq!(
        listed["included"][0]["attributes"]["email"],
        "sydney.lueilwitz@example.com"
    );
}

#[tokio::test]
async fn test_blank_form_title_is_rejected() {
    let app = setup_app();

    let response = app
        .oneshot(post_form(COURSES, "course%5Btitle%5D="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["source"]["pointer"], "/data/attributes/title");
}

#[tokio::test]
async fn test_numeric_title_is_read_as_text() {
    let app = setup_app();

    let (status, body) = create(&app, json!({"course": {"title": 123}})).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "123");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = setup_app();

    let (status, body) = create(&app, json!({"title": "Ruby"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_list_renders_json_api_document() {
    let app = setup_app();
    seed_course(&app, "Course one", &["t1@example.com", "t2@example.com"]).await;
    seed_course(&app, "Course two", &["t3@example.com", "t4@example.com"]).await;

    let response = app.clone().oneshot(get(COURSES)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.contains("application/json"));

    let body = body_json(response).await;

    let tutor = |id: &str, email: &str, course: &str| {
        json!({
            "id": id,
            "type": "tutors",
            "attributes": {"first-name": "Tutor", "last-name": "Example", "email": email},
            "relationships": {"course": {"data": {"id": course, "type": "courses"}}}
        })
    };

    assert_eq!(
        body,
        json!({
            "data": [
                {
                    "id": "1",
                    "type": "courses",
                    "attributes": {"title": "Course one", "description": "About it"},
                    "relationships": {"tutors": {"data": [
                        {"id": "1", "type": "tutors"},
                        {"id": "2", "type": "tutors"}
                    ]}}
                },
                {
                    "id": "2",
                    "type": "courses",
                    "attributes": {"title": "Course two", "description": "About it"},
                    "relationships": {"tutors": {"data": [
                        {"id": "3", "type": "tutors"},
                        {"id": "4", "type": "tutors"}
                    ]}}
                }
            ],
            "included": [
                tutor("1", "t1@example.com", "1"),
                tutor("2", "t2@example.com", "1"),
                tutor("3", "t3@example.com", "2"),
                tutor("4", "t4@example.com", "2")
            ],
            "links": {
                "self": link(1, 30),
                "first": link(1, 30),
                "prev": null,
                "next": null,
                "last": link(1, 30)
            }
        })
    );
}

#[tokio::test]
async fn test_list_paginates_in_creation_order() {
    let app = setup_app();
    for title in ["First", "Second", "Third"] {
        seed_course(&app, title, &[]).await;
    }

    let body = list(&app, "/api/v1/courses?page%5Bnumber%5D=2&page%5Bsize%5D=1").await;

    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["attributes"]["title"], "Second");
    assert_eq!(
        body["links"],
        json!({
            "self": link(2, 1),
            "first": link(1, 1),
            "prev": link(1, 1),
            "next": link(3, 1),
            "last": link(3, 1)
        })
    );
}

#[tokio::test]
async fn test_list_past_the_end_points_back() {
    let app = setup_app();
    seed_course(&app, "First", &[]).await;
    seed_course(&app, "Second", &[]).await;

    let body = list(&app, "/api/v1/courses?page%5Bnumber%5D=5&page%5Bsize%5D=1").await;

    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["links"]["self"], link(5, 1));
    assert_eq!(body["links"]["prev"], link(2, 1));
    assert_eq!(body["links"]["next"], Value::Null);
    assert_eq!(body["links"]["last"], link(2, 1));
}

#[tokio::test]
async fn test_list_with_invalid_page_number_is_bad_request() {
    let app = setup_app();

    let response = app
        .oneshot(get("/api/v1/courses?page%5Bnumber%5D=invalid&page%5Bsize%5D=1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_list_with_zero_page_size_is_bad_request() {
    let app = setup_app();

    let response = app
        .oneshot(get("/api/v1/courses?page%5Bsize%5D=0"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_with_unaddressable_page_is_bad_request() {
    let app = setup_app();

    let response = app
        .oneshot(get(
            "/api/v1/courses?page%5Bnumber%5D=4294967295&page%5Bsize%5D=4294967295",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_bytes(response).await.is_empty());
}
